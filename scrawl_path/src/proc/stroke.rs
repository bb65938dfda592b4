// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroking: expand a path into the closed outline(s) of a pen of fixed
//! width dragged along it.

use super::cap::Cap;
use super::join::Join;
use super::PathProcessor;
use crate::affine::Affine;
use crate::builder;
use crate::part::Part;
use crate::path::Path;
use crate::point::Point;
use crate::EPSILON;

/// Marker emitted when a single-point path is stroked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointMarker {
    /// A circle of the stroke width.
    #[default]
    Circle,
    /// An axis-aligned square of the stroke width.
    Square,
}

/// Strokes a path into closed outline paths.
///
/// A closed input yields two paths (outer and inner outline); an open
/// input yields a single closed path assembled from the right-hand
/// offset, the end cap, the reversed left-hand offset, and the start cap.
pub struct StrokeProc {
    width: f64,
    point_marker: PointMarker,
    join: Join,
    cap_start: Cap,
    cap_end: Cap,
}

impl StrokeProc {
    /// A stroke of the given width with round joins and caps.
    pub fn new(width: f64) -> Self {
        Self {
            width: width.abs(),
            point_marker: PointMarker::Circle,
            join: Join::Round,
            cap_start: Cap::Round,
            cap_end: Cap::Round,
        }
    }

    /// Set the join used at corners.
    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }

    /// Set both caps.
    pub fn with_cap(mut self, cap: Cap) -> Self {
        self.cap_start = cap;
        self.cap_end = cap;
        self
    }

    /// Set start and end caps independently.
    pub fn with_caps(mut self, start: Cap, end: Cap) -> Self {
        self.cap_start = start;
        self.cap_end = end;
        self
    }

    /// Set the marker used for single-point paths.
    pub fn with_point_marker(mut self, marker: PointMarker) -> Self {
        self.point_marker = marker;
        self
    }

    fn point_paths(&self, p: &Point) -> Vec<Path> {
        let w2 = self.width / 2.0;
        let built = match self.point_marker {
            PointMarker::Circle => builder::circle(p, w2),
            PointMarker::Square => builder::polygon([
                Point::new(p.x() - w2, p.y() - w2),
                Point::new(p.x() + w2, p.y() - w2),
                Point::new(p.x() + w2, p.y() + w2),
                Point::new(p.x() - w2, p.y() + w2),
            ]),
        };
        match built {
            Ok(path) => vec![path],
            Err(e) => {
                log::warn!("stroke point marker failed: {e}");
                Vec::new()
            }
        }
    }
}

impl PathProcessor for StrokeProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        if self.width < EPSILON {
            return vec![path.clone()];
        }
        if path.steps().len() == 1 {
            return self.point_paths(path.start());
        }
        let w2 = self.width / 2.0;
        let simplified = path.simplify();
        let rhs = side(&simplified, w2, &self.join);
        if rhs.is_empty() {
            return self.point_paths(path.start());
        }
        if path.closed() {
            let lhs = side(&simplified.reverse(), w2, &self.join);
            let mut out = Vec::new();
            for parts in [rhs, lhs] {
                match Path::from_parts(parts) {
                    Ok(mut p) => {
                        p.close();
                        out.push(p);
                    }
                    Err(e) => log::warn!("stroke outline dropped: {e}"),
                }
            }
            out
        } else {
            let reversed = simplified.reverse();
            let lhs = side(&reversed, w2, &self.join);
            let mut parts = rhs;
            let rhs_first = parts[0].first().clone();
            let rhs_last = parts[parts.len() - 1].last().clone();
            let lhs_first = lhs
                .first()
                .map(|p| p.first().clone())
                .unwrap_or_else(|| rhs_last.clone());
            let lhs_last = lhs
                .last()
                .map(|p| p.last().clone())
                .unwrap_or_else(|| lhs_first.clone());
            parts.extend(self.cap_end.parts(&rhs_last, path.end(), &lhs_first));
            parts.extend(lhs);
            parts.extend(self.cap_start.parts(&lhs_last, path.start(), &rhs_first));
            match Path::from_parts(parts) {
                Ok(mut p) => {
                    p.close();
                    vec![p]
                }
                Err(e) => {
                    log::warn!("stroke outline dropped: {e}");
                    Vec::new()
                }
            }
        }
    }
}

/// Offset a single part to its right-hand side by `w2`, by mapping the
/// chord onto the offset chord.
fn offset_part(part: &Part, w2: f64) -> Option<Part> {
    let ts = part.tangent_start()?;
    let te = part.tangent_end()?;
    let chord_a = part.first();
    let chord_b = part.last();
    let off_a = chord_a + &(&rhs_normal(&ts) * w2);
    let off_b = chord_b + &(&rhs_normal(&te) * w2);
    if part.is_line() {
        return Some(Part::line(off_a, off_b));
    }
    match Affine::line_to_line(chord_a, chord_b, &off_a, &off_b) {
        Ok(t) => Some(part.transform(&t)),
        Err(_) => None,
    }
}

fn rhs_normal(tangent: &Point) -> Point {
    Point::new(tangent.y(), -tangent.x())
}

/// One side of the stroke: right-hand offsets of each part of an already
/// simplified path, with joins bridging the gaps at corners.
fn side(path: &Path, w2: f64, join: &Join) -> Vec<Part> {
    let parts: Vec<Part> = path.parts().collect();
    let offsets: Vec<(Part, Part)> = parts
        .iter()
        .filter_map(|p| offset_part(p, w2).map(|o| (p.clone(), o)))
        .collect();
    let mut out: Vec<Part> = Vec::new();
    for (i, (src, off)) in offsets.iter().enumerate() {
        if i > 0 {
            let prev = out.last().cloned();
            if let Some(prev) = prev {
                out.extend(join.parts(&prev, src.first(), off));
            }
        }
        out.push(off.clone());
    }
    // A closed source also needs a join across the seam.
    if path.closed() && offsets.len() > 1 {
        let (first_src, first_off) = &offsets[0];
        if let Some(prev) = out.last().cloned() {
            out.extend(join.parts(&prev, first_src.first(), first_off));
        }
    }
    out
}

/// A cruder stroke: flatten and emit one oriented rectangle per segment.
/// No joins, no caps.
pub struct SimpleStrokeProc {
    width: f64,
    tolerance: f64,
}

impl SimpleStrokeProc {
    /// A simple stroke of the given width, flattening at `tolerance`.
    pub fn new(width: f64, tolerance: f64) -> Self {
        Self {
            width: width.abs(),
            tolerance,
        }
    }
}

impl PathProcessor for SimpleStrokeProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let w2 = self.width / 2.0;
        let flat = path.flatten(self.tolerance);
        let mut out = Vec::new();
        for part in flat.parts() {
            let Some(t) = part.tangent_start() else {
                continue;
            };
            let n = rhs_normal(&t) * w2;
            let rect = builder::polygon([
                part.first() + &n,
                part.last() + &n,
                part.last() - &n,
                part.first() - &n,
            ]);
            match rect {
                Ok(r) => out.push(r),
                Err(e) => log::warn!("segment rectangle dropped: {e}"),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder;

    #[test]
    fn open_line_strokes_to_one_closed_outline() {
        let p = builder::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).unwrap();
        let proc = StrokeProc::new(2.0).with_cap(Cap::Butt);
        let out = proc.process(&p);
        assert_eq!(out.len(), 1);
        assert!(out[0].closed());
        let tb = out[0].tight_bounds();
        assert!((tb.y0 + 1.0).abs() < 1e-6 && (tb.y1 - 1.0).abs() < 1e-6);
        assert!((tb.x0).abs() < 1e-6 && (tb.x1 - 100.0).abs() < 1e-6);
    }

    #[test]
    fn closed_triangle_strokes_to_two_outlines() {
        let tri = builder::polygon([
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(50.0, 80.0),
        ])
        .unwrap();
        let proc = StrokeProc::new(4.0).with_join(Join::Bevel);
        let out = proc.process(&tri);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(Path::closed));
        // One outline per side: three offset edges plus three bevels.
        let outer = out
            .iter()
            .max_by(|a, b| {
                let (a, b) = (a.tight_bounds(), b.tight_bounds());
                a.width().partial_cmp(&b.width()).unwrap()
            })
            .unwrap();
        assert_eq!(outer.parts().count(), 6);
    }

    #[test]
    fn point_path_strokes_to_its_marker() {
        let p = builder::point(Point::new(5.0, 5.0));
        let out = StrokeProc::new(10.0).process(&p);
        assert_eq!(out.len(), 1);
        let tb = out[0].tight_bounds();
        assert!((tb.width() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn zero_width_stroke_is_identity() {
        let p = builder::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        let out = StrokeProc::new(0.0).process(&p);
        assert_eq!(out, vec![p]);
    }

    #[test]
    fn simple_stroke_emits_one_rectangle_per_segment() {
        let p = builder::polyline([
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ])
        .unwrap();
        let out = SimpleStrokeProc::new(2.0, 0.1).process(&p);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(Path::closed));
    }
}
