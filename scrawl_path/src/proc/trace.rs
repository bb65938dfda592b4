// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing: offset a path to one side without closing it into an outline.

use super::join::Join;
use super::PathProcessor;
use crate::affine::Affine;
use crate::curve;
use crate::part::Part;
use crate::path::Path;
use crate::point::Point;
use crate::EPSILON;

/// Flattening tolerance used when probing offset parts for intersections.
const PROBE_TOLERANCE: f64 = 0.1;

/// Offsets a path by a signed distance: positive traces the right-hand
/// side, negative the left.
///
/// Where consecutive offset parts cross (the inner side of a corner) the
/// overlap is trimmed away; where they fall short the configured join
/// bridges the gap. Ends closer than `min_gap` are welded directly.
pub struct TraceProc {
    width: f64,
    join: Join,
    min_gap: f64,
}

impl TraceProc {
    /// A trace at the given signed offset with round joins.
    pub fn new(width: f64) -> Self {
        Self {
            width,
            join: Join::Round,
            min_gap: 0.1,
        }
    }

    /// Set the join used where offsets fall short of each other.
    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }

    /// Set the welding distance below which no join or trim is attempted.
    pub fn with_min_gap(mut self, min_gap: f64) -> Self {
        self.min_gap = min_gap.abs();
        self
    }

    fn assemble(&self, source: &Path) -> Option<Path> {
        let simplified = source.simplify();
        let parts: Vec<Part> = simplified.parts().collect();
        let mut offsets: Vec<(Part, Part)> = parts
            .iter()
            .filter_map(|p| offset_part(p, self.width).map(|o| (p.clone(), o)))
            .collect();
        if offsets.is_empty() {
            return None;
        }
        let n = offsets.len();
        let seam = source.closed() && n > 1;
        let corners = if seam { n } else { n - 1 };
        let mut joins: Vec<Vec<Part>> = vec![Vec::new(); corners];
        for i in 0..corners {
            let next_idx = (i + 1) % n;
            let anchor = offsets[next_idx].0.first().clone();
            let gap = offsets[i].1.last().dist(offsets[next_idx].1.first());
            if gap <= self.min_gap {
                continue;
            }
            if let Some((ta, tb)) = intersect_parts(&offsets[i].1, &offsets[next_idx].1) {
                offsets[i].1 = offsets[i].1.split(ta).0;
                offsets[next_idx].1 = offsets[next_idx].1.split(tb).1;
            } else {
                joins[i] = self.join.parts(&offsets[i].1, &anchor, &offsets[next_idx].1);
            }
        }
        let mut out: Vec<Part> = Vec::new();
        for i in 0..n {
            out.push(offsets[i].1.clone());
            if i < corners {
                out.append(&mut joins[i]);
            }
        }
        let mut path = Path::from_parts(out).ok()?;
        if source.closed() {
            path.close();
        }
        Some(path)
    }
}

impl PathProcessor for TraceProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        if self.width.abs() < EPSILON {
            return vec![path.clone()];
        }
        match self.assemble(path) {
            Some(p) => vec![p],
            None => {
                log::warn!("trace produced no offset parts");
                Vec::new()
            }
        }
    }
}

/// Offset a part to the side indicated by the sign of `width` (positive =
/// right-hand), by mapping its chord onto the offset chord.
fn offset_part(part: &Part, width: f64) -> Option<Part> {
    let ts = part.tangent_start()?;
    let te = part.tangent_end()?;
    let off_a = part.first() + &(&Point::new(ts.y(), -ts.x()) * width);
    let off_b = part.last() + &(&Point::new(te.y(), -te.x()) * width);
    if part.is_line() {
        return Some(Part::line(off_a, off_b));
    }
    Affine::line_to_line(part.first(), part.last(), &off_a, &off_b)
        .ok()
        .map(|t| part.transform(&t))
}

/// Find the crossing of two offset parts nearest their shared junction:
/// the pair `(ta, tb)` minimizing `(1 − ta) + tb` over all polyline
/// crossings of their flattenings.
fn intersect_parts(a: &Part, b: &Part) -> Option<(f64, f64)> {
    let fa = a.flatten_with_t(PROBE_TOLERANCE);
    let fb = b.flatten_with_t(PROBE_TOLERANCE);
    let mut best: Option<(f64, f64)> = None;
    for wa in fa.windows(2) {
        for wb in fb.windows(2) {
            let Ok((sa, sb)) = curve::line_intersection(&wa[0].1, &wa[1].1, &wb[0].1, &wb[1].1)
            else {
                continue;
            };
            if !(-EPSILON..=1.0 + EPSILON).contains(&sa)
                || !(-EPSILON..=1.0 + EPSILON).contains(&sb)
            {
                continue;
            }
            let ta = wa[0].0 + sa * (wa[1].0 - wa[0].0);
            let tb = wb[0].0 + sb * (wb[1].0 - wb[0].0);
            let cost = (1.0 - ta) + tb;
            if best.map_or(true, |(bta, btb)| cost < (1.0 - bta) + btb) {
                best = Some((ta, tb));
            }
        }
    }
    best
}

/// Traces a flattened path with a per-vertex width: each vertex is pushed
/// along the corner bisector by `width_fn(frac, width)`, where `frac` is
/// the vertex's arc-length fraction.
pub struct VarWidthTraceProc {
    width: f64,
    tolerance: f64,
    width_fn: Box<dyn Fn(f64, f64) -> f64 + Send + Sync>,
}

impl VarWidthTraceProc {
    /// A variable-width trace; `width_fn` receives the arc-length fraction
    /// in `[0, 1]` and the nominal width.
    pub fn new(
        width: f64,
        tolerance: f64,
        width_fn: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            width,
            tolerance,
            width_fn: Box::new(width_fn),
        }
    }
}

impl PathProcessor for VarWidthTraceProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let flat = path.flatten(self.tolerance);
        let mut vertices: Vec<Point> = Vec::with_capacity(flat.steps().len());
        vertices.push(flat.start().clone());
        for s in &flat.steps()[1..] {
            vertices.push(s.last().clone());
        }
        if flat.closed() && !flat.end().approx_eq(flat.start()) {
            vertices.push(flat.start().clone());
        }
        if vertices.len() < 2 {
            return Vec::new();
        }
        let lengths: Vec<f64> = vertices.windows(2).map(|w| w[0].dist(&w[1])).collect();
        let total: f64 = lengths.iter().sum();
        if total < EPSILON {
            return Vec::new();
        }
        let mut offset_points = Vec::with_capacity(vertices.len());
        let mut walked = 0.0;
        for (i, v) in vertices.iter().enumerate() {
            let dir_in = (i > 0).then(|| (&vertices[i] - &vertices[i - 1]).normalize()).flatten();
            let dir_out = (i + 1 < vertices.len())
                .then(|| (&vertices[i + 1] - &vertices[i]).normalize())
                .flatten();
            let dir = match (dir_in, dir_out) {
                (Some(a), Some(b)) => (&a + &b).normalize().or(Some(a)),
                (d, None) | (None, d) => d,
            };
            let Some(dir) = dir else {
                continue;
            };
            let normal = Point::new(dir.y(), -dir.x());
            let w = (self.width_fn)(walked / total, self.width);
            offset_points.push(v + &(&normal * w));
            if i < lengths.len() {
                walked += lengths[i];
            }
        }
        match crate::builder::polyline(offset_points) {
            Ok(mut p) => {
                if path.closed() {
                    p.close();
                }
                vec![p]
            }
            Err(e) => {
                log::warn!("variable-width trace dropped: {e}");
                Vec::new()
            }
        }
    }
}

/// Lays `strands` parallel traces evenly across a band of the given
/// total width, centered on the path.
pub struct StrandedTraceProc {
    width: f64,
    strands: usize,
    join: Join,
}

impl StrandedTraceProc {
    /// `strands` traces spanning `width`.
    pub fn new(width: f64, strands: usize) -> Self {
        Self {
            width: width.abs(),
            strands: strands.max(1),
            join: Join::Round,
        }
    }

    /// Set the join used by each strand.
    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }
}

impl PathProcessor for StrandedTraceProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let n = self.strands;
        let mut out = Vec::with_capacity(n);
        for k in 0..n {
            let offset = if n == 1 {
                0.0
            } else {
                -self.width / 2.0 + k as f64 * self.width / (n - 1) as f64
            };
            if offset.abs() < EPSILON {
                out.push(path.clone());
            } else {
                out.extend(TraceProc::new(offset).with_join(self.join).process(path));
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
    fn straight_line_traces_to_a_parallel() {
        let p = builder::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).unwrap();
        let out = TraceProc::new(5.0).process(&p);
        assert_eq!(out.len(), 1);
        assert!(out[0].start().approx_eq(&Point::new(0.0, -5.0)));
        assert!(out[0].end().approx_eq(&Point::new(100.0, -5.0)));
    }

    #[test]
    fn negative_width_traces_the_other_side() {
        let p = builder::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).unwrap();
        let out = TraceProc::new(-5.0).process(&p);
        assert!(out[0].start().approx_eq(&Point::new(0.0, 5.0)));
    }

    #[test]
    fn outer_corner_gets_a_join() {
        // Left turn, right-hand offset: the outer side needs bridging.
        let p = builder::polyline([
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ])
        .unwrap();
        let out = TraceProc::new(1.0).with_join(Join::Bevel).process(&p);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].parts().count(), 3);
    }

    #[test]
    fn inner_corner_gets_trimmed() {
        // Right turn, right-hand offset: the offsets cross and are cut
        // back to the crossing, leaving just the two segments.
        let p = builder::polyline([
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, -10.0),
        ])
        .unwrap();
        let out = TraceProc::new(1.0).process(&p);
        assert_eq!(out.len(), 1);
        let parts: Vec<Part> = out[0].parts().collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].last().approx_eq(&Point::new(9.0, -1.0)));
    }

    #[test]
    fn stranded_spans_the_band() {
        let p = builder::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).unwrap();
        let out = StrandedTraceProc::new(10.0, 3).process(&p);
        assert_eq!(out.len(), 3);
        let ys: Vec<f64> = out.iter().map(|p| p.start().y()).collect();
        assert!((ys[0] - 5.0).abs() < 1e-6);
        assert!(ys[1].abs() < 1e-6);
        assert!((ys[2] + 5.0).abs() < 1e-6);
    }

    #[test]
    fn var_width_follows_its_function() {
        let p = builder::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).unwrap();
        let out = VarWidthTraceProc::new(10.0, 0.1, |frac, w| frac * w).process(&p);
        assert_eq!(out.len(), 1);
        assert!(out[0].start().approx_eq(&Point::new(0.0, 0.0)));
        assert!(out[0].end().approx_eq(&Point::new(100.0, -10.0)));
    }
}
