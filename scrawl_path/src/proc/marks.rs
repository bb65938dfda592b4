// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decorations placed along a path: repeated marker paths at vertices, at
//! fixed arc-length intervals, per-segment boxes, and start/mid/end caps.
//!
//! Marker prototypes are ordinary paths, assumed to be drawn around the
//! origin; placement translates (and optionally rotates) copies of them.

use super::PathProcessor;
use crate::affine::Affine;
use crate::part::Part;
use crate::path::Path;
use crate::point::Point;
use crate::EPSILON;
use core::f64::consts::TAU;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Orientation given to a placed marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RotateStyle {
    /// Place as-is.
    #[default]
    None,
    /// Rotate to the local tangent direction.
    Tangent,
    /// Rotate by a uniformly random angle.
    Random,
}

fn place(proto: &Path, anchor: &Point, angle: f64) -> Path {
    let t = Affine::translate(anchor.x(), anchor.y()) * Affine::rotate(angle);
    proto.transform(&t)
}

/// Places marker paths at every part start (and at the end of open
/// paths), cycling through the prototype list.
pub struct PointsProc {
    protos: Vec<Path>,
    rotate: RotateStyle,
    rng: Mutex<StdRng>,
}

impl PointsProc {
    /// Markers from `protos`, placed with the given orientation rule.
    pub fn new(protos: Vec<Path>, rotate: RotateStyle) -> Self {
        Self {
            protos,
            rotate,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic variant (only [`RotateStyle::Random`] draws).
    pub fn with_seed(protos: Vec<Path>, rotate: RotateStyle, seed: u64) -> Self {
        Self {
            protos,
            rotate,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn angle(&self, tangent: Option<Point>) -> f64 {
        match self.rotate {
            RotateStyle::None => 0.0,
            RotateStyle::Tangent => tangent.map_or(0.0, |t| t.angle()),
            RotateStyle::Random => {
                let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
                rng.gen_range(0.0..TAU)
            }
        }
    }
}

impl PathProcessor for PointsProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        if self.protos.is_empty() {
            return Vec::new();
        }
        let parts: Vec<Part> = path.parts().collect();
        let mut out = Vec::new();
        let mut cycle = self.protos.iter().cycle();
        if parts.is_empty() {
            // A single-point path still gets its marker.
            if let Some(proto) = cycle.next() {
                out.push(place(proto, path.start(), self.angle(None)));
            }
            return out;
        }
        for part in &parts {
            let proto = cycle.next().expect("non-empty cycle");
            out.push(place(proto, part.first(), self.angle(part.tangent_start())));
        }
        if !path.closed() {
            let last = &parts[parts.len() - 1];
            let proto = cycle.next().expect("non-empty cycle");
            out.push(place(proto, last.last(), self.angle(last.tangent_end())));
        }
        out
    }
}

/// Places marker paths at fixed arc-length intervals along the path.
pub struct ShapesProc {
    protos: Vec<Path>,
    spacing: f64,
    rotate: RotateStyle,
    tolerance: f64,
    rng: Mutex<StdRng>,
}

impl ShapesProc {
    /// Markers every `spacing` units of arc length.
    pub fn new(protos: Vec<Path>, spacing: f64, rotate: RotateStyle, tolerance: f64) -> Self {
        Self {
            protos,
            spacing,
            rotate,
            tolerance,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic variant (only [`RotateStyle::Random`] draws).
    pub fn with_seed(
        protos: Vec<Path>,
        spacing: f64,
        rotate: RotateStyle,
        tolerance: f64,
        seed: u64,
    ) -> Self {
        Self {
            protos,
            spacing,
            rotate,
            tolerance,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn angle(&self, tangent: Option<Point>) -> f64 {
        match self.rotate {
            RotateStyle::None => 0.0,
            RotateStyle::Tangent => tangent.map_or(0.0, |t| t.angle()),
            RotateStyle::Random => {
                let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
                rng.gen_range(0.0..TAU)
            }
        }
    }
}

impl PathProcessor for ShapesProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        if self.protos.is_empty() || self.spacing < EPSILON {
            return Vec::new();
        }
        let flat = path.flatten(self.tolerance);
        let mut vertices = vec![flat.start().clone()];
        for s in &flat.steps()[1..] {
            vertices.push(s.last().clone());
        }
        if flat.closed() && !flat.end().approx_eq(flat.start()) {
            vertices.push(flat.start().clone());
        }
        let mut out = Vec::new();
        let mut cycle = self.protos.iter().cycle();
        let mut next_mark = 0.0;
        let mut walked = 0.0;
        for w in vertices.windows(2) {
            let seg = w[0].dist(&w[1]);
            if seg < EPSILON {
                continue;
            }
            let dir = (&w[1] - &w[0]) * (1.0 / seg);
            while next_mark <= walked + seg + EPSILON {
                let frac = ((next_mark - walked) / seg).clamp(0.0, 1.0);
                let anchor = w[0].lerp(&w[1], frac);
                let proto = cycle.next().expect("non-empty cycle");
                out.push(place(proto, &anchor, self.angle(Some(dir.clone()))));
                next_mark += self.spacing;
            }
            walked += seg;
        }
        out
    }
}

/// Emits one oriented rectangle per flattened segment, of the given width
/// and offset from the segment axis (positive offsets sit on the
/// right-hand side).
pub struct BoxerProc {
    width: f64,
    offset: f64,
    tolerance: f64,
}

impl BoxerProc {
    /// Boxes of `width` centered `offset` from the path axis.
    pub fn new(width: f64, offset: f64, tolerance: f64) -> Self {
        Self {
            width: width.abs(),
            offset,
            tolerance,
        }
    }
}

impl PathProcessor for BoxerProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let flat = path.flatten(self.tolerance);
        let near = self.offset - self.width / 2.0;
        let far = self.offset + self.width / 2.0;
        let mut out = Vec::new();
        for part in flat.parts() {
            let Some(t) = part.tangent_start() else {
                continue;
            };
            let n = Point::new(t.y(), -t.x());
            let rect = crate::builder::polygon([
                part.first() + &(&n * near),
                part.last() + &(&n * near),
                part.last() + &(&n * far),
                part.first() + &(&n * far),
            ]);
            match rect {
                Ok(r) => out.push(r),
                Err(e) => log::warn!("box dropped: {e}"),
            }
        }
        out
    }
}

/// Places up to three marker paths: one at the path start, one at each
/// interior part junction, one at the path end.
pub struct CapsProc {
    start: Option<Path>,
    mid: Option<Path>,
    end: Option<Path>,
    align_tangent: bool,
}

impl CapsProc {
    /// Optional start/mid/end markers; `align_tangent` rotates each to
    /// the local tangent.
    pub fn new(
        start: Option<Path>,
        mid: Option<Path>,
        end: Option<Path>,
        align_tangent: bool,
    ) -> Self {
        Self {
            start,
            mid,
            end,
            align_tangent,
        }
    }

    fn angle(&self, tangent: Option<Point>) -> f64 {
        if self.align_tangent {
            tangent.map_or(0.0, |t| t.angle())
        } else {
            0.0
        }
    }
}

impl PathProcessor for CapsProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let parts: Vec<Part> = path.parts().collect();
        let mut out = Vec::new();
        if parts.is_empty() {
            if let Some(p) = &self.start {
                out.push(place(p, path.start(), 0.0));
            }
            return out;
        }
        if let Some(p) = &self.start {
            out.push(place(p, parts[0].first(), self.angle(parts[0].tangent_start())));
        }
        if let Some(p) = &self.mid {
            for w in parts.windows(2) {
                out.push(place(p, w[1].first(), self.angle(w[1].tangent_start())));
            }
        }
        if let Some(p) = &self.end {
            let last = &parts[parts.len() - 1];
            out.push(place(p, last.last(), self.angle(last.tangent_end())));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder;

    fn marker() -> Path {
        builder::circle(&Point::new(0.0, 0.0), 1.0).unwrap()
    }

    fn zigzag() -> Path {
        builder::polyline([
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn points_mark_every_vertex_and_the_open_end() {
        let out = PointsProc::new(vec![marker()], RotateStyle::None).process(&zigzag());
        assert_eq!(out.len(), 3);
        let centers: Vec<f64> = out.iter().map(|p| p.tight_bounds().center().x()).collect();
        assert!((centers[0]).abs() < 1e-6);
        assert!((centers[2] - 20.0).abs() < 1e-6);
    }

    #[test]
    fn closed_paths_skip_the_duplicate_end_marker() {
        let square = builder::polygon([
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ])
        .unwrap();
        let out = PointsProc::new(vec![marker()], RotateStyle::None).process(&square);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn prototypes_cycle() {
        let small = builder::circle(&Point::new(0.0, 0.0), 1.0).unwrap();
        let big = builder::circle(&Point::new(0.0, 0.0), 3.0).unwrap();
        let out = PointsProc::new(vec![small, big], RotateStyle::None).process(&zigzag());
        let widths: Vec<f64> = out.iter().map(|p| p.tight_bounds().width()).collect();
        assert!((widths[0] - 2.0).abs() < 1e-6);
        assert!((widths[1] - 6.0).abs() < 1e-6);
        assert!((widths[2] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn shapes_space_by_arc_length() {
        let line = builder::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).unwrap();
        let out =
            ShapesProc::new(vec![marker()], 25.0, RotateStyle::None, 0.1).process(&line);
        assert_eq!(out.len(), 5);
        let xs: Vec<f64> = out.iter().map(|p| p.tight_bounds().center().x()).collect();
        assert!((xs[1] - 25.0).abs() < 0.01);
    }

    #[test]
    fn boxer_offsets_to_one_side() {
        let line = builder::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        let out = BoxerProc::new(2.0, 3.0, 0.1).process(&line);
        assert_eq!(out.len(), 1);
        let tb = out[0].tight_bounds();
        // Right-hand side of an east-bound line is negative y.
        assert!((tb.y0 + 4.0).abs() < 1e-6 && (tb.y1 + 2.0).abs() < 1e-6);
    }

    #[test]
    fn caps_hit_start_mid_end() {
        let out = CapsProc::new(Some(marker()), Some(marker()), Some(marker()), false)
            .process(&zigzag());
        assert_eq!(out.len(), 3);
        let xs: Vec<f64> = out.iter().map(|p| p.tight_bounds().center().x()).collect();
        assert!(xs.contains(&0.0) || xs[0].abs() < 1e-6);
        assert!((xs[1] - 10.0).abs() < 1e-6);
        assert!((xs[2] - 20.0).abs() < 1e-6);
    }
}
