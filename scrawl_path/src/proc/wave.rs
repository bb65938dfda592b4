// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wave decorations: triangle, square and scallop profiles laid along a
//! path.
//!
//! All three resample the path at half-wavelength spacing first, so the
//! profile follows curves as well as lines.

use super::snip::MunchProc;
use super::PathProcessor;
use crate::builder::make_arc_parts;
use crate::part::Part;
use crate::path::Path;
use crate::point::Point;
use crate::EPSILON;
use core::f64::consts::PI;

/// Resample `path` at `spacing` and return its vertex chain.
fn samples(path: &Path, spacing: f64, tolerance: f64) -> Option<Vec<Point>> {
    let munch = MunchProc::new(spacing, tolerance).ok()?;
    let resampled = munch.process(path);
    let flat = resampled.first()?;
    let mut vs = vec![flat.start().clone()];
    for s in &flat.steps()[1..] {
        vs.push(s.last().clone());
    }
    if path.closed() && !vs[vs.len() - 1].approx_eq(&vs[0]) {
        vs.push(vs[0].clone());
    }
    (vs.len() >= 2).then_some(vs)
}

fn segment_normal(a: &Point, b: &Point) -> Option<Point> {
    let d = (b - a).normalize()?;
    Some(Point::new(d.y(), -d.x()))
}

fn emit(path: &Path, vertices: Vec<Point>) -> Vec<Path> {
    match crate::builder::polyline(vertices) {
        Ok(mut p) => {
            if path.closed() {
                p.close();
            }
            vec![p]
        }
        Err(e) => {
            log::warn!("wave dropped: {e}");
            vec![path.clone()]
        }
    }
}

/// A zigzag along the path: one peak per half wavelength, alternating
/// sides.
pub struct TriangleWaveProc {
    wavelength: f64,
    scale: f64,
    invert: bool,
    elide_crossings: bool,
    tolerance: f64,
}

impl TriangleWaveProc {
    /// Peaks of height `wavelength`·`scale` every half `wavelength`.
    pub fn new(wavelength: f64, scale: f64, tolerance: f64) -> Self {
        Self {
            wavelength,
            scale,
            invert: false,
            elide_crossings: false,
            tolerance,
        }
    }

    /// Start the first peak on the opposite side.
    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }

    /// Connect peak to peak directly, skipping the on-path crossings.
    pub fn elide_crossings(mut self) -> Self {
        self.elide_crossings = true;
        self
    }
}

impl PathProcessor for TriangleWaveProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let Some(vs) = samples(path, self.wavelength / 2.0, self.tolerance) else {
            return vec![path.clone()];
        };
        let height = self.wavelength * self.scale;
        let mut side = if self.invert { -1.0 } else { 1.0 };
        let mut out = vec![vs[0].clone()];
        for w in vs.windows(2) {
            if let Some(n) = segment_normal(&w[0], &w[1]) {
                let peak = &w[0].lerp(&w[1], 0.5) + &(&n * (height * side));
                out.push(peak);
                side = -side;
            }
            if !self.elide_crossings {
                out.push(w[1].clone());
            }
        }
        if self.elide_crossings {
            out.push(vs[vs.len() - 1].clone());
        }
        emit(path, out)
    }
}

/// A rectangular profile along the path: each half wavelength juts out
/// perpendicular, runs parallel, and returns, alternating sides.
pub struct SquareWaveProc {
    wavelength: f64,
    scale: f64,
    invert: bool,
    elide_crossings: bool,
    tolerance: f64,
}

impl SquareWaveProc {
    /// Lobes of height `wavelength`·`scale` every half `wavelength`.
    pub fn new(wavelength: f64, scale: f64, tolerance: f64) -> Self {
        Self {
            wavelength,
            scale,
            invert: false,
            elide_crossings: false,
            tolerance,
        }
    }

    /// Start the first lobe on the opposite side.
    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }

    /// Skip the on-path returns between opposite lobes.
    pub fn elide_crossings(mut self) -> Self {
        self.elide_crossings = true;
        self
    }
}

impl PathProcessor for SquareWaveProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let Some(vs) = samples(path, self.wavelength / 2.0, self.tolerance) else {
            return vec![path.clone()];
        };
        let height = self.wavelength * self.scale;
        let mut side = if self.invert { -1.0 } else { 1.0 };
        let mut out = vec![vs[0].clone()];
        for w in vs.windows(2) {
            if let Some(n) = segment_normal(&w[0], &w[1]) {
                let lift = &n * (height * side);
                out.push(&w[0] + &lift);
                out.push(&w[1] + &lift);
                side = -side;
            }
            if !self.elide_crossings {
                out.push(w[1].clone());
            }
        }
        if self.elide_crossings {
            out.push(vs[vs.len() - 1].clone());
        }
        emit(path, out)
    }
}

/// Replaces each half-wavelength chunk with a half-circle bulge.
pub struct ScallopProc {
    wavelength: f64,
    flip: bool,
    tolerance: f64,
}

impl ScallopProc {
    /// Scallops spanning half a `wavelength` each.
    pub fn new(wavelength: f64, tolerance: f64) -> Self {
        Self {
            wavelength,
            flip: false,
            tolerance,
        }
    }

    /// Bulge to the other side.
    pub fn flipped(mut self) -> Self {
        self.flip = true;
        self
    }
}

impl PathProcessor for ScallopProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let Some(vs) = samples(path, self.wavelength / 2.0, self.tolerance) else {
            return vec![path.clone()];
        };
        let sweep = if self.flip { PI } else { -PI };
        let mut parts: Vec<Part> = Vec::new();
        for w in vs.windows(2) {
            let r = w[0].dist(&w[1]) / 2.0;
            if r < EPSILON {
                continue;
            }
            let mid = w[0].lerp(&w[1], 0.5);
            let offs = (&w[0] - &mid).angle();
            parts.extend(make_arc_parts(mid.x(), mid.y(), r, r, 0.0, offs, sweep));
        }
        match Path::from_parts(parts) {
            Ok(mut p) => {
                if path.closed() {
                    p.close();
                }
                vec![p]
            }
            Err(e) => {
                log::warn!("scallop dropped: {e}");
                vec![path.clone()]
            }
        }
    }
}
