// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polyline smoothing with cubic Béziers.

use super::PathProcessor;
use crate::part::Part;
use crate::path::Path;
use crate::point::Point;

/// Smoothing flavor used by [`CurveProc`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CurveMode {
    /// Pass through the midpoints of consecutive vertices; the vertices
    /// themselves pull the control points.
    #[default]
    Bezier,
    /// Catmull-Rom: pass through the vertices with tangents taken from
    /// their neighbors.
    CatmullRom,
}

/// Replaces a path's vertex chain with smooth cubic segments.
pub struct CurveProc {
    scale: f64,
    mode: CurveMode,
}

impl CurveProc {
    /// Smooth with the given control-point scale.
    pub fn new(scale: f64, mode: CurveMode) -> Self {
        Self { scale, mode }
    }

    fn vertices(path: &Path) -> Vec<Point> {
        let mut vs = vec![path.start().clone()];
        for s in &path.steps()[1..] {
            vs.push(s.last().clone());
        }
        if path.closed() && vs.len() > 1 && vs[0].approx_eq(&vs[vs.len() - 1]) {
            vs.pop();
        }
        vs
    }

    fn bezier(&self, vs: &[Point], closed: bool) -> Vec<Part> {
        let k = vs.len();
        let mut out = Vec::new();
        if closed {
            // One segment per vertex, from the midpoint of its incoming
            // edge to the midpoint of its outgoing edge.
            for j in 0..k {
                let prev = &vs[(j + k - 1) % k];
                let v = &vs[j];
                let next = &vs[(j + 1) % k];
                let a = prev.lerp(v, 0.5);
                let b = v.lerp(next, 0.5);
                out.push(Part::new([
                    a.clone(),
                    a.lerp(v, self.scale),
                    b.lerp(v, self.scale),
                    b,
                ]));
            }
        } else {
            // One segment per interior vertex; the path endpoints anchor
            // the first and last segments.
            for j in 1..k - 1 {
                let a = if j == 1 {
                    vs[0].clone()
                } else {
                    vs[j - 1].lerp(&vs[j], 0.5)
                };
                let b = if j == k - 2 {
                    vs[k - 1].clone()
                } else {
                    vs[j].lerp(&vs[j + 1], 0.5)
                };
                out.push(Part::new([
                    a.clone(),
                    a.lerp(&vs[j], self.scale),
                    b.lerp(&vs[j], self.scale),
                    b,
                ]));
            }
        }
        out
    }

    fn catmull_rom(&self, vs: &[Point], closed: bool) -> Vec<Part> {
        let k = vs.len();
        let tangent = |i: usize| -> Point {
            if closed {
                (&vs[(i + 1) % k] - &vs[(i + k - 1) % k]) * 0.5
            } else if i == 0 || i == k - 1 {
                Point::new(0.0, 0.0)
            } else {
                (&vs[i + 1] - &vs[i - 1]) * 0.5
            }
        };
        let segs = if closed { k } else { k - 1 };
        (0..segs)
            .map(|i| {
                let j = (i + 1) % k;
                let (a, b) = (&vs[i], &vs[j]);
                Part::new([
                    a.clone(),
                    a + &(&tangent(i) * self.scale),
                    b - &(&tangent(j) * self.scale),
                    b.clone(),
                ])
            })
            .collect()
    }
}

impl PathProcessor for CurveProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let vs = Self::vertices(path);
        if vs.len() < 3 {
            return vec![path.clone()];
        }
        let parts = match self.mode {
            CurveMode::Bezier => self.bezier(&vs, path.closed()),
            CurveMode::CatmullRom => self.catmull_rom(&vs, path.closed()),
        };
        match Path::from_parts(parts) {
            Ok(mut p) => {
                if path.closed() {
                    p.close();
                }
                vec![p]
            }
            Err(e) => {
                log::warn!("smoothing dropped: {e}");
                vec![path.clone()]
            }
        }
    }
}
