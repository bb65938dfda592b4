// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Corner and edge rounding.

use super::PathProcessor;
use crate::builder::make_arc_parts;
use crate::curve;
use crate::part::Part;
use crate::path::Path;
use crate::point::Point;
use crate::EPSILON;
use core::f64::consts::{PI, TAU};

/// Rounds every corner between two adjacent line segments with a circular
/// arc tangent to both legs.
///
/// The requested radius is clamped so the arc's tangent points never pass
/// the midpoint of the shorter leg; curved parts and their corners are
/// left untouched. Closed paths also round the closing corner.
pub struct RoundedProc {
    radius: f64,
}

impl RoundedProc {
    /// Round corners with the given radius.
    pub fn new(radius: f64) -> Self {
        Self {
            radius: radius.abs(),
        }
    }
}

struct Corner {
    setback: f64,
    arcs: Vec<Part>,
}

fn round_corner(u: &Point, v: &Point, w: &Point, radius: f64) -> Option<Corner> {
    let a = (u - v).normalize()?;
    let b = (w - v).normalize()?;
    let theta = a.dot(&b).clamp(-1.0, 1.0).acos();
    if theta < EPSILON || (PI - theta) < EPSILON {
        return None;
    }
    let half_tan = (theta / 2.0).tan();
    let shorter_half = (u.dist(v) / 2.0).min(w.dist(v) / 2.0);
    let r = radius.min(shorter_half * half_tan);
    if r < EPSILON {
        return None;
    }
    let setback = r / half_tan;
    let p_in = v + &(&a * setback);
    let p_out = v + &(&b * setback);
    let bisector = (&a + &b).normalize()?;
    let c = v + &(&bisector * (r / (theta / 2.0).sin()));
    let a0 = (&p_in - &c).angle();
    let a1 = (&p_out - &c).angle();
    let mut sweep = (a1 - a0).rem_euclid(TAU);
    if sweep > PI {
        sweep -= TAU;
    }
    Some(Corner {
        setback,
        arcs: make_arc_parts(c.x(), c.y(), r, r, 0.0, a0, sweep),
    })
}

impl PathProcessor for RoundedProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let parts: Vec<Part> = path.parts().collect();
        let n = parts.len();
        if n == 0 {
            return vec![path.clone()];
        }
        let corner_count = if path.closed() { n } else { n - 1 };
        // Corner i sits between part i and part i+1 (mod n).
        let corners: Vec<Option<Corner>> = (0..corner_count)
            .map(|i| {
                let next = &parts[(i + 1) % n];
                let prev = &parts[i];
                if !prev.is_line() || !next.is_line() {
                    return None;
                }
                round_corner(prev.first(), prev.last(), next.last(), self.radius)
            })
            .collect();
        let mut out: Vec<Part> = Vec::new();
        for (i, part) in parts.iter().enumerate() {
            let mut first = part.first().clone();
            let mut last = part.last().clone();
            if part.is_line() {
                // Trim by the setbacks of the corners at either end.
                let start_corner = if i == 0 {
                    if path.closed() {
                        corners.get(n - 1).and_then(Option::as_ref)
                    } else {
                        None
                    }
                } else {
                    corners.get(i - 1).and_then(Option::as_ref)
                };
                if let (Some(c), Some(dir)) = (start_corner, (&last - &first).normalize()) {
                    first = &first + &(&dir * c.setback);
                }
                if let (Some(c), Some(dir)) = (
                    corners.get(i).and_then(Option::as_ref),
                    (&last - &first).normalize(),
                ) {
                    last = &last - &(&dir * c.setback);
                }
                if !first.approx_eq(&last) {
                    out.push(Part::line(first, last));
                }
            } else {
                out.push(part.clone());
            }
            if let Some(Some(c)) = corners.get(i) {
                out.extend(c.arcs.iter().cloned());
            }
        }
        match Path::from_parts(out) {
            Ok(mut p) => {
                if path.closed() {
                    p.close();
                }
                vec![p]
            }
            Err(e) => {
                log::warn!("rounding dropped: {e}");
                vec![path.clone()]
            }
        }
    }
}

/// Replaces each part by a circular arc through its endpoints, bowed out
/// to a point at perpendicular distance `dist` from the chord midpoint.
///
/// Positive distances bow to the right-hand side of the part's direction.
/// Near-zero distances keep the chord as a line.
pub struct RoundedEdgeProc {
    dist: f64,
    relative: bool,
}

impl RoundedEdgeProc {
    /// Bow each part out by an absolute distance.
    pub fn new(dist: f64) -> Self {
        Self {
            dist,
            relative: false,
        }
    }

    /// Bow each part out by a fraction of its chord length.
    pub fn relative(dist: f64) -> Self {
        Self {
            dist,
            relative: true,
        }
    }
}

impl PathProcessor for RoundedEdgeProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let mut out: Vec<Part> = Vec::new();
        for part in path.parts() {
            let first = part.first().clone();
            let last = part.last().clone();
            let chord = &last - &first;
            let chord_len = chord.length();
            let dist = if self.relative {
                self.dist * chord_len
            } else {
                self.dist
            };
            if chord_len < EPSILON || dist.abs() < EPSILON {
                out.push(Part::line(first, last));
                continue;
            }
            let normal = Point::new(chord.y(), -chord.x()) * (1.0 / chord_len);
            let mid = first.lerp(&last, 0.5);
            let apex = &mid + &(&normal * dist);
            match curve::circumcircle(&first, &apex, &last) {
                Ok((c, r)) => {
                    let a0 = (&first - &c).angle();
                    let a1 = (&last - &c).angle();
                    let am = (&apex - &c).angle();
                    let mut sweep = (a1 - a0).rem_euclid(TAU);
                    if !curve::angle_in_sweep(am, a0, sweep) {
                        sweep -= TAU;
                    }
                    out.extend(make_arc_parts(c.x(), c.y(), r, r, 0.0, a0, sweep));
                }
                Err(_) => out.push(Part::line(first, last)),
            }
        }
        match Path::from_parts(out) {
            Ok(mut p) => {
                if path.closed() {
                    p.close();
                }
                vec![p]
            }
            Err(e) => {
                log::warn!("edge rounding dropped: {e}");
                vec![path.clone()]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder;

    #[test]
    fn right_angle_corner_is_rounded() {
        let p = builder::polyline([
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ])
        .unwrap();
        let out = RoundedProc::new(2.0).process(&p);
        assert_eq!(out.len(), 1);
        let parts: Vec<Part> = out[0].parts().collect();
        // line, arc, line.
        assert_eq!(parts.len(), 3);
        assert!(parts[0].last().approx_eq(&Point::new(8.0, 0.0)));
        assert!(parts[2].first().approx_eq(&Point::new(10.0, 2.0)));
        // Arc midpoint sits at radius 2 from the corner's arc center (8, 2).
        let (mid, _) = parts[1].eval(0.5);
        assert!((mid.dist(&Point::new(8.0, 2.0)) - 2.0).abs() < 0.01);
    }

    #[test]
    fn radius_is_clamped_to_short_legs() {
        let p = builder::polyline([
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
        ])
        .unwrap();
        let out = RoundedProc::new(100.0).process(&p);
        let parts: Vec<Part> = out[0].parts().collect();
        // Setback stops at half the leg length.
        assert!(parts[0].last().approx_eq(&Point::new(2.0, 0.0)));
    }

    #[test]
    fn closed_paths_round_the_seam_corner() {
        let square = builder::polygon([
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ])
        .unwrap();
        let out = RoundedProc::new(1.0).process(&square);
        assert!(out[0].closed());
        // Four trimmed edges and four corner arcs.
        assert_eq!(out[0].parts().count(), 8);
    }

    #[test]
    fn colinear_corners_are_left_alone() {
        let p = builder::polyline([
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
        ])
        .unwrap();
        let out = RoundedProc::new(2.0).process(&p);
        assert!(out[0].steps().iter().all(|s| s.degree() <= 1));
    }

    #[test]
    fn edges_bow_through_the_displaced_midpoint() {
        let p = builder::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        let out = RoundedEdgeProc::new(2.0).process(&p);
        let parts: Vec<Part> = out[0].parts().collect();
        assert!(parts.iter().any(|part| {
            let (m, _) = part.eval(0.5);
            m.dist(&Point::new(5.0, -2.0)) < 0.1 || part.last().dist(&Point::new(5.0, -2.0)) < 0.1
        }));
        assert!(out[0].start().approx_eq(&Point::new(0.0, 0.0)));
        assert!(out[0].end().approx_eq(&Point::new(10.0, 0.0)));
    }

    #[test]
    fn zero_distance_keeps_the_chord() {
        let p = builder::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        let out = RoundedEdgeProc::new(0.0).process(&p);
        assert!(out[0].steps().iter().all(|s| s.degree() <= 1));
    }
}
