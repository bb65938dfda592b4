// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Join geometry between consecutive offset parts.

use crate::builder::make_arc_parts;
use crate::curve;
use crate::part::Part;
use crate::point::Point;
use crate::EPSILON;
use core::f64::consts::PI;

/// How the gap between two consecutive offset parts is bridged at a
/// corner of the source path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Join {
    /// A straight line across the gap.
    Bevel,
    /// A circular arc centered on the corner. Falls back to a bevel on
    /// the inner side of a turn, where no outward arc exists.
    Round,
    /// Extend both offset tangents to their intersection. `limit` is the
    /// sharpest corner angle (in radians, measured between the incoming
    /// and outgoing directions) still mitered; sharper corners bevel.
    Miter {
        /// Corner-angle cutoff in radians.
        limit: f64,
    },
}

impl Join {
    /// Bridge from the end of `prev` to the start of `next`, both offset
    /// parts around the source corner `anchor`.
    pub fn parts(&self, prev: &Part, anchor: &Point, next: &Part) -> Vec<Part> {
        let from = prev.last().clone();
        let to = next.first().clone();
        if from.approx_eq(&to) {
            return Vec::new();
        }
        match self {
            Self::Bevel => vec![Part::line(from, to)],
            Self::Round => {
                let v0 = &from - anchor;
                let v1 = &to - anchor;
                let sweep = v0.cross(&v1).atan2(v0.dot(&v1));
                if sweep <= EPSILON {
                    return Self::Bevel.parts(prev, anchor, next);
                }
                let r = v0.length();
                make_arc_parts(anchor.x(), anchor.y(), r, r, 0.0, v0.angle(), sweep)
            }
            Self::Miter { limit } => {
                let (Some(t0), Some(t1)) = (prev.tangent_end(), next.tangent_start()) else {
                    return Self::Bevel.parts(prev, anchor, next);
                };
                let corner = t0.cross(&t1).atan2(t0.dot(&t1)).abs();
                if corner > PI - limit {
                    return Self::Bevel.parts(prev, anchor, next);
                }
                match curve::line_intersection(&from, &(&from + &t0), &to, &(&to - &t1)) {
                    Ok((ta, _)) => {
                        let apex = &from + &(&t0 * ta);
                        vec![Part::line(from, apex.clone()), Part::line(apex, to)]
                    }
                    Err(_) => Self::Bevel.parts(prev, anchor, next),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right_angle_setup() -> (Part, Point, Part) {
        // Source corner at (10, 0): east-bound then north-bound, offset to
        // the right-hand side by 1.
        let prev = Part::line(Point::new(0.0, -1.0), Point::new(10.0, -1.0));
        let next = Part::line(Point::new(11.0, 0.0), Point::new(11.0, 10.0));
        (prev, Point::new(10.0, 0.0), next)
    }

    #[test]
    fn bevel_is_a_single_line() {
        let (prev, anchor, next) = right_angle_setup();
        let out = Join::Bevel.parts(&prev, &anchor, &next);
        assert_eq!(out.len(), 1);
        assert!(out[0].is_line());
    }

    #[test]
    fn round_arc_stays_on_the_corner_circle() {
        let (prev, anchor, next) = right_angle_setup();
        let out = Join::Round.parts(&prev, &anchor, &next);
        assert!(!out.is_empty());
        for part in &out {
            let (mid, _) = part.eval(0.5);
            assert!((mid.dist(&anchor) - 1.0).abs() < 0.01);
        }
        assert!(out[0].first().approx_eq(prev.last()));
        assert!(out.last().unwrap().last().approx_eq(next.first()));
    }

    #[test]
    fn round_degrades_to_bevel_on_inner_side() {
        // Right turn with a right-hand offset: the signed sweep is
        // negative, so no outward arc exists.
        let prev = Part::line(Point::new(0.0, -1.0), Point::new(10.0, -1.0));
        let next = Part::line(Point::new(9.0, 0.0), Point::new(9.0, -10.0));
        let out = Join::Round.parts(&prev, &Point::new(10.0, 0.0), &next);
        assert_eq!(out.len(), 1);
        assert!(out[0].is_line());
    }

    #[test]
    fn miter_meets_at_the_extended_corner() {
        let (prev, anchor, next) = right_angle_setup();
        let out = Join::Miter { limit: 0.2 }.parts(&prev, &anchor, &next);
        assert_eq!(out.len(), 2);
        assert!(out[0].last().approx_eq(&Point::new(11.0, -1.0)));
        let _ = anchor;
    }

    #[test]
    fn miter_bevels_past_the_limit() {
        // A near-reversal corner is far sharper than the limit allows.
        let prev = Part::line(Point::new(0.0, -1.0), Point::new(10.0, -1.0));
        let next = Part::line(Point::new(10.2, 1.0), Point::new(0.0, 1.0));
        let out = Join::Miter { limit: 0.5 }.parts(&prev, &Point::new(10.0, 0.0), &next);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn coincident_ends_need_no_join() {
        let prev = Part::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let next = Part::line(Point::new(10.0, 0.0), Point::new(20.0, 0.0));
        assert!(Join::Round
            .parts(&prev, &Point::new(10.0, 0.0), &next)
            .is_empty());
    }
}
