// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cap geometry closing the gap at an open stroke end.
//!
//! A cap connects `from` (the end of one offset side) to `to` (the start
//! of the other), around `anchor` (the source path's endpoint). The gap
//! spans the stroke width, so the half-width is `|from − anchor|` and the
//! outward direction is `from − anchor` rotated a quarter turn
//! counterclockwise, which coincides with the end tangent.

use crate::builder::make_arc_parts;
use crate::part::Part;
use crate::point::Point;
use crate::EPSILON;
use core::f64::consts::{FRAC_PI_2, PI};

/// How an open stroke is closed at an end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cap {
    /// Straight line across the gap.
    Butt,
    /// Semicircle bulging outward.
    Round,
    /// Square extension of half the stroke width.
    Square,
    /// Square extension closed by a concave semicircle through the anchor.
    InvRound,
    /// Half-ellipse bulging outward; `ratio` scales its height relative to
    /// the half-width and `offset` displaces its center outward (also in
    /// half-widths).
    Oval {
        /// Height of the half-ellipse in half-widths.
        ratio: f64,
        /// Outward center displacement in half-widths.
        offset: f64,
    },
    /// Extension closed by a concave half-ellipse through the anchor.
    InvOval {
        /// Depth of the concave half-ellipse in half-widths.
        ratio: f64,
    },
    /// Square extension with quarter-rounded corners.
    RoundedSquare,
    /// Arrow head: barbs at twice the half-width, apex one width out.
    Head,
    /// Swallow tail: outward barbs notched back to the anchor.
    Tail,
    /// Triangular apex half a width out.
    Point,
    /// Square extension notched back to the anchor.
    InvPoint,
}

impl Cap {
    /// Build the parts bridging `from` to `to` around `anchor`.
    ///
    /// Returns an empty sequence for a degenerate (zero-width) gap.
    pub fn parts(&self, from: &Point, anchor: &Point, to: &Point) -> Vec<Part> {
        let n = from - anchor;
        let w2 = n.length();
        if w2 < EPSILON {
            return Vec::new();
        }
        let out = n.perp() * (1.0 / w2);
        let ang = n.angle();
        match self {
            Self::Butt => vec![Part::line(from.clone(), to.clone())],
            Self::Round => {
                make_arc_parts(anchor.x(), anchor.y(), w2, w2, 0.0, ang, PI)
            }
            Self::Square => {
                let a = from + &(&out * w2);
                let b = to + &(&out * w2);
                vec![
                    Part::line(from.clone(), a.clone()),
                    Part::line(a, b.clone()),
                    Part::line(b, to.clone()),
                ]
            }
            Self::InvRound => {
                let c = anchor + &(&out * w2);
                let a = from + &(&out * w2);
                let b = to + &(&out * w2);
                let mut parts = vec![Part::line(from.clone(), a)];
                parts.extend(make_arc_parts(c.x(), c.y(), w2, w2, 0.0, ang, -PI));
                parts.push(Part::line(b, to.clone()));
                parts
            }
            Self::Oval { ratio, offset } => {
                let c = anchor + &(&out * (offset * w2));
                let mut parts = Vec::new();
                if offset.abs() > EPSILON {
                    parts.push(Part::line(from.clone(), &c + &n));
                }
                parts.extend(make_arc_parts(
                    c.x(),
                    c.y(),
                    w2,
                    w2 * ratio,
                    ang,
                    0.0,
                    PI,
                ));
                if offset.abs() > EPSILON {
                    parts.push(Part::line(&c - &n, to.clone()));
                }
                parts
            }
            Self::InvOval { ratio } => {
                let h = w2 * ratio;
                let c = anchor + &(&out * h);
                let a = from + &(&out * h);
                let b = to + &(&out * h);
                let mut parts = vec![Part::line(from.clone(), a)];
                parts.extend(make_arc_parts(c.x(), c.y(), w2, h, ang, 0.0, -PI));
                parts.push(Part::line(b, to.clone()));
                parts
            }
            Self::RoundedSquare => {
                let r = w2 * 0.5;
                let un = &n * (1.0 / w2);
                // Corner centers sit one radius inside each square corner.
                let c1 = &(from + &(&out * (w2 - r))) - &(&un * r);
                let c2 = &(to + &(&out * (w2 - r))) + &(&un * r);
                let mut parts = vec![Part::line(from.clone(), from + &(&out * (w2 - r)))];
                parts.extend(make_arc_parts(c1.x(), c1.y(), r, r, 0.0, ang, FRAC_PI_2));
                parts.push(Part::line(&c1 + &(&out * r), &c2 + &(&out * r)));
                parts.extend(make_arc_parts(
                    c2.x(),
                    c2.y(),
                    r,
                    r,
                    0.0,
                    out.angle(),
                    FRAC_PI_2,
                ));
                parts.push(Part::line(to + &(&out * (w2 - r)), to.clone()));
                parts
            }
            Self::Head => {
                let barb_r = anchor + &(&n * 2.0);
                let apex = anchor + &(&out * (2.0 * w2));
                let barb_l = anchor - &(&n * 2.0);
                polyline_parts(&[from.clone(), barb_r, apex, barb_l, to.clone()])
            }
            Self::Tail => {
                let barb_r = &(anchor + &(&n * 2.0)) + &(&out * w2);
                let barb_l = &(anchor - &(&n * 2.0)) + &(&out * w2);
                polyline_parts(&[from.clone(), barb_r, anchor.clone(), barb_l, to.clone()])
            }
            Self::Point => {
                let apex = anchor + &(&out * w2);
                polyline_parts(&[from.clone(), apex, to.clone()])
            }
            Self::InvPoint => {
                let a = from + &(&out * w2);
                let b = to + &(&out * w2);
                polyline_parts(&[from.clone(), a, anchor.clone(), b, to.clone()])
            }
        }
    }
}

fn polyline_parts(points: &[Point]) -> Vec<Part> {
    points
        .windows(2)
        .filter(|w| !w[0].approx_eq(&w[1]))
        .map(|w| Part::line(w[0].clone(), w[1].clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // End of a horizontal stroke heading east, width 2: right offset ends
    // at (10, -1), anchor (10, 0), left offset resumes at (10, 1).
    fn setup() -> (Point, Point, Point) {
        (
            Point::new(10.0, -1.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 1.0),
        )
    }

    fn endpoints_match(parts: &[Part], from: &Point, to: &Point) {
        assert!(parts.first().unwrap().first().approx_eq(from));
        assert!(parts.last().unwrap().last().approx_eq(to));
        for w in parts.windows(2) {
            assert!(w[0].last().approx_eq(w[1].first()));
        }
    }

    #[test]
    fn butt_is_one_line() {
        let (f, a, t) = setup();
        let out = Cap::Butt.parts(&f, &a, &t);
        assert_eq!(out.len(), 1);
        endpoints_match(&out, &f, &t);
        let _ = a;
    }

    #[test]
    fn round_bulges_along_the_tangent() {
        let (f, a, t) = setup();
        let out = Cap::Round.parts(&f, &a, &t);
        endpoints_match(&out, &f, &t);
        // The outermost point sits one half-width past the anchor.
        assert!(out
            .iter()
            .any(|p| p.last().approx_eq(&Point::new(11.0, 0.0))));
    }

    #[test]
    fn square_extends_half_a_width() {
        let (f, a, t) = setup();
        let out = Cap::Square.parts(&f, &a, &t);
        assert_eq!(out.len(), 3);
        assert!(out[1].first().approx_eq(&Point::new(11.0, -1.0)));
        endpoints_match(&out, &f, &t);
        let _ = a;
    }

    #[test]
    fn inv_round_passes_through_the_anchor() {
        let (f, a, t) = setup();
        let out = Cap::InvRound.parts(&f, &a, &t);
        endpoints_match(&out, &f, &t);
        assert!(out.iter().any(|p| p.last().approx_eq(&a)));
    }

    #[test]
    fn point_has_an_apex() {
        let (f, a, t) = setup();
        let out = Cap::Point.parts(&f, &a, &t);
        assert_eq!(out.len(), 2);
        assert!(out[0].last().approx_eq(&Point::new(11.0, 0.0)));
        endpoints_match(&out, &f, &t);
        let _ = a;
    }

    #[test]
    fn head_barbs_extend_past_the_stroke() {
        let (f, a, t) = setup();
        let out = Cap::Head.parts(&f, &a, &t);
        endpoints_match(&out, &f, &t);
        assert!(out.iter().any(|p| p.last().approx_eq(&Point::new(12.0, 0.0))));
        assert!(out.iter().any(|p| p.last().approx_eq(&Point::new(10.0, 2.0))));
    }

    #[test]
    fn degenerate_gap_yields_nothing() {
        let a = Point::new(5.0, 5.0);
        assert!(Cap::Round.parts(&a, &a, &a).is_empty());
    }
}
