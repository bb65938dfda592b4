// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2D affine transforms.
//!
//! An [`Affine`] is a 2×3 matrix stored row-major (the implicit third row
//! is `[0 0 1]`). All the named constructions (rotations, reflections,
//! segment-to-segment maps, box fitting) compose down to a single matrix.

use crate::error::{Error, Result};
use crate::point::Point;
use crate::rect::Rect;
use crate::EPSILON;

/// A 2D affine transform.
///
/// Coefficients `[a, b, c, d, e, f]` map `(x, y)` to
/// `(a·x + b·y + c, d·x + e·y + f)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    coeffs: [f64; 6],
}

impl Affine {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        coeffs: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    };

    /// Construct from raw row-major coefficients.
    pub const fn new(coeffs: [f64; 6]) -> Self {
        Self { coeffs }
    }

    /// The raw row-major coefficients.
    pub const fn as_coeffs(&self) -> [f64; 6] {
        self.coeffs
    }

    /// Whether this transform is the identity, within ε.
    pub fn is_identity(&self) -> bool {
        let [a, b, c, d, e, f] = self.coeffs;
        (a - 1.0).abs() < EPSILON
            && b.abs() < EPSILON
            && c.abs() < EPSILON
            && d.abs() < EPSILON
            && (e - 1.0).abs() < EPSILON
            && f.abs() < EPSILON
    }

    /// The determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        let [a, b, _, d, e, _] = self.coeffs;
        a * e - b * d
    }

    /// The inverse transform, or [`Error::Singular`] when the determinant
    /// magnitude is below ε.
    pub fn invert(&self) -> Result<Self> {
        let det = self.determinant();
        if det.abs() < EPSILON {
            return Err(Error::Singular);
        }
        let [a, b, c, d, e, f] = self.coeffs;
        let inv = 1.0 / det;
        Ok(Self::new([
            e * inv,
            -b * inv,
            (b * f - c * e) * inv,
            -d * inv,
            a * inv,
            (c * d - a * f) * inv,
        ]))
    }

    /// Apply to a point. Attribute coordinates beyond x and y pass through
    /// untouched.
    pub fn apply(&self, p: &Point) -> Point {
        let [a, b, c, d, e, f] = self.coeffs;
        let x = a * p.x() + b * p.y() + c;
        let y = d * p.x() + e * p.y() + f;
        let mut coords = vec![x, y];
        coords.extend_from_slice(&p.coords()[2.min(p.coords().len())..]);
        Point::from_coords(coords)
    }

    /// Apply to a sequence of points.
    pub fn apply_to(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|p| self.apply(p)).collect()
    }

    /// This transform followed by `other`.
    pub fn then(&self, other: &Self) -> Self {
        *other * *self
    }

    /// A pure translation.
    pub fn translate(dx: f64, dy: f64) -> Self {
        Self::new([1.0, 0.0, dx, 0.0, 1.0, dy])
    }

    /// Rotation about the origin by `theta` radians (counter-clockwise for
    /// y-up coordinates).
    pub fn rotate(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::new([c, -s, 0.0, s, c, 0.0])
    }

    /// Rotation about an arbitrary point.
    pub fn rotate_about(theta: f64, center: &Point) -> Self {
        Self::translate(-center.x(), -center.y())
            .then(&Self::rotate(theta))
            .then(&Self::translate(center.x(), center.y()))
    }

    /// Rotation by `n` quarter turns, built by coefficient swaps rather
    /// than trigonometry so that axes map to axes exactly.
    pub fn quadrant_rotate(n: i32) -> Self {
        match n.rem_euclid(4) {
            0 => Self::IDENTITY,
            1 => Self::new([0.0, -1.0, 0.0, 1.0, 0.0, 0.0]),
            2 => Self::new([-1.0, 0.0, 0.0, 0.0, -1.0, 0.0]),
            _ => Self::new([0.0, 1.0, 0.0, -1.0, 0.0, 0.0]),
        }
    }

    /// Uniform scale about the origin.
    pub fn scale(s: f64) -> Self {
        Self::scale_xy(s, s)
    }

    /// Per-axis scale about the origin.
    pub fn scale_xy(sx: f64, sy: f64) -> Self {
        Self::new([sx, 0.0, 0.0, 0.0, sy, 0.0])
    }

    /// Per-axis scale about an arbitrary point.
    pub fn scale_about(sx: f64, sy: f64, center: &Point) -> Self {
        Self::translate(-center.x(), -center.y())
            .then(&Self::scale_xy(sx, sy))
            .then(&Self::translate(center.x(), center.y()))
    }

    /// Shear by the given x and y factors.
    pub fn shear(shx: f64, shy: f64) -> Self {
        Self::new([1.0, shx, 0.0, shy, 1.0, 0.0])
    }

    /// Reflection across the line through `p1` and `p2`.
    ///
    /// Fails with [`Error::CurveDegenerate`] when the points coincide.
    pub fn reflect(p1: &Point, p2: &Point) -> Result<Self> {
        if p1.approx_eq(p2) {
            return Err(Error::CurveDegenerate("reflection axis points coincide"));
        }
        let theta = (p2 - p1).angle();
        Ok(Self::translate(-p1.x(), -p1.y())
            .then(&Self::rotate(-theta))
            .then(&Self::scale_xy(1.0, -1.0))
            .then(&Self::rotate(theta))
            .then(&Self::translate(p1.x(), p1.y())))
    }

    /// The transform that carries the segment `s1→s2` onto `d1→d2`:
    /// translation, rotation, and a uniform scale.
    ///
    /// Fails with [`Error::Singular`] when the source segment is degenerate.
    pub fn line_to_line(s1: &Point, s2: &Point, d1: &Point, d2: &Point) -> Result<Self> {
        let sv = s2 - s1;
        let dv = d2 - d1;
        let slen = sv.length();
        if slen < EPSILON {
            return Err(Error::Singular);
        }
        let scale = dv.length() / slen;
        let theta = dv.angle() - sv.angle();
        Ok(Self::translate(-s1.x(), -s1.y())
            .then(&Self::rotate(theta))
            .then(&Self::scale(scale))
            .then(&Self::translate(d1.x(), d1.y())))
    }

    /// Like [`Affine::line_to_line`], but the axis perpendicular to the
    /// segment is scaled by `perp_scale` instead of the segment's own
    /// length ratio.
    pub fn box_to_line(
        s1: &Point,
        s2: &Point,
        d1: &Point,
        d2: &Point,
        perp_scale: f64,
    ) -> Result<Self> {
        let sv = s2 - s1;
        let dv = d2 - d1;
        let slen = sv.length();
        if slen < EPSILON {
            return Err(Error::Singular);
        }
        let along = dv.length() / slen;
        Ok(Self::translate(-s1.x(), -s1.y())
            .then(&Self::rotate(-sv.angle()))
            .then(&Self::scale_xy(along, perp_scale))
            .then(&Self::rotate(dv.angle()))
            .then(&Self::translate(d1.x(), d1.y())))
    }

    /// Fit `src` into `dst`, optionally preserving aspect ratio (in which
    /// case the scaled source is centered inside `dst`).
    ///
    /// Fails with [`Error::Singular`] when `src` has no area.
    pub fn fit_box(src: &Rect, dst: &Rect, preserve_aspect: bool) -> Result<Self> {
        if src.width() < EPSILON || src.height() < EPSILON {
            return Err(Error::Singular);
        }
        let (mut sx, mut sy) = (dst.width() / src.width(), dst.height() / src.height());
        if preserve_aspect {
            let s = sx.min(sy);
            sx = s;
            sy = s;
        }
        let sc = src.center();
        let dc = dst.center();
        Ok(Self::translate(-sc.x(), -sc.y())
            .then(&Self::scale_xy(sx, sy))
            .then(&Self::translate(dc.x(), dc.y())))
    }

    /// Reflection across the horizontal line at height `y`.
    pub fn flip_y(y: f64) -> Self {
        Self::new([1.0, 0.0, 0.0, 0.0, -1.0, 2.0 * y])
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Composition: `(a * b)` applies `b` first, then `a`.
impl core::ops::Mul for Affine {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let [a1, b1, c1, d1, e1, f1] = self.coeffs;
        let [a2, b2, c2, d2, e2, f2] = rhs.coeffs;
        Self::new([
            a1 * a2 + b1 * d2,
            a1 * b2 + b1 * e2,
            a1 * c2 + b1 * f2 + c1,
            d1 * a2 + e1 * d2,
            d1 * b2 + e1 * e2,
            d1 * c2 + e1 * f2 + f1,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(p: &Point, x: f64, y: f64) {
        assert!(
            (p.x() - x).abs() < 1e-9 && (p.y() - y).abs() < 1e-9,
            "got ({}, {}), want ({x}, {y})",
            p.x(),
            p.y()
        );
    }

    #[test]
    fn inverse_round_trips() {
        let t = Affine::translate(3.0, -2.0)
            .then(&Affine::rotate(0.7))
            .then(&Affine::scale_xy(2.0, 0.5))
            .then(&Affine::shear(0.3, 0.0));
        let inv = t.invert().unwrap();
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, -4.0),
            Point::new(-3.5, 7.25),
        ];
        for p in &points {
            let q = inv.apply(&t.apply(p));
            assert!((q.x() - p.x()).abs() < 1e-4 && (q.y() - p.y()).abs() < 1e-4);
        }
    }

    #[test]
    fn singular_is_refused() {
        assert_eq!(Affine::scale_xy(1.0, 0.0).invert(), Err(Error::Singular));
    }

    #[test]
    fn quadrant_rotate_is_exact() {
        let p = Point::new(3.0, 1.0);
        assert_close(&Affine::quadrant_rotate(1).apply(&p), -1.0, 3.0);
        assert_close(&Affine::quadrant_rotate(2).apply(&p), -3.0, -1.0);
        assert_close(&Affine::quadrant_rotate(3).apply(&p), 1.0, -3.0);
        assert_eq!(Affine::quadrant_rotate(4), Affine::IDENTITY);
    }

    #[test]
    fn rotate_about_keeps_center_fixed() {
        let c = Point::new(5.0, 5.0);
        let t = Affine::rotate_about(1.2, &c);
        assert_close(&t.apply(&c), 5.0, 5.0);
    }

    #[test]
    fn line_to_line_maps_endpoints() {
        let t = Affine::line_to_line(
            &Point::new(0.0, 0.0),
            &Point::new(1.0, 0.0),
            &Point::new(2.0, 2.0),
            &Point::new(2.0, 4.0),
        )
        .unwrap();
        assert_close(&t.apply(&Point::new(0.0, 0.0)), 2.0, 2.0);
        assert_close(&t.apply(&Point::new(1.0, 0.0)), 2.0, 4.0);
        // Uniform scale: the unit perpendicular keeps its (scaled) length.
        assert_close(&t.apply(&Point::new(0.0, 1.0)), 0.0, 2.0);
    }

    #[test]
    fn reflect_swaps_sides() {
        let t = Affine::reflect(&Point::new(0.0, 0.0), &Point::new(1.0, 1.0)).unwrap();
        assert_close(&t.apply(&Point::new(1.0, 0.0)), 0.0, 1.0);
        assert!(Affine::reflect(&Point::new(1.0, 1.0), &Point::new(1.0, 1.0)).is_err());
    }

    #[test]
    fn attributes_pass_through() {
        let t = Affine::translate(1.0, 1.0);
        let p = Point::from_coords([0.0, 0.0, 42.0]);
        assert_eq!(t.apply(&p).coords(), &[1.0, 1.0, 42.0]);
    }

    #[test]
    fn fit_box_centers_with_aspect() {
        let src = Rect::new(0.0, 0.0, 10.0, 10.0);
        let dst = Rect::new(0.0, 0.0, 40.0, 20.0);
        let t = Affine::fit_box(&src, &dst, true).unwrap();
        assert_close(&t.apply(&Point::new(5.0, 5.0)), 20.0, 10.0);
        assert_close(&t.apply(&Point::new(0.0, 0.0)), 10.0, 0.0);
    }
}
