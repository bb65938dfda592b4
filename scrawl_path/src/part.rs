// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single polynomial Bézier segment.

use crate::affine::Affine;
use crate::curve;
use crate::point::Point;
use crate::rect::Rect;
use crate::EPSILON;
use smallvec::SmallVec;

/// One polynomial Bézier segment of arbitrary degree: `degree + 1` control
/// points, the first and last of which lie on the curve.
#[derive(Clone, Debug, PartialEq)]
pub struct Part {
    points: SmallVec<[Point; 4]>,
}

impl Part {
    /// Create a part from its control points.
    ///
    /// # Panics
    ///
    /// Panics when fewer than two control points are given.
    pub fn new(points: impl IntoIterator<Item = Point>) -> Self {
        let points: SmallVec<[Point; 4]> = points.into_iter().collect();
        assert!(points.len() >= 2, "a part needs at least two control points");
        Self { points }
    }

    /// A straight line segment.
    pub fn line(p0: Point, p1: Point) -> Self {
        Self::new([p0, p1])
    }

    /// The polynomial degree (1 = line, 2 = quadratic, 3 = cubic, …).
    pub fn degree(&self) -> usize {
        self.points.len() - 1
    }

    /// All control points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The start point.
    pub fn first(&self) -> &Point {
        &self.points[0]
    }

    /// The end point.
    pub fn last(&self) -> &Point {
        &self.points[self.points.len() - 1]
    }

    /// Whether this part is a straight line.
    pub fn is_line(&self) -> bool {
        self.degree() == 1
    }

    /// Evaluate the curve point and (unnormalized) tangent at `t`.
    pub fn eval(&self, t: f64) -> (Point, Point) {
        curve::de_casteljau(&self.points, t)
    }

    /// Split into two parts at `t`.
    pub fn split(&self, t: f64) -> (Self, Self) {
        let (l, r) = curve::split(&self.points, t);
        (Self::new(l), Self::new(r))
    }

    /// Split at several ascending interior parameters.
    pub fn split_at(&self, ts: &[f64]) -> Vec<Self> {
        curve::split_at(&self.points, ts)
            .into_iter()
            .map(Self::new)
            .collect()
    }

    /// Extremity and inflection parameters; see [`curve::extremities`].
    pub fn extremities(&self) -> Vec<f64> {
        curve::extremities(&self.points)
    }

    /// Flatten into polyline vertices within the given tolerance.
    pub fn flatten(&self, tolerance: f64) -> Vec<Point> {
        curve::flatten(&self.points, tolerance)
    }

    /// Flatten while tracking the parameter of each vertex.
    pub fn flatten_with_t(&self, tolerance: f64) -> Vec<(f64, Point)> {
        curve::flatten_with_t(&self.points, tolerance)
    }

    /// Cut into well-behaved sub-parts; see [`curve::simplify`].
    pub fn simplify(&self) -> Vec<Self> {
        curve::simplify(&self.points)
            .into_iter()
            .map(Self::new)
            .collect()
    }

    /// Arc length, measured on a flattening at the given tolerance.
    pub fn length(&self, tolerance: f64) -> f64 {
        self.flatten(tolerance)
            .windows(2)
            .map(|w| w[0].dist(&w[1]))
            .sum()
    }

    /// Tight bounding box of the control points (a conservative bound on
    /// the curve itself; exact for lines).
    pub fn bounds(&self) -> Rect {
        curve::bounds(&self.points)
    }

    /// The same curve traversed in the opposite direction.
    pub fn reverse(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Apply an affine to every control point.
    pub fn transform(&self, t: &Affine) -> Self {
        Self {
            points: self.points.iter().map(|p| t.apply(p)).collect(),
        }
    }

    /// Unit tangent at the start, scanning past coincident leading control
    /// points; `None` for a fully degenerate part.
    pub fn tangent_start(&self) -> Option<Point> {
        for p in &self.points[1..] {
            if let Some(u) = (p - self.first()).normalize() {
                return Some(u);
            }
        }
        None
    }

    /// Unit tangent at the end, scanning past coincident trailing control
    /// points; `None` for a fully degenerate part.
    pub fn tangent_end(&self) -> Option<Point> {
        let last = self.last();
        for p in self.points[..self.points.len() - 1].iter().rev() {
            if let Some(u) = (last - p).normalize() {
                return Some(u);
            }
        }
        None
    }

    /// Whether start and end coincide within ε.
    pub fn is_degenerate(&self) -> bool {
        self.first().dist_sq(self.last()) < EPSILON * EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_swaps_direction() {
        let p = Part::new([
            Point::new(0.0, 0.0),
            Point::new(50.0, 100.0),
            Point::new(100.0, 0.0),
        ]);
        let r = p.reverse();
        assert_eq!(r.first(), p.last());
        let (a, _) = p.eval(0.25);
        let (b, _) = r.eval(0.75);
        assert!(a.approx_eq(&b));
    }

    #[test]
    fn length_of_a_line() {
        let p = Part::line(Point::new(0.0, 0.0), Point::new(30.0, 40.0));
        assert!((p.length(0.1) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn tangents_skip_coincident_controls() {
        let p = Part::new([
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        ]);
        assert!(p.tangent_start().unwrap().approx_eq(&Point::new(1.0, 0.0)));
        assert!(p.tangent_end().unwrap().approx_eq(&Point::new(1.0, 0.0)));
    }
}
