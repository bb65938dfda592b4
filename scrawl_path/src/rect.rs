// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned rectangles.

use crate::point::Point;

/// An axis-aligned rectangle given by its minimum and maximum corners.
///
/// A rectangle with `x1 < x0` or `y1 < y0` is empty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// The minimum x coordinate.
    pub x0: f64,
    /// The minimum y coordinate.
    pub y0: f64,
    /// The maximum x coordinate.
    pub x1: f64,
    /// The maximum y coordinate.
    pub y1: f64,
}

impl Rect {
    /// A rectangle that is empty and absorbs nothing in unions.
    pub const EMPTY: Self = Self {
        x0: f64::INFINITY,
        y0: f64::INFINITY,
        x1: f64::NEG_INFINITY,
        y1: f64::NEG_INFINITY,
    };

    /// Create a new rectangle from its corners.
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// The tight bounding box of a point set (xy only).
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        let mut r = Self::EMPTY;
        for p in points {
            r.x0 = r.x0.min(p.x());
            r.y0 = r.y0.min(p.y());
            r.x1 = r.x1.max(p.x());
            r.y1 = r.y1.max(p.y());
        }
        r
    }

    /// Whether the rectangle contains no area.
    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// The width, or 0 for empty rectangles.
    pub fn width(&self) -> f64 {
        (self.x1 - self.x0).max(0.0)
    }

    /// The height, or 0 for empty rectangles.
    pub fn height(&self) -> f64 {
        (self.y1 - self.y0).max(0.0)
    }

    /// The smallest rectangle covering both inputs.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// The overlap of both inputs (possibly empty).
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    /// Whether the point lies inside (max edges exclusive).
    pub fn contains(&self, p: &Point) -> bool {
        p.x() >= self.x0 && p.x() < self.x1 && p.y() >= self.y0 && p.y() < self.y1
    }

    /// Translate by (dx, dy).
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }

    /// The pixel-inclusive expansion of this rectangle: minimum corner
    /// floored, maximum corner floored plus one, so that every pixel the
    /// geometry touches is inside.
    pub fn pixel_bounds(&self) -> Self {
        if self.x1 < self.x0 || self.y1 < self.y0 {
            return Self::EMPTY;
        }
        Self {
            x0: self.x0.floor(),
            y0: self.y0.floor(),
            x1: self.x1.floor() + 1.0,
            y1: self.y1.floor() + 1.0,
        }
    }

    /// The center of the rectangle.
    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) * 0.5, (self.y0 + self.y1) * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_and_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 20.0, 8.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(a.intersect(&b), Rect::new(5.0, 5.0, 10.0, 8.0));
        assert!(a.intersect(&Rect::new(20.0, 20.0, 30.0, 30.0)).is_empty());
    }

    #[test]
    fn pixel_bounds_are_inclusive() {
        let r = Rect::from_points([&Point::new(0.0, 0.0), &Point::new(100.0, 0.0)]);
        assert_eq!(r.pixel_bounds(), Rect::new(0.0, 0.0, 101.0, 1.0));
    }

    #[test]
    fn empty_absorbs_nothing() {
        let r = Rect::EMPTY.union(&Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(r, Rect::new(1.0, 2.0, 3.0, 4.0));
    }
}
