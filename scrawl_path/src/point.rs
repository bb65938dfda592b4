// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Points in ℝᵈ, d ≥ 2.
//!
//! Coordinates 0 and 1 are x and y. Any further coordinates are
//! application-defined attributes: affine transforms and curve
//! interpolation carry them along, while metric operations (distance,
//! dot, cross, angle) look only at x and y.

use crate::EPSILON;
use smallvec::{smallvec, SmallVec};
use std::ops::Mul;

/// A point (or direction vector) with two geometric coordinates and any
/// number of attribute coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    coords: SmallVec<[f64; 2]>,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self {
        coords: SmallVec::new_const(),
    };

    /// Create a new two-dimensional point.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            coords: smallvec![x, y],
        }
    }

    /// Create a point from a full coordinate tuple.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two coordinates are supplied.
    pub fn from_coords(coords: impl IntoIterator<Item = f64>) -> Self {
        let coords: SmallVec<[f64; 2]> = coords.into_iter().collect();
        assert!(coords.len() >= 2, "a point needs at least x and y");
        Self { coords }
    }

    /// The x coordinate.
    #[inline]
    pub fn x(&self) -> f64 {
        self.coords.first().copied().unwrap_or(0.0)
    }

    /// The y coordinate.
    #[inline]
    pub fn y(&self) -> f64 {
        self.coords.get(1).copied().unwrap_or(0.0)
    }

    /// All coordinates, x and y first.
    #[inline]
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// The number of coordinates (always ≥ 2 for points built through the
    /// public constructors; [`Point::ZERO`] reports 0 but reads as the
    /// origin).
    #[inline]
    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    /// Linear interpolation between `self` (t = 0) and `other` (t = 1),
    /// across the full coordinate tuple.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let n = self.coords.len().max(other.coords.len()).max(2);
        let coords = (0..n)
            .map(|i| {
                let a = self.coord_or_zero(i);
                let b = other.coord_or_zero(i);
                a + (b - a) * t
            })
            .collect();
        Self { coords }
    }

    fn coord_or_zero(&self, i: usize) -> f64 {
        self.coords.get(i).copied().unwrap_or(0.0)
    }

    /// Squared Euclidean distance to `other` in the xy plane.
    pub fn dist_sq(&self, other: &Self) -> f64 {
        let dx = self.x() - other.x();
        let dy = self.y() - other.y();
        dx * dx + dy * dy
    }

    /// Euclidean distance to `other` in the xy plane.
    pub fn dist(&self, other: &Self) -> f64 {
        self.dist_sq(other).sqrt()
    }

    /// Length of this point read as a vector from the origin.
    pub fn length(&self) -> f64 {
        self.x().hypot(self.y())
    }

    /// Dot product in the xy plane.
    pub fn dot(&self, other: &Self) -> f64 {
        self.x() * other.x() + self.y() * other.y()
    }

    /// Z component of the cross product in the xy plane.
    pub fn cross(&self, other: &Self) -> f64 {
        self.x() * other.y() - self.y() * other.x()
    }

    /// The angle of this vector, in radians in (−π, π].
    pub fn angle(&self) -> f64 {
        self.y().atan2(self.x())
    }

    /// This vector rotated 90° counter-clockwise. Attribute coordinates
    /// are dropped; the result is a pure direction.
    pub fn perp(&self) -> Self {
        Self::new(-self.y(), self.x())
    }

    /// A unit-length copy, or `None` when the vector is shorter than ε.
    pub fn normalize(&self) -> Option<Self> {
        let len = self.length();
        if len < EPSILON {
            None
        } else {
            Some(Self::new(self.x() / len, self.y() / len))
        }
    }

    /// Whether the xy coordinates of both points agree within ε = 1e-6.
    pub fn approx_eq(&self, other: &Self) -> bool {
        (self.x() - other.x()).abs() < EPSILON && (self.y() - other.y()).abs() < EPSILON
    }

    /// Whether any coordinate is NaN.
    pub fn is_nan(&self) -> bool {
        self.coords.iter().any(|c| c.is_nan())
    }

    fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let n = self.coords.len().max(other.coords.len()).max(2);
        let coords = (0..n)
            .map(|i| f(self.coord_or_zero(i), other.coord_or_zero(i)))
            .collect();
        Self { coords }
    }
}

impl From<(f64, f64)> for Point {
    fn from(p: (f64, f64)) -> Self {
        Self::new(p.0, p.1)
    }
}

impl From<[f64; 2]> for Point {
    fn from(p: [f64; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl core::ops::$trait<&Point> for &Point {
            type Output = Point;
            fn $method(self, rhs: &Point) -> Point {
                self.zip_with(rhs, |a, b| a $op b)
            }
        }

        impl core::ops::$trait<Point> for Point {
            type Output = Point;
            fn $method(self, rhs: Point) -> Point {
                (&self).$method(&rhs)
            }
        }

        impl core::ops::$trait<&Point> for Point {
            type Output = Point;
            fn $method(self, rhs: &Point) -> Point {
                (&self).$method(rhs)
            }
        }

        impl core::ops::$trait<Point> for &Point {
            type Output = Point;
            fn $method(self, rhs: Point) -> Point {
                self.$method(&rhs)
            }
        }
    };
}

impl_binop!(Add, add, +);
impl_binop!(Sub, sub, -);

impl core::ops::Mul<f64> for &Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point {
            coords: self.coords.iter().map(|c| c * rhs).collect(),
        }
    }
}

impl core::ops::Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        (&self).mul(rhs)
    }
}

impl core::ops::Neg for &Point {
    type Output = Point;
    fn neg(self) -> Point {
        self.mul(-1.0)
    }
}

impl core::ops::Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        (&self).neg()
    }
}
