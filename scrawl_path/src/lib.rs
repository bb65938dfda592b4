// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path and shape model for 2-D vector graphics.
//!
//! The building blocks are [`Point`], [`Part`] (a Bézier segment of
//! arbitrary degree), [`Path`] (a connected chain of parts with a closed
//! flag) and [`Shape`] (a collection of closed paths). On top of those,
//! [`builder`] offers parametric constructions (arcs, ellipses, stars,
//! eggs, lunes) and [`proc`] offers composable path processors (stroking,
//! dashing, jittering, tracing, decorating).
//!
//! Coordinates are `f64`. Points may carry extra attribute coordinates
//! beyond x and y; curve evaluation interpolates them alongside the
//! geometry while metrics ignore them.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod affine;
pub mod builder;
pub(crate) mod curve;
mod error;
mod part;
mod path;
mod point;
pub mod proc;
mod rect;
mod shape;

pub use affine::Affine;
pub use error::{Error, Result};
pub use part::Part;
pub use path::{Path, Step};
pub use point::Point;
pub use rect::Rect;
pub use shape::Shape;

/// Coincidence tolerance used throughout: distances and determinants below
/// this are treated as zero.
pub const EPSILON: f64 = 1e-6;
