// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

/// Errors produced by path construction and geometric operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An attempt was made to mutate a closed path.
    #[error("the path is closed and cannot be modified")]
    PathClosed,
    /// A step would end at the path's current endpoint.
    #[error("a step must not end at the current endpoint")]
    ZeroLengthStep,
    /// A curve builder was given coincident or colinear input that admits
    /// no solution.
    #[error("degenerate curve input: {0}")]
    CurveDegenerate(&'static str),
    /// The affine transform is not invertible.
    #[error("the transform is singular and cannot be inverted")]
    Singular,
    /// The two lines are parallel or coincident and do not intersect.
    #[error("the lines are parallel")]
    Parallel,
    /// Structurally invalid input, e.g. an empty dash pattern.
    #[error("invalid input: {0}")]
    InputShape(&'static str),
}

/// A convenience alias for results carrying [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
