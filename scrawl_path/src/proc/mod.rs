// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composable path processors.
//!
//! A processor consumes one path and produces zero or more. Processors are
//! pure from the caller's point of view (jittered processors keep their RNG
//! behind a lock) and compose left-to-right with [`CompoundProc`].

mod cap;
mod curve_fit;
mod jitter;
mod join;
mod marks;
mod rounded;
mod snip;
mod stroke;
mod trace;
mod wave;

pub use cap::Cap;
pub use curve_fit::{CurveMode, CurveProc};
pub use jitter::{CircularJitterProc, HandyProc, JitterProc, MpdProc};
pub use join::Join;
pub use marks::{BoxerProc, CapsProc, PointsProc, RotateStyle, ShapesProc};
pub use rounded::{RoundedEdgeProc, RoundedProc};
pub use snip::{DashProc, FDashProc, LimitProc, MunchProc, SnipProc};
pub use stroke::{PointMarker, SimpleStrokeProc, StrokeProc};
pub use trace::{StrandedTraceProc, TraceProc, VarWidthTraceProc};
pub use wave::{ScallopProc, SquareWaveProc, TriangleWaveProc};

use crate::affine::Affine;
use crate::path::Path;

/// Transforms one path into zero or more paths.
pub trait PathProcessor {
    /// Process a single path.
    fn process(&self, path: &Path) -> Vec<Path>;
}

/// Runs a sequence of processors, feeding every output of one stage into
/// the next.
#[derive(Default)]
pub struct CompoundProc {
    procs: Vec<Box<dyn PathProcessor>>,
}

impl CompoundProc {
    /// An empty chain (the identity processor).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage to the chain.
    pub fn push(&mut self, proc: impl PathProcessor + 'static) -> &mut Self {
        self.procs.push(Box::new(proc));
        self
    }
}

impl FromIterator<Box<dyn PathProcessor>> for CompoundProc {
    fn from_iter<I: IntoIterator<Item = Box<dyn PathProcessor>>>(iter: I) -> Self {
        Self {
            procs: iter.into_iter().collect(),
        }
    }
}

impl PathProcessor for CompoundProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let mut current = vec![path.clone()];
        for proc in &self.procs {
            current = current.iter().flat_map(|p| proc.process(p)).collect();
        }
        current
    }
}

/// Replaces each path by its flattening at a fixed tolerance.
pub struct FlattenProc(pub f64);

impl PathProcessor for FlattenProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        vec![path.flatten(self.0)]
    }
}

/// Replaces each path by its well-behaved simplification.
pub struct SimplifyProc;

impl PathProcessor for SimplifyProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        vec![path.simplify()]
    }
}

/// Clears the closed flag.
pub struct OpenProc;

impl PathProcessor for OpenProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        vec![path.open()]
    }
}

/// Reverses traversal direction.
pub struct ReverseProc;

impl PathProcessor for ReverseProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        vec![path.reverse()]
    }
}

/// Collapses each path to the straight line from start to end.
pub struct LineProc;

impl PathProcessor for LineProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        vec![path.line()]
    }
}

/// Applies a fixed affine transform.
pub struct TransformProc(pub Affine);

impl PathProcessor for TransformProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        vec![path.transform(&self.0)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    #[test]
    fn compound_feeds_outputs_forward() {
        let mut chain = CompoundProc::new();
        chain.push(FlattenProc(0.5));
        chain.push(ReverseProc);
        let mut p = Path::new(Point::new(0.0, 0.0));
        p.quad_to(Point::new(50.0, 100.0), Point::new(100.0, 0.0))
            .unwrap();
        let out = chain.process(&p);
        assert_eq!(out.len(), 1);
        assert!(out[0].start().approx_eq(&Point::new(100.0, 0.0)));
        assert!(out[0].steps().iter().all(|s| s.degree() == 1));
    }

    #[test]
    fn empty_compound_is_identity() {
        let chain = CompoundProc::new();
        let p = crate::builder::line(Point::new(0.0, 0.0), Point::new(5.0, 5.0)).unwrap();
        let out = chain.process(&p);
        assert_eq!(out, vec![p]);
    }
}
