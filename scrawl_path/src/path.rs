// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The path model: a single continuous stroke built from steps.
//!
//! A path stores its start point plus an ordered sequence of [`Step`]s;
//! step 0 is a degenerate one-point step holding the start. Parts are
//! reconstructed on demand by joining each step with the end of the
//! previous one, so a path with `n` steps yields `n − 1` parts (plus an
//! implicit closing line for closed paths whose endpoint differs from the
//! start).
//!
//! Derived views (bounds, flattening, simplification, reversal, tangents)
//! are memoized behind a mutex and invalidated by any mutation.

use crate::affine::Affine;
use crate::error::{Error, Result};
use crate::part::Part;
use crate::point::Point;
use crate::rect::Rect;
use crate::EPSILON;
use smallvec::SmallVec;
use std::sync::Mutex;

/// The control points a part adds beyond its start: length = degree.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    points: SmallVec<[Point; 3]>,
}

impl Step {
    /// Create a step from its control points.
    ///
    /// # Panics
    ///
    /// Panics when no points are given.
    pub fn new(points: impl IntoIterator<Item = Point>) -> Self {
        let points: SmallVec<[Point; 3]> = points.into_iter().collect();
        assert!(!points.is_empty(), "a step needs at least one point");
        Self { points }
    }

    /// The step's control points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The step's endpoint.
    pub fn last(&self) -> &Point {
        &self.points[self.points.len() - 1]
    }

    /// The degree of the part this step produces.
    pub fn degree(&self) -> usize {
        self.points.len()
    }
}

#[derive(Debug, Default)]
struct Caches {
    tight_bounds: Option<Rect>,
    flattened: Option<(f64, Box<Path>)>,
    simplified: Option<Box<Path>>,
    reversed: Option<Box<Path>>,
    tangents: Option<Vec<(Point, Point)>>,
}

impl Caches {
    fn clear(&mut self) {
        *self = Self::default();
    }

    fn clone_contents(&self) -> Self {
        Self {
            tight_bounds: self.tight_bounds,
            flattened: self.flattened.clone(),
            simplified: self.simplified.clone(),
            reversed: self.reversed.clone(),
            tangents: self.tangents.clone(),
        }
    }
}

/// A single continuous stroke: a start point, steps, and a closed flag.
#[derive(Debug)]
pub struct Path {
    steps: Vec<Step>,
    closed: bool,
    assume_simplified: bool,
    caches: Mutex<Caches>,
}

impl Clone for Path {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
            closed: self.closed,
            assume_simplified: self.assume_simplified,
            caches: Mutex::new(self.lock_caches().clone_contents()),
        }
    }
}

impl PartialEq for Path {
    /// Equality modulo cache state.
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps && self.closed == other.closed
    }
}

impl Path {
    /// Create a path anchored at `start`.
    pub fn new(start: Point) -> Self {
        Self {
            steps: vec![Step::new([start])],
            closed: false,
            assume_simplified: false,
            caches: Mutex::new(Caches::default()),
        }
    }

    fn lock_caches(&self) -> std::sync::MutexGuard<'_, Caches> {
        self.caches.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn derived(&self, steps: Vec<Step>, closed: bool, assume_simplified: bool) -> Self {
        Self {
            steps,
            closed,
            assume_simplified,
            caches: Mutex::new(Caches::default()),
        }
    }

    /// The start point.
    pub fn start(&self) -> &Point {
        self.steps[0].last()
    }

    /// The current endpoint (start of the path for a pathless point).
    pub fn end(&self) -> &Point {
        self.steps[self.steps.len() - 1].last()
    }

    /// The steps, including the degenerate leading step.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Whether the path has been closed.
    pub fn closed(&self) -> bool {
        self.closed
    }

    /// Whether this path is known to consist of well-behaved parts only.
    pub fn assume_simplified(&self) -> bool {
        self.assume_simplified
    }

    /// Mark the path as already simplified, skipping future
    /// [`Path::simplify`] work. The caller asserts the property.
    pub fn set_assume_simplified(&mut self, value: bool) {
        self.assume_simplified = value;
    }

    /// Append one step.
    ///
    /// Fails with [`Error::PathClosed`] on a closed path and with
    /// [`Error::ZeroLengthStep`] when the step would end at the current
    /// endpoint (or is empty).
    pub fn add_step(&mut self, points: impl IntoIterator<Item = Point>) -> Result<()> {
        if self.closed {
            return Err(Error::PathClosed);
        }
        let points: SmallVec<[Point; 3]> = points.into_iter().collect();
        let Some(last) = points.last() else {
            return Err(Error::ZeroLengthStep);
        };
        if last.approx_eq(self.end()) {
            return Err(Error::ZeroLengthStep);
        }
        self.lock_caches().clear();
        self.assume_simplified = false;
        self.steps.push(Step { points });
        Ok(())
    }

    /// Append a straight step to `p`.
    pub fn line_to(&mut self, p: Point) -> Result<()> {
        self.add_step([p])
    }

    /// Append a quadratic step through control point `c`.
    pub fn quad_to(&mut self, c: Point, p: Point) -> Result<()> {
        self.add_step([c, p])
    }

    /// Append a cubic step through control points `c1` and `c2`.
    pub fn curve_to(&mut self, c1: Point, c2: Point, p: Point) -> Result<()> {
        self.add_step([c1, c2, p])
    }

    /// Mark the path closed. Idempotent; no further steps may be added.
    pub fn close(&mut self) {
        if !self.closed {
            self.lock_caches().clear();
            self.closed = true;
        }
    }

    /// A copy with the closed flag cleared. The implicit closing line of a
    /// closed path is dropped along with the flag.
    pub fn open(&self) -> Self {
        self.derived(self.steps.clone(), false, self.assume_simplified)
    }

    /// Append the steps of each donor path in order.
    ///
    /// When the receiver's endpoint equals a donor's start, the donor's
    /// degenerate leading step is skipped; otherwise an implicit straight
    /// step to the donor's start is inserted. Fails with
    /// [`Error::PathClosed`] if any participant is closed.
    pub fn concatenate<'a>(&mut self, paths: impl IntoIterator<Item = &'a Path>) -> Result<()> {
        if self.closed {
            return Err(Error::PathClosed);
        }
        for donor in paths {
            if donor.closed {
                return Err(Error::PathClosed);
            }
            if !self.end().approx_eq(donor.start()) {
                self.add_step([donor.start().clone()])?;
            }
            self.lock_caches().clear();
            self.assume_simplified = false;
            self.steps.extend(donor.steps[1..].iter().cloned());
        }
        Ok(())
    }

    /// Iterate the path's parts lazily.
    ///
    /// Yields one part per non-leading step, plus a closing line when the
    /// path is closed and its endpoint differs from its start.
    pub fn parts(&self) -> Parts<'_> {
        Parts {
            path: self,
            index: 1,
            closing_emitted: false,
        }
    }

    /// Build a path from a part sequence.
    ///
    /// Consecutive parts whose endpoints do not meet are joined with an
    /// implicit straight step; zero-length parts are dropped. Fails with
    /// [`Error::InputShape`] when no parts are given.
    pub fn from_parts(parts: impl IntoIterator<Item = Part>) -> Result<Self> {
        let mut iter = parts.into_iter();
        let Some(first) = iter.next() else {
            return Err(Error::InputShape("no parts"));
        };
        let mut path = Self::new(first.first().clone());
        path.extend_with_part(&first)?;
        for part in iter {
            path.extend_with_part(&part)?;
        }
        Ok(path)
    }

    fn extend_with_part(&mut self, part: &Part) -> Result<()> {
        if part.is_degenerate() && part.is_line() {
            return Ok(());
        }
        if !self.end().approx_eq(part.first()) {
            self.add_step([part.first().clone()])?;
        }
        match self.add_step(part.points()[1..].iter().cloned()) {
            Ok(()) | Err(Error::ZeroLengthStep) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Tight f64 bounding box over all control points.
    pub fn tight_bounds(&self) -> Rect {
        if let Some(b) = self.lock_caches().tight_bounds {
            return b;
        }
        let mut b = Rect::EMPTY;
        for step in &self.steps {
            b = b.union(&Rect::from_points(step.points()));
        }
        if b.x1 < b.x0 {
            b = Rect::new(self.start().x(), self.start().y(), self.start().x(), self.start().y());
        }
        self.lock_caches().tight_bounds = Some(b);
        b
    }

    /// Pixel-inclusive bounding box: minimum corner floored, maximum
    /// corner floored plus one.
    pub fn bounds(&self) -> Rect {
        let t = self.tight_bounds();
        Rect::new(t.x0, t.y0, t.x1, t.y1).pixel_bounds()
    }

    /// A path of straight steps approximating this one within `tolerance`.
    ///
    /// A cached flattening is reused whenever it was computed at an
    /// equal-or-tighter tolerance.
    pub fn flatten(&self, tolerance: f64) -> Self {
        {
            let caches = self.lock_caches();
            if let Some((tol, flat)) = &caches.flattened {
                if *tol <= tolerance + EPSILON {
                    return (**flat).clone();
                }
            }
        }
        let mut flat = Self::new(self.start().clone());
        for part in self.parts() {
            for v in &part.flatten(tolerance)[1..] {
                match flat.add_step([v.clone()]) {
                    Ok(()) | Err(Error::ZeroLengthStep) => {}
                    Err(_) => unreachable!("flattened path is open"),
                }
            }
        }
        flat.closed = self.closed;
        flat.assume_simplified = true;
        self.lock_caches().flattened = Some((tolerance, Box::new(flat.clone())));
        flat
    }

    /// An equivalent path in which every part is well behaved; see
    /// [`crate::curve::simplify`].
    pub fn simplify(&self) -> Self {
        if self.assume_simplified {
            return self.clone();
        }
        if let Some(s) = &self.lock_caches().simplified {
            return (**s).clone();
        }
        let mut simple = Self::new(self.start().clone());
        for part in self.parts() {
            for piece in part.simplify() {
                match simple.add_step(piece.points()[1..].iter().cloned()) {
                    Ok(()) | Err(Error::ZeroLengthStep) => {}
                    Err(_) => unreachable!("simplified path is open"),
                }
            }
        }
        simple.closed = self.closed;
        simple.assume_simplified = true;
        self.lock_caches().simplified = Some(Box::new(simple.clone()));
        simple
    }

    fn reversed_steps(&self) -> Vec<Step> {
        let mut parts: Vec<Part> = Vec::with_capacity(self.steps.len());
        for i in 1..self.steps.len() {
            let mut pts: Vec<Point> = vec![self.steps[i - 1].last().clone()];
            pts.extend(self.steps[i].points().iter().cloned());
            parts.push(Part::new(pts));
        }
        let mut steps = vec![Step::new([self.end().clone()])];
        for part in parts.iter().rev() {
            let rev = part.reverse();
            steps.push(Step::new(rev.points()[1..].iter().cloned()));
        }
        steps
    }

    /// The same stroke traversed in the opposite direction.
    ///
    /// Existing flattened, simplified, and tangent caches are carried over
    /// to the reversed copy so derived views stay consistent.
    pub fn reverse(&self) -> Self {
        if let Some(r) = &self.lock_caches().reversed {
            return (**r).clone();
        }
        let rev = self.derived(self.reversed_steps(), self.closed, self.assume_simplified);
        {
            let caches = self.lock_caches();
            let mut rev_caches = rev.lock_caches();
            rev_caches.tight_bounds = caches.tight_bounds;
            if let Some((tol, flat)) = &caches.flattened {
                rev_caches.flattened = Some((
                    *tol,
                    Box::new(flat.derived(flat.reversed_steps(), flat.closed, true)),
                ));
            }
            if let Some(s) = &caches.simplified {
                rev_caches.simplified =
                    Some(Box::new(s.derived(s.reversed_steps(), s.closed, true)));
            }
            if let Some(tans) = &caches.tangents {
                rev_caches.tangents = Some(
                    tans.iter()
                        .rev()
                        .map(|(a, b)| (-b, -a))
                        .collect(),
                );
            }
        }
        self.lock_caches().reversed = Some(Box::new(rev.clone()));
        rev
    }

    /// For each part, the normalized tangent vectors at t = 0 and t = 1.
    ///
    /// Degenerate parts report zero vectors.
    pub fn tangents(&self) -> Vec<(Point, Point)> {
        if let Some(t) = &self.lock_caches().tangents {
            return t.clone();
        }
        let tans: Vec<(Point, Point)> = self
            .parts()
            .map(|p| {
                (
                    p.tangent_start().unwrap_or(Point::ZERO),
                    p.tangent_end().unwrap_or(Point::ZERO),
                )
            })
            .collect();
        self.lock_caches().tangents = Some(tans.clone());
        tans
    }

    /// The straight line from start to endpoint, or a single point for
    /// closed or endpoint-coincident paths.
    pub fn line(&self) -> Self {
        if self.closed || self.end().approx_eq(self.start()) {
            return Self::new(self.start().clone());
        }
        let mut l = Self::new(self.start().clone());
        l.add_step([self.end().clone()]).expect("distinct endpoints");
        l
    }

    /// Apply an affine to every control point.
    pub fn transform(&self, t: &Affine) -> Self {
        let steps = self
            .steps
            .iter()
            .map(|s| Step::new(s.points().iter().map(|p| t.apply(p))))
            .collect();
        self.derived(steps, self.closed, false)
    }
}

/// Lazy iterator over a path's parts.
pub struct Parts<'a> {
    path: &'a Path,
    index: usize,
    closing_emitted: bool,
}

impl Iterator for Parts<'_> {
    type Item = Part;

    fn next(&mut self) -> Option<Part> {
        let steps = &self.path.steps;
        if self.index < steps.len() {
            let mut pts: Vec<Point> = vec![steps[self.index - 1].last().clone()];
            pts.extend(steps[self.index].points().iter().cloned());
            self.index += 1;
            return Some(Part::new(pts));
        }
        if self.path.closed
            && !self.closing_emitted
            && steps.len() > 1
            && !self.path.end().approx_eq(self.path.start())
        {
            self.closing_emitted = true;
            return Some(Part::line(
                self.path.end().clone(),
                self.path.start().clone(),
            ));
        }
        None
    }
}
