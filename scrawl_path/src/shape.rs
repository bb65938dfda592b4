// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shapes: collections of closed paths.

use crate::affine::Affine;
use crate::path::Path;
use crate::proc::PathProcessor;
use crate::rect::Rect;
use std::sync::Mutex;

/// A fillable figure: a collection of paths, each forced closed on
/// insertion, with a cached union bounding box.
#[derive(Debug, Default)]
pub struct Shape {
    paths: Vec<Path>,
    bounds: Mutex<Option<Rect>>,
}

impl Clone for Shape {
    fn clone(&self) -> Self {
        Self {
            paths: self.paths.clone(),
            bounds: Mutex::new(*self.lock_bounds()),
        }
    }
}

impl Shape {
    /// An empty shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// A shape holding a single (closed) path.
    pub fn from_path(path: Path) -> Self {
        let mut s = Self::new();
        s.add_path(&path);
        s
    }

    fn lock_bounds(&self) -> std::sync::MutexGuard<'_, Option<Rect>> {
        self.bounds.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a copy of `path`, forced closed.
    pub fn add_path(&mut self, path: &Path) {
        let mut p = path.clone();
        p.close();
        *self.lock_bounds() = None;
        self.paths.push(p);
    }

    /// Add copies of several paths, each forced closed.
    pub fn add_paths<'a>(&mut self, paths: impl IntoIterator<Item = &'a Path>) {
        for p in paths {
            self.add_path(p);
        }
    }

    /// Add all paths of another shape.
    pub fn add_shape(&mut self, other: &Self) {
        self.add_paths(&other.paths);
    }

    /// The shape's paths.
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Whether the shape holds no paths.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Pixel-inclusive union of the per-path bounds, cached.
    pub fn bounds(&self) -> Rect {
        if let Some(b) = *self.lock_bounds() {
            return b;
        }
        let b = self
            .paths
            .iter()
            .fold(Rect::EMPTY, |acc, p| acc.union(&p.bounds()));
        *self.lock_bounds() = Some(b);
        b
    }

    /// Tight f64 union of the per-path bounds.
    pub fn tight_bounds(&self) -> Rect {
        self.paths
            .iter()
            .fold(Rect::EMPTY, |acc, p| acc.union(&p.tight_bounds()))
    }

    /// Apply an affine to every path.
    pub fn transform(&self, t: &Affine) -> Self {
        let mut s = Self::new();
        for p in &self.paths {
            s.add_path(&p.transform(t));
        }
        s
    }

    /// Apply a processor to every path, forcing each result closed.
    pub fn process(&self, proc: &dyn PathProcessor) -> Self {
        let mut s = Self::new();
        for p in &self.paths {
            for out in proc.process(p) {
                s.add_path(&out);
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    #[test]
    fn paths_are_forced_closed() {
        let mut open = Path::new(Point::new(0.0, 0.0));
        open.line_to(Point::new(10.0, 0.0)).unwrap();
        open.line_to(Point::new(10.0, 10.0)).unwrap();
        let s = Shape::from_path(open);
        assert!(s.paths()[0].closed());
    }

    #[test]
    fn bounds_union_and_invalidation() {
        let mut a = Path::new(Point::new(0.0, 0.0));
        a.line_to(Point::new(10.0, 10.0)).unwrap();
        let mut s = Shape::from_path(a);
        let before = s.bounds();
        let mut b = Path::new(Point::new(50.0, 50.0));
        b.line_to(Point::new(60.0, 60.0)).unwrap();
        s.add_path(&b);
        let after = s.bounds();
        assert!(after.x1 > before.x1 && after.y1 > before.y1);
    }
}
