// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Randomized displacement processors.
//!
//! Each processor owns its RNG behind a lock, so processing stays `&self`
//! and results are reproducible through the `with_seed` constructors.

use super::PathProcessor;
use crate::affine::Affine;
use crate::part::Part;
use crate::path::Path;
use crate::point::Point;
use crate::EPSILON;
use core::f64::consts::TAU;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

fn locked(rng: &Mutex<StdRng>) -> std::sync::MutexGuard<'_, StdRng> {
    rng.lock().unwrap_or_else(|e| e.into_inner())
}

/// A uniform draw from the disk of the given radius.
fn disk(rng: &mut StdRng, radius: f64) -> Point {
    let r = radius * rng.gen_range(0.0_f64..1.0).sqrt();
    let a = rng.gen_range(0.0..TAU);
    Point::new(r * a.cos(), r * a.sin())
}

/// Remap a part so its endpoints move to `first` / `last`, dragging the
/// interior control points along.
fn remap(part: &Part, first: Point, last: Point) -> Part {
    if part.is_line() {
        return Part::line(first, last);
    }
    match Affine::line_to_line(part.first(), part.last(), &first, &last) {
        Ok(t) => part.transform(&t),
        Err(_) => Part::line(first, last),
    }
}

/// Displaces each junction vertex perpendicular to the incoming part, by
/// up to ±`perc`·length/2.
pub struct JitterProc {
    perc: f64,
    jitter_ends: bool,
    rng: Mutex<StdRng>,
}

impl JitterProc {
    /// Jitter junctions by up to ±`perc`·length/2. `jitter_ends` also
    /// displaces the seam vertex of closed paths.
    pub fn new(perc: f64, jitter_ends: bool) -> Self {
        Self {
            perc,
            jitter_ends,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic variant.
    pub fn with_seed(perc: f64, jitter_ends: bool, seed: u64) -> Self {
        Self {
            perc,
            jitter_ends,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl PathProcessor for JitterProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let parts: Vec<Part> = path.parts().collect();
        if parts.is_empty() {
            return vec![path.clone()];
        }
        let n = parts.len();
        let mut rng = locked(&self.rng);
        // New vertex positions, indexed by the part that starts there.
        let mut starts: Vec<Point> = Vec::with_capacity(n);
        for (i, part) in parts.iter().enumerate() {
            let v = part.first().clone();
            let movable = i > 0 || (path.closed() && self.jitter_ends);
            if !movable {
                starts.push(v);
                continue;
            }
            let chord = part.last() - part.first();
            let len = chord.length();
            if len < EPSILON {
                starts.push(v);
                continue;
            }
            let normal = Point::new(chord.y(), -chord.x()) * (1.0 / len);
            let amount = rng.gen_range(-1.0..=1.0) * self.perc * len / 2.0;
            starts.push(&v + &(&normal * amount));
        }
        drop(rng);
        let mut out = Vec::with_capacity(n);
        for (i, part) in parts.iter().enumerate() {
            let first = starts[i].clone();
            let last = if i + 1 < n {
                starts[i + 1].clone()
            } else if path.closed() {
                starts[0].clone()
            } else {
                part.last().clone()
            };
            out.push(remap(part, first, last));
        }
        match Path::from_parts(out) {
            Ok(mut p) => {
                if path.closed() {
                    p.close();
                }
                vec![p]
            }
            Err(e) => {
                log::warn!("jitter dropped: {e}");
                vec![path.clone()]
            }
        }
    }
}

/// Displaces each junction vertex uniformly within a disk.
pub struct CircularJitterProc {
    radius: f64,
    jitter_ends: bool,
    rng: Mutex<StdRng>,
}

impl CircularJitterProc {
    /// Jitter junctions within `radius`. `jitter_ends` also displaces the
    /// seam vertex of closed paths.
    pub fn new(radius: f64, jitter_ends: bool) -> Self {
        Self {
            radius: radius.abs(),
            jitter_ends,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic variant.
    pub fn with_seed(radius: f64, jitter_ends: bool, seed: u64) -> Self {
        Self {
            radius: radius.abs(),
            jitter_ends,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl PathProcessor for CircularJitterProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let parts: Vec<Part> = path.parts().collect();
        if parts.is_empty() {
            return vec![path.clone()];
        }
        let n = parts.len();
        let mut rng = locked(&self.rng);
        let mut starts: Vec<Point> = Vec::with_capacity(n);
        for (i, part) in parts.iter().enumerate() {
            let v = part.first().clone();
            let movable = i > 0 || (path.closed() && self.jitter_ends);
            if movable {
                starts.push(&v + &disk(&mut rng, self.radius));
            } else {
                starts.push(v);
            }
        }
        drop(rng);
        let mut out = Vec::with_capacity(n);
        for (i, part) in parts.iter().enumerate() {
            let first = starts[i].clone();
            let last = if i + 1 < n {
                starts[i + 1].clone()
            } else if path.closed() {
                starts[0].clone()
            } else {
                part.last().clone()
            };
            out.push(remap(part, first, last));
        }
        match Path::from_parts(out) {
            Ok(mut p) => {
                if path.closed() {
                    p.close();
                }
                vec![p]
            }
            Err(e) => {
                log::warn!("jitter dropped: {e}");
                vec![path.clone()]
            }
        }
    }
}

/// Midpoint displacement: split each part at its midpoint, push the new
/// vertex perpendicular to the chord by a random amount up to
/// ±length·`perc`, and recurse with the amplitude scaled per level.
pub struct MpdProc {
    perc: f64,
    iterations: usize,
    scale: f64,
    rng: Mutex<StdRng>,
}

impl MpdProc {
    /// `iterations` rounds of displacement, amplitude `perc` of the chord
    /// length, multiplied by `scale` each round.
    pub fn new(perc: f64, iterations: usize, scale: f64) -> Self {
        Self {
            perc,
            iterations,
            scale,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic variant.
    pub fn with_seed(perc: f64, iterations: usize, scale: f64, seed: u64) -> Self {
        Self {
            perc,
            iterations,
            scale,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn displace(&self, rng: &mut StdRng, part: &Part, perc: f64, depth: usize, out: &mut Vec<Part>) {
        let chord = part.last() - part.first();
        let len = chord.length();
        if depth == 0 || len < EPSILON {
            out.push(part.clone());
            return;
        }
        let (left, right) = part.split(0.5);
        let normal = Point::new(chord.y(), -chord.x()) * (1.0 / len);
        let amount = rng.gen_range(-1.0..=1.0) * perc * len;
        let mid = left.last() + &(&normal * amount);
        let left = remap(&left, left.first().clone(), mid.clone());
        let right = remap(&right, mid, right.last().clone());
        self.displace(rng, &left, perc * self.scale, depth - 1, out);
        self.displace(rng, &right, perc * self.scale, depth - 1, out);
    }
}

impl PathProcessor for MpdProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let mut rng = locked(&self.rng);
        let mut out = Vec::new();
        for part in path.parts() {
            self.displace(&mut rng, &part, self.perc, self.iterations, &mut out);
        }
        drop(rng);
        match Path::from_parts(out) {
            Ok(mut p) => {
                if path.closed() {
                    p.close();
                }
                vec![p]
            }
            Err(e) => {
                log::warn!("midpoint displacement dropped: {e}");
                vec![path.clone()]
            }
        }
    }
}

/// Hand-drawn look: several repetitions of the path with every point but
/// the first nudged within a disk. Linear steps get two extra nudged
/// points at t = 0.5 and 0.75 so long lines wobble too.
///
/// The output paths are open regardless of the input's closed flag.
pub struct HandyProc {
    reps: usize,
    radius: f64,
    jitter_controls: bool,
    rng: Mutex<StdRng>,
}

impl HandyProc {
    /// `reps` copies, nudged within `radius`. `jitter_controls` also
    /// nudges interior control points of curved steps.
    pub fn new(reps: usize, radius: f64, jitter_controls: bool) -> Self {
        Self {
            reps: reps.max(1),
            radius: radius.abs(),
            jitter_controls,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic variant.
    pub fn with_seed(reps: usize, radius: f64, jitter_controls: bool, seed: u64) -> Self {
        Self {
            reps: reps.max(1),
            radius: radius.abs(),
            jitter_controls,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn one_rep(&self, rng: &mut StdRng, path: &Path) -> Option<Path> {
        let mut out = Path::new(path.start().clone());
        for part in path.parts() {
            if part.is_line() {
                for t in [0.5, 0.75, 1.0] {
                    let (p, _) = part.eval(t);
                    let p = &p + &disk(rng, self.radius);
                    if out.line_to(p).is_err() {
                        continue;
                    }
                }
            } else {
                let mut step: Vec<Point> = part.points()[1..].to_vec();
                let count = step.len();
                for (i, p) in step.iter_mut().enumerate() {
                    if self.jitter_controls || i == count - 1 {
                        *p = &*p + &disk(rng, self.radius);
                    }
                }
                if out.add_step(step).is_err() {
                    continue;
                }
            }
        }
        (!out.steps().is_empty()).then_some(out)
    }
}

impl PathProcessor for HandyProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let mut rng = locked(&self.rng);
        (0..self.reps)
            .filter_map(|_| self.one_rep(&mut rng, path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder;

    fn zigzag() -> Path {
        builder::polyline([
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(30.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn jitter_keeps_open_endpoints_fixed() {
        let out = JitterProc::with_seed(0.4, false, 7).process(&zigzag());
        assert_eq!(out.len(), 1);
        assert!(out[0].start().approx_eq(&Point::new(0.0, 0.0)));
        assert!(out[0].end().approx_eq(&Point::new(30.0, 0.0)));
        // Horizontal parts jitter vertically only.
        for s in out[0].steps() {
            assert!(s.last().y().abs() <= 0.4 * 10.0 / 2.0 + 1e-9);
        }
    }

    #[test]
    fn jitter_is_reproducible_with_a_seed() {
        let a = JitterProc::with_seed(0.4, false, 42).process(&zigzag());
        let b = JitterProc::with_seed(0.4, false, 42).process(&zigzag());
        assert_eq!(a, b);
    }

    #[test]
    fn circular_jitter_stays_within_radius() {
        let out = CircularJitterProc::with_seed(2.0, false, 3).process(&zigzag());
        let original = zigzag();
        for (s, o) in out[0].steps().iter().zip(original.steps()) {
            assert!(s.last().dist(o.last()) <= 2.0 + 1e-9);
        }
    }

    #[test]
    fn mpd_multiplies_parts() {
        let line = builder::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).unwrap();
        let out = MpdProc::with_seed(0.1, 3, 0.5, 9).process(&line);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].parts().count(), 8);
        assert!(out[0].end().approx_eq(&Point::new(100.0, 0.0)));
    }

    #[test]
    fn handy_emits_repetitions_and_extra_points() {
        let line = builder::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).unwrap();
        let out = HandyProc::with_seed(3, 1.0, false, 11).process(&line);
        assert_eq!(out.len(), 3);
        // One line becomes three nudged steps.
        assert!(out.iter().all(|p| p.steps().len() == 4));
        assert!(out.iter().all(|p| !p.closed()));
    }

    #[test]
    fn handy_drops_the_closed_flag() {
        let square = builder::polygon([
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ])
        .unwrap();
        let out = HandyProc::with_seed(1, 0.5, false, 2).process(&square);
        assert!(out.iter().all(|p| !p.closed()));
    }
}
