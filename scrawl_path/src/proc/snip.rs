// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arc-length snipping: cut a path into pieces by walking a repeating
//! pattern of lengths, and the dash/munch/limit processors built on it.
//!
//! The walk measures length on a flattening but cuts the original curves
//! at the recorded parameters, so curvature survives.

use super::PathProcessor;
use crate::error::{Error, Result};
use crate::part::Part;
use crate::path::Path;
use crate::EPSILON;

/// Parameter slack when deciding whether a cut lands on a part boundary.
const T_SNAP: f64 = 1e-9;

struct Machine {
    pattern: Vec<f64>,
    states: usize,
    index: usize,
    delta: f64,
}

impl Machine {
    fn new(pattern: &[f64], states: usize, offset: f64) -> Self {
        let mut m = Self {
            pattern: pattern.to_vec(),
            states,
            index: 0,
            delta: pattern[0],
        };
        m.seek(offset.max(0.0));
        m
    }

    fn state(&self) -> usize {
        self.index % self.states
    }

    fn next_entry(&mut self) {
        self.index = (self.index + 1) % self.pattern.len();
        self.delta = self.pattern[self.index];
    }

    /// Seek forward by `d` without recording cuts.
    fn seek(&mut self, mut d: f64) {
        while d >= self.delta {
            d -= self.delta;
            self.next_entry();
        }
        self.delta -= d;
    }
}

/// Cuts a path into pieces at arc-length intervals given by a repeating
/// pattern, labelling each piece with a state in `0..states`.
///
/// Pattern entry `i` runs in state `i % states`. The pieces preserve the
/// original curve geometry: lengths are measured on a flattening, but the
/// cuts split the unflattened parts.
pub struct SnipProc {
    pattern: Vec<f64>,
    states: usize,
    offset: f64,
    tolerance: f64,
}

impl SnipProc {
    /// A snip over `pattern`, cycling through `states` states, starting
    /// `offset` into the pattern.
    pub fn new(pattern: Vec<f64>, states: usize, offset: f64, tolerance: f64) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::InputShape("snip pattern must not be empty"));
        }
        if pattern.iter().any(|&l| l <= EPSILON) {
            return Err(Error::InputShape("snip pattern entries must be positive"));
        }
        if states == 0 {
            return Err(Error::InputShape("snip needs at least one state"));
        }
        Ok(Self {
            pattern,
            states,
            offset,
            tolerance,
        })
    }

    /// Cut `path` into `(state, piece)` pairs, in path order.
    ///
    /// On a closed path whose first and last piece share a state, the two
    /// are merged across the seam.
    pub fn pieces(&self, path: &Path) -> Vec<(usize, Path)> {
        let mut machine = Machine::new(&self.pattern, self.states, self.offset);
        let mut pieces: Vec<(usize, Path)> = Vec::new();
        let mut run: Vec<Part> = Vec::new();
        let mut run_state = machine.state();

        fn flush(pieces: &mut Vec<(usize, Path)>, run: &mut Vec<Part>, state: usize) {
            if run.is_empty() {
                return;
            }
            match Path::from_parts(run.drain(..)) {
                Ok(p) => pieces.push((state, p)),
                Err(e) => log::warn!("snip piece dropped: {e}"),
            }
        }

        for part in path.parts() {
            let flat = part.flatten_with_t(self.tolerance);
            // (cut parameter, state after the cut)
            let mut cuts: Vec<(f64, usize)> = Vec::new();
            for w in flat.windows(2) {
                let (t0, t1) = (w[0].0, w[1].0);
                let seg_len = w[0].1.dist(&w[1].1);
                let mut remaining = seg_len;
                while remaining > 0.0 && machine.delta <= remaining + T_SNAP {
                    let walked = seg_len - remaining + machine.delta;
                    let frac = if seg_len < EPSILON {
                        1.0
                    } else {
                        (walked / seg_len).min(1.0)
                    };
                    remaining -= machine.delta;
                    machine.next_entry();
                    cuts.push((t0 + frac * (t1 - t0), machine.state()));
                }
                machine.delta -= remaining.max(0.0);
            }

            let mut interior: Vec<(f64, usize)> = Vec::new();
            let mut end_break: Option<usize> = None;
            for (t, next_state) in cuts {
                if t <= T_SNAP {
                    flush(&mut pieces, &mut run, run_state);
                    run_state = next_state;
                } else if t >= 1.0 - T_SNAP {
                    end_break = Some(next_state);
                } else {
                    interior.push((t, next_state));
                }
            }
            let ts: Vec<f64> = interior.iter().map(|c| c.0).collect();
            let mut sub = part.split_at(&ts).into_iter();
            if let Some(first) = sub.next() {
                run.push(first);
            }
            for ((_, next_state), piece) in interior.iter().zip(sub) {
                flush(&mut pieces, &mut run, run_state);
                run_state = *next_state;
                run.push(piece);
            }
            if let Some(next_state) = end_break {
                flush(&mut pieces, &mut run, run_state);
                run_state = next_state;
            }
        }
        flush(&mut pieces, &mut run, run_state);

        // Closed seam: a piece ending where the first began, in the same
        // state, is really one piece.
        if path.closed() && pieces.len() > 1 {
            let first_state = pieces[0].0;
            let (last_state, last_path) = pieces.last().map(|(s, p)| (*s, p)).expect("non-empty");
            if first_state == last_state && last_path.end().approx_eq(pieces[0].1.start()) {
                let (state, mut tail) = pieces.pop().expect("non-empty");
                let (_, head) = pieces.remove(0);
                match tail.concatenate([&head]) {
                    Ok(()) => pieces.push((state, tail)),
                    Err(e) => {
                        log::warn!("seam merge failed: {e}");
                        pieces.insert(0, (state, head));
                    }
                }
            }
        }
        pieces
    }
}

impl PathProcessor for SnipProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        self.pieces(path).into_iter().map(|(_, p)| p).collect()
    }
}

/// Dashing: keep the "on" slices of an even-length on/off pattern.
pub struct DashProc {
    snip: SnipProc,
}

impl DashProc {
    /// A dash over an even-length `pattern` of on/off lengths, starting
    /// `offset` into the pattern.
    pub fn new(pattern: Vec<f64>, offset: f64, tolerance: f64) -> Result<Self> {
        if pattern.len() % 2 != 0 {
            return Err(Error::InputShape("dash pattern must have even length"));
        }
        Ok(Self {
            snip: SnipProc::new(pattern, 2, offset, tolerance)?,
        })
    }
}

impl PathProcessor for DashProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        self.snip
            .pieces(path)
            .into_iter()
            .filter(|(state, _)| *state == 0)
            .map(|(_, p)| p)
            .collect()
    }
}

/// Dashing over the flattened path: like [`DashProc`] but every output
/// piece is made of line parts only.
pub struct FDashProc {
    dash: DashProc,
    tolerance: f64,
}

impl FDashProc {
    /// See [`DashProc::new`]; `tolerance` is also used for the up-front
    /// flattening.
    pub fn new(pattern: Vec<f64>, offset: f64, tolerance: f64) -> Result<Self> {
        Ok(Self {
            dash: DashProc::new(pattern, offset, tolerance)?,
            tolerance,
        })
    }
}

impl PathProcessor for FDashProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        self.dash.process(&path.flatten(self.tolerance))
    }
}

/// Resamples a path into a polyline with vertices at a fixed arc-length
/// spacing.
pub struct MunchProc {
    snip: SnipProc,
}

impl MunchProc {
    /// Resample at the given `spacing`.
    pub fn new(spacing: f64, tolerance: f64) -> Result<Self> {
        Ok(Self {
            snip: SnipProc::new(vec![spacing], 1, 0.0, tolerance)?,
        })
    }
}

impl PathProcessor for MunchProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let pieces = self.snip.pieces(path);
        let mut vertices = Vec::with_capacity(pieces.len() + 1);
        for (_, piece) in &pieces {
            vertices.push(piece.start().clone());
        }
        if let Some((_, last)) = pieces.last() {
            if !last.end().approx_eq(&vertices[0]) || !path.closed() {
                vertices.push(last.end().clone());
            }
        }
        if vertices.len() < 2 {
            return vec![path.clone()];
        }
        match crate::builder::polyline(vertices) {
            Ok(mut p) => {
                if path.closed() {
                    p.close();
                }
                vec![p]
            }
            Err(e) => {
                log::warn!("munch dropped: {e}");
                Vec::new()
            }
        }
    }
}

/// Chops any part longer than `limit` into equal-length line pieces.
pub struct LimitProc {
    limit: f64,
    tolerance: f64,
}

impl LimitProc {
    /// Limit part length to `limit`, measuring at `tolerance`.
    pub fn new(limit: f64, tolerance: f64) -> Result<Self> {
        if limit <= EPSILON {
            return Err(Error::InputShape("length limit must be positive"));
        }
        Ok(Self { limit, tolerance })
    }
}

impl PathProcessor for LimitProc {
    fn process(&self, path: &Path) -> Vec<Path> {
        let mut out: Vec<Part> = Vec::new();
        for part in path.parts() {
            let len = part.length(self.tolerance);
            if len <= self.limit {
                out.push(part);
                continue;
            }
            let n = (len / self.limit).ceil() as usize;
            let step = len / n as f64;
            // Equal arc-length samples along the flattening.
            let flat = part.flatten(self.tolerance);
            let mut vertices = vec![part.first().clone()];
            let mut walked = 0.0;
            let mut next = step;
            for w in flat.windows(2) {
                let seg = w[0].dist(&w[1]);
                while next <= walked + seg + EPSILON && vertices.len() < n {
                    let frac = if seg < EPSILON { 1.0 } else { (next - walked) / seg };
                    vertices.push(w[0].lerp(&w[1], frac));
                    next += step;
                }
                walked += seg;
            }
            vertices.push(part.last().clone());
            for w in vertices.windows(2) {
                if !w[0].approx_eq(&w[1]) {
                    out.push(Part::line(w[0].clone(), w[1].clone()));
                }
            }
        }
        match Path::from_parts(out) {
            Ok(mut p) => {
                if path.closed() {
                    p.close();
                }
                vec![p]
            }
            Err(e) => {
                log::warn!("limit dropped: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder;
    use crate::point::Point;

    fn hundred_line() -> Path {
        builder::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).unwrap()
    }

    #[test]
    fn dash_yields_the_expected_on_pieces() {
        let dash = DashProc::new(vec![10.0, 5.0], 0.0, 0.1).unwrap();
        let out = dash.process(&hundred_line());
        assert_eq!(out.len(), 7);
        assert!(out[0].start().approx_eq(&Point::new(0.0, 0.0)));
        assert!((out[0].end().x() - 10.0).abs() < 0.01);
        assert!((out[1].start().x() - 15.0).abs() < 0.01);
        // The trailing piece is clipped by the path end.
        assert!((out[6].end().x() - 100.0).abs() < 0.01);
    }

    #[test]
    fn dash_offset_shifts_the_pattern() {
        let dash = DashProc::new(vec![10.0, 5.0], 10.0, 0.1).unwrap();
        let out = dash.process(&hundred_line());
        // Walk starts mid-gap, so the first on-piece begins at 5.
        assert!((out[0].start().x() - 5.0).abs() < 0.01);
    }

    #[test]
    fn dash_preserves_curvature() {
        let arc = builder::arc(
            &Point::new(0.0, 0.0),
            100.0,
            0.0,
            core::f64::consts::FRAC_PI_2,
            builder::ArcStyle::Open,
        )
        .unwrap();
        let dash = DashProc::new(vec![20.0, 10.0], 0.0, 0.1).unwrap();
        let out = dash.process(&arc);
        assert!(!out.is_empty());
        // Pieces stay cubic, and their midpoints stay on the circle.
        for piece in &out {
            for part in piece.parts() {
                assert!(part.degree() > 1);
                let (mid, _) = part.eval(0.5);
                assert!((mid.length() - 100.0).abs() < 0.1);
            }
        }
    }

    #[test]
    fn closed_seam_pieces_merge() {
        let square = builder::polygon([
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(30.0, 30.0),
            Point::new(0.0, 30.0),
        ])
        .unwrap();
        let snip = SnipProc::new(vec![50.0], 1, 25.0, 0.1).unwrap();
        let pieces = snip.pieces(&square);
        // Cuts at walked lengths 25, 75; the piece past 75 wraps around to
        // meet the piece before 25 and the two merge.
        assert_eq!(pieces.len(), 2);
        let merged = &pieces.last().unwrap().1;
        assert!(merged.start().approx_eq(&Point::new(15.0, 30.0)));
        assert!(merged.end().approx_eq(&Point::new(25.0, 0.0)));
    }

    #[test]
    fn munch_resamples_to_a_polyline() {
        let out = MunchProc::new(10.0, 0.1).unwrap().process(&hundred_line());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].steps().len(), 11);
        assert!(out[0].steps().iter().all(|s| s.degree() <= 1));
    }

    #[test]
    fn limit_chops_long_parts() {
        let out = LimitProc::new(30.0, 0.1).unwrap().process(&hundred_line());
        assert_eq!(out.len(), 1);
        // 100 / 30 rounds up to four equal pieces.
        assert_eq!(out[0].parts().count(), 4);
        assert!((out[0].parts().next().unwrap().last().x() - 25.0).abs() < 0.01);
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        assert!(SnipProc::new(vec![], 1, 0.0, 0.1).is_err());
        assert!(SnipProc::new(vec![0.0], 1, 0.0, 0.1).is_err());
        assert!(DashProc::new(vec![10.0], 0.0, 0.1).is_err());
    }
}
