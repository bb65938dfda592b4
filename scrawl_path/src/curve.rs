// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The curve kernel: pure functions over slices of Bézier control points.
//!
//! Everything here works at arbitrary degree. A "part" is `n + 1` control
//! points describing a degree-`n` polynomial curve; the first and last
//! points lie on the curve.

use crate::error::{Error, Result};
use crate::point::Point;
use crate::rect::Rect;
use crate::EPSILON;

/// Number of Newton seeds used by the root finders.
const ROOT_SEEDS: usize = 100;
/// Maximum Newton iterations per seed.
const NEWTON_ITERS: usize = 24;
/// Recursion guard for flattening and simplification.
const MAX_DEPTH: usize = 24;

/// Evaluate a curve at `t` by de Casteljau reduction.
///
/// Returns the curve point and the (unnormalized) tangent vector, the
/// difference of the final pair before the last reduction. Attribute
/// coordinates are interpolated along with x and y.
pub fn de_casteljau(points: &[Point], t: f64) -> (Point, Point) {
    assert!(!points.is_empty(), "a curve needs control points");
    let mut pts = points.to_vec();
    let mut tangent = Point::new(0.0, 0.0);
    while pts.len() > 1 {
        if pts.len() == 2 {
            tangent = &pts[1] - &pts[0];
        }
        for i in 0..pts.len() - 1 {
            pts[i] = pts[i].lerp(&pts[i + 1], t);
        }
        pts.truncate(pts.len() - 1);
    }
    (pts.pop().expect("at least one point"), tangent)
}

/// Split a curve at `t` into two curves of the same degree.
///
/// The left curve ends where the right curve starts, at the de Casteljau
/// point for `t`.
pub fn split(points: &[Point], t: f64) -> (Vec<Point>, Vec<Point>) {
    assert!(!points.is_empty(), "a curve needs control points");
    let mut pts = points.to_vec();
    let mut left = vec![pts[0].clone()];
    let mut right = vec![pts[pts.len() - 1].clone()];
    while pts.len() > 1 {
        for i in 0..pts.len() - 1 {
            pts[i] = pts[i].lerp(&pts[i + 1], t);
        }
        pts.truncate(pts.len() - 1);
        left.push(pts[0].clone());
        right.push(pts[pts.len() - 1].clone());
    }
    right.reverse();
    (left, right)
}

/// Split a curve at several ascending interior parameters.
///
/// Each split is renormalized against the remaining parameter range, so the
/// pieces concatenate back to the original curve.
pub fn split_at(points: &[Point], ts: &[f64]) -> Vec<Vec<Point>> {
    let mut pieces = Vec::with_capacity(ts.len() + 1);
    let mut rest = points.to_vec();
    let mut consumed = 0.0;
    for &t in ts {
        if t <= consumed + EPSILON || t >= 1.0 - EPSILON {
            continue;
        }
        let local = (t - consumed) / (1.0 - consumed);
        let (l, r) = split(&rest, local);
        pieces.push(l);
        rest = r;
        consumed = t;
    }
    pieces.push(rest);
    pieces
}

/// Control points of the derivative curve: degree n weights become degree
/// n−1 weights scaled by n.
pub fn derivative(points: &[Point]) -> Vec<Point> {
    let n = points.len().saturating_sub(1);
    (0..n)
        .map(|i| (&points[i + 1] - &points[i]) * n as f64)
        .collect()
}

fn scalar_derivative(weights: &[f64]) -> Vec<f64> {
    let n = weights.len().saturating_sub(1);
    (0..n)
        .map(|i| (weights[i + 1] - weights[i]) * n as f64)
        .collect()
}

fn scalar_eval(weights: &[f64], t: f64) -> f64 {
    let mut w = weights.to_vec();
    while w.len() > 1 {
        for i in 0..w.len() - 1 {
            w[i] += (w[i + 1] - w[i]) * t;
        }
        w.truncate(w.len() - 1);
    }
    w[0]
}

/// Collect roots of a scalar Bézier function in [0, 1].
///
/// Seeds 100 evenly spaced starting values and runs a guarded
/// Newton–Raphson from each, aborting the moment an iterate leaves [0, 1].
fn scalar_roots(weights: &[f64], out: &mut Vec<f64>) {
    if weights.len() < 2 {
        return;
    }
    let dw = scalar_derivative(weights);
    'seed: for i in 0..ROOT_SEEDS {
        let mut t = i as f64 / (ROOT_SEEDS - 1) as f64;
        for _ in 0..NEWTON_ITERS {
            let f = scalar_eval(weights, t);
            if f.abs() < 1e-10 {
                out.push(t);
                continue 'seed;
            }
            let fp = scalar_eval(&dw, t);
            if fp.abs() < 1e-14 {
                continue 'seed;
            }
            t -= f / fp;
            if !(0.0..=1.0).contains(&t) {
                continue 'seed;
            }
        }
    }
}

/// Find all parameters in [0, 1] where the curve has an x or y extremum,
/// and (for degree ≥ 3) an inflection.
///
/// Results are deduplicated to four decimal places, always include 0 and 1,
/// and are sorted ascending.
pub fn extremities(points: &[Point]) -> Vec<f64> {
    let degree = points.len().saturating_sub(1);
    let mut raw = vec![0.0, 1.0];
    if degree >= 2 {
        let d1 = derivative(points);
        let xw: Vec<f64> = d1.iter().map(Point::x).collect();
        let yw: Vec<f64> = d1.iter().map(Point::y).collect();
        scalar_roots(&xw, &mut raw);
        scalar_roots(&yw, &mut raw);
        if degree >= 3 {
            let d2 = derivative(&d1);
            let xw2: Vec<f64> = d2.iter().map(Point::x).collect();
            let yw2: Vec<f64> = d2.iter().map(Point::y).collect();
            scalar_roots(&xw2, &mut raw);
            scalar_roots(&yw2, &mut raw);
        }
    }
    let mut keys: Vec<i64> = raw
        .iter()
        .map(|t| (t.clamp(0.0, 1.0) * 1e4).round() as i64)
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys.iter().map(|k| *k as f64 / 1e4).collect()
}

/// Flatten a curve into a polyline within perpendicular tolerance `d`.
///
/// A piece is accepted once every control point lies within `d` of its
/// chord; otherwise it is halved by de Casteljau and recursed.
pub fn flatten(points: &[Point], d: f64) -> Vec<Point> {
    let mut out = vec![points[0].clone()];
    flatten_rec(points.to_vec(), d * d, MAX_DEPTH, &mut out);
    out
}

fn flatten_rec(points: Vec<Point>, d_sq: f64, depth: usize, out: &mut Vec<Point>) {
    if depth == 0 || flat_enough(&points, d_sq) {
        out.push(points[points.len() - 1].clone());
        return;
    }
    let (l, r) = split(&points, 0.5);
    flatten_rec(l, d_sq, depth - 1, out);
    flatten_rec(r, d_sq, depth - 1, out);
}

/// Flatten while tracking the curve parameter of every vertex.
pub fn flatten_with_t(points: &[Point], d: f64) -> Vec<(f64, Point)> {
    let mut out = vec![(0.0, points[0].clone())];
    flatten_t_rec(points.to_vec(), 0.0, 1.0, d * d, MAX_DEPTH, &mut out);
    out
}

fn flatten_t_rec(
    points: Vec<Point>,
    t0: f64,
    t1: f64,
    d_sq: f64,
    depth: usize,
    out: &mut Vec<(f64, Point)>,
) {
    if depth == 0 || flat_enough(&points, d_sq) {
        out.push((t1, points[points.len() - 1].clone()));
        return;
    }
    let tm = (t0 + t1) * 0.5;
    let (l, r) = split(&points, 0.5);
    flatten_t_rec(l, t0, tm, d_sq, depth - 1, out);
    flatten_t_rec(r, tm, t1, d_sq, depth - 1, out);
}

fn flat_enough(points: &[Point], d_sq: f64) -> bool {
    if points.len() <= 2 {
        return true;
    }
    let first = &points[0];
    let last = &points[points.len() - 1];
    if first.dist_sq(last) < EPSILON * EPSILON {
        // Degenerate chord: measure against the anchor point instead.
        return points[1..points.len() - 1]
            .iter()
            .all(|p| p.dist_sq(first) <= d_sq);
    }
    points[1..points.len() - 1]
        .iter()
        .all(|p| line_distance(p, first, last).dist_sq <= d_sq)
}

/// Whether a part is "well behaved": all interior control points on one
/// side of the chord, and the t = 0.5 curve point within 2.5 % of the
/// control-polygon centroid, scaled by the control polygon's bounding box.
pub fn well_behaved(points: &[Point]) -> bool {
    if points.len() <= 2 {
        return true;
    }
    let first = &points[0];
    let last = &points[points.len() - 1];
    let chord = last - first;
    let mut pos = false;
    let mut neg = false;
    for p in &points[1..points.len() - 1] {
        let c = chord.cross(&(p - first));
        if c > EPSILON {
            pos = true;
        } else if c < -EPSILON {
            neg = true;
        }
    }
    if pos && neg {
        return false;
    }
    let (mid, _) = de_casteljau(points, 0.5);
    let c = centroid(points);
    let bb = bounds(points);
    (mid.x() - c.x()).abs() <= 0.025 * bb.width() + EPSILON
        && (mid.y() - c.y()).abs() <= 0.025 * bb.height() + EPSILON
}

/// Cut a part into well-behaved sub-parts: first at every extremity and
/// inflection, then by halving any piece that still misbehaves.
pub fn simplify(points: &[Point]) -> Vec<Vec<Point>> {
    if points.len() <= 2 {
        return vec![points.to_vec()];
    }
    let ts = extremities(points);
    let interior: Vec<f64> = ts
        .iter()
        .copied()
        .filter(|t| *t > EPSILON && *t < 1.0 - EPSILON)
        .collect();
    let mut out = Vec::new();
    for piece in split_at(points, &interior) {
        halve_until_behaved(piece, MAX_DEPTH, &mut out);
    }
    out
}

fn halve_until_behaved(points: Vec<Point>, depth: usize, out: &mut Vec<Vec<Point>>) {
    if depth == 0 || well_behaved(&points) {
        out.push(points);
        return;
    }
    let (l, r) = split(&points, 0.5);
    halve_until_behaved(l, depth - 1, out);
    halve_until_behaved(r, depth - 1, out);
}

/// Intersection parameters of the parametric lines `a1 + t1·(a2 − a1)` and
/// `b1 + t2·(b2 − b1)`.
///
/// Fails with [`Error::Parallel`] when the determinant magnitude is below ε.
pub fn line_intersection(a1: &Point, a2: &Point, b1: &Point, b2: &Point) -> Result<(f64, f64)> {
    let da = a2 - a1;
    let db = b2 - b1;
    let det = da.cross(&db);
    if det.abs() < EPSILON {
        return Err(Error::Parallel);
    }
    let w = b1 - a1;
    Ok((w.cross(&db) / det, w.cross(&da) / det))
}

/// Result of projecting a point onto an infinite line.
#[derive(Clone, Debug)]
pub struct LineDistance {
    /// Squared distance from the point to the line.
    pub dist_sq: f64,
    /// Foot of the perpendicular.
    pub foot: Point,
    /// Parameter of the foot along `a → b` (0 at `a`, 1 at `b`).
    pub t: f64,
}

/// Distance from `p` to the infinite line through `a` and `b`.
pub fn line_distance(p: &Point, a: &Point, b: &Point) -> LineDistance {
    let d = b - a;
    let len_sq = d.dot(&d);
    if len_sq < EPSILON * EPSILON {
        return LineDistance {
            dist_sq: p.dist_sq(a),
            foot: a.clone(),
            t: 0.0,
        };
    }
    let t = (p - a).dot(&d) / len_sq;
    let foot = a.lerp(b, t);
    LineDistance {
        dist_sq: p.dist_sq(&foot),
        foot,
        t,
    }
}

/// Arithmetic mean of a point set.
pub fn centroid(points: &[Point]) -> Point {
    assert!(!points.is_empty(), "centroid of an empty set");
    let mut acc = points[0].clone();
    for p in &points[1..] {
        acc = &acc + p;
    }
    acc * (1.0 / points.len() as f64)
}

/// Tight xy bounding box of a point set.
pub fn bounds(points: &[Point]) -> Rect {
    Rect::from_points(points)
}

/// Center and radius of the circle through three points.
///
/// Fails with [`Error::CurveDegenerate`] for colinear or coincident input.
pub fn circumcircle(p1: &Point, p2: &Point, p3: &Point) -> Result<(Point, f64)> {
    let m12 = p1.lerp(p2, 0.5);
    let m23 = p2.lerp(p3, 0.5);
    let b12 = &m12 + &(p2 - p1).perp();
    let b23 = &m23 + &(p3 - p2).perp();
    let (t, _) = line_intersection(&m12, &b12, &m23, &b23)
        .map_err(|_| Error::CurveDegenerate("circle through colinear points"))?;
    let center = m12.lerp(&b12, t);
    let r = center.dist(p1);
    Ok((center, r))
}

/// Whether `angle` lies inside the arc that starts at `offs` and sweeps by
/// `sweep` (signed, in [−2π, 2π]). All angles wrap at ±π.
pub fn angle_in_sweep(angle: f64, offs: f64, sweep: f64) -> bool {
    use core::f64::consts::TAU;
    if sweep.abs() >= TAU - EPSILON {
        return true;
    }
    let rel = (angle - offs).rem_euclid(TAU);
    if sweep >= 0.0 {
        rel <= sweep + EPSILON
    } else {
        rel - TAU >= sweep - EPSILON || rel < EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 100.0),
            Point::new(100.0, 100.0),
            Point::new(100.0, 0.0),
        ]
    }

    #[test]
    fn de_casteljau_hits_endpoints() {
        let c = cubic();
        let (p0, _) = de_casteljau(&c, 0.0);
        let (p1, _) = de_casteljau(&c, 1.0);
        assert!(p0.approx_eq(&c[0]));
        assert!(p1.approx_eq(&c[3]));
        let (mid, tangent) = de_casteljau(&c, 0.5);
        assert!(mid.approx_eq(&Point::new(50.0, 75.0)));
        // Symmetric cubic: tangent at the apex is horizontal.
        assert!(tangent.y().abs() < EPSILON && tangent.x() > 0.0);
    }

    #[test]
    fn split_shares_the_split_point() {
        let c = cubic();
        for &t in &[0.25, 0.5, 0.9] {
            let (l, r) = split(&c, t);
            let (p, _) = de_casteljau(&c, t);
            assert_eq!(l.len(), c.len());
            assert_eq!(r.len(), c.len());
            assert!(l[l.len() - 1].approx_eq(&p));
            assert!(r[0].approx_eq(&p));
            // The concatenation retraces the original curve.
            let (q, _) = de_casteljau(&l, 0.5);
            let (q_orig, _) = de_casteljau(&c, t * 0.5);
            assert!(q.dist(&q_orig) < 1e-9);
        }
    }

    #[test]
    fn derivative_weights() {
        let d = derivative(&cubic());
        assert_eq!(d.len(), 3);
        assert!(d[0].approx_eq(&Point::new(0.0, 300.0)));
        assert!(d[1].approx_eq(&Point::new(300.0, 0.0)));
        assert!(d[2].approx_eq(&Point::new(0.0, -300.0)));
    }

    #[test]
    fn extremities_find_the_apex() {
        let ts = extremities(&cubic());
        assert_eq!(ts[0], 0.0);
        assert_eq!(*ts.last().unwrap(), 1.0);
        // y'(t) = 0 at t = 0.5 for this symmetric cubic.
        assert!(ts.iter().any(|t| (t - 0.5).abs() < 1e-3), "ts = {ts:?}");
        // All results are deduplicated and sorted.
        let mut sorted = ts.clone();
        sorted.sort_by(f64::total_cmp);
        sorted.dedup();
        assert_eq!(ts, sorted);
    }

    #[test]
    fn flatten_respects_tolerance() {
        let c = cubic();
        for &tol in &[5.0, 0.5, 0.05] {
            let poly = flatten(&c, tol);
            assert!(poly[0].approx_eq(&c[0]));
            assert!(poly[poly.len() - 1].approx_eq(&c[3]));
            // Every polyline vertex lies on the curve: check a few against
            // a dense sampling.
            for v in &poly {
                let on_curve = (0..=400).any(|i| {
                    let (p, _) = de_casteljau(&c, i as f64 / 400.0);
                    p.dist(v) < tol.max(0.5)
                });
                assert!(on_curve);
            }
        }
        assert!(flatten(&c, 0.05).len() > flatten(&c, 5.0).len());
    }

    #[test]
    fn simplify_pieces_are_well_behaved_and_join_up() {
        let c = vec![
            Point::new(0.0, 0.0),
            Point::new(200.0, 150.0),
            Point::new(-100.0, 150.0),
            Point::new(100.0, 0.0),
        ];
        let pieces = simplify(&c);
        assert!(pieces.len() > 1);
        for piece in &pieces {
            assert!(well_behaved(piece));
        }
        assert!(pieces[0][0].approx_eq(&c[0]));
        assert!(pieces[pieces.len() - 1].last().unwrap().approx_eq(&c[3]));
        for w in pieces.windows(2) {
            assert!(w[0].last().unwrap().approx_eq(&w[1][0]));
        }
    }

    #[test]
    fn line_intersection_and_parallel() {
        let (t1, t2) = line_intersection(
            &Point::new(0.0, 0.0),
            &Point::new(10.0, 0.0),
            &Point::new(5.0, -5.0),
            &Point::new(5.0, 5.0),
        )
        .unwrap();
        assert!((t1 - 0.5).abs() < EPSILON);
        assert!((t2 - 0.5).abs() < EPSILON);
        assert_eq!(
            line_intersection(
                &Point::new(0.0, 0.0),
                &Point::new(1.0, 1.0),
                &Point::new(0.0, 1.0),
                &Point::new(1.0, 2.0),
            ),
            Err(Error::Parallel)
        );
    }

    #[test]
    fn line_distance_foot_and_t() {
        let d = line_distance(
            &Point::new(5.0, 3.0),
            &Point::new(0.0, 0.0),
            &Point::new(10.0, 0.0),
        );
        assert!((d.dist_sq - 9.0).abs() < EPSILON);
        assert!(d.foot.approx_eq(&Point::new(5.0, 0.0)));
        assert!((d.t - 0.5).abs() < EPSILON);
    }

    #[test]
    fn circumcircle_of_a_right_triangle() {
        let (c, r) = circumcircle(
            &Point::new(0.0, 0.0),
            &Point::new(10.0, 0.0),
            &Point::new(0.0, 10.0),
        )
        .unwrap();
        assert!(c.approx_eq(&Point::new(5.0, 5.0)));
        assert!((r - 50.0_f64.sqrt()).abs() < EPSILON);
        assert!(circumcircle(
            &Point::new(0.0, 0.0),
            &Point::new(1.0, 0.0),
            &Point::new(2.0, 0.0)
        )
        .is_err());
    }

    #[test]
    fn sweep_membership_wraps() {
        use core::f64::consts::PI;
        // Arc from 3π/4 sweeping π/2 crosses the ±π wrap.
        assert!(angle_in_sweep(-3.0 * PI / 4.0, 3.0 * PI / 4.0, PI / 2.0));
        assert!(angle_in_sweep(PI, 3.0 * PI / 4.0, PI / 2.0));
        assert!(!angle_in_sweep(0.0, 3.0 * PI / 4.0, PI / 2.0));
        // Negative sweeps go the other way.
        assert!(angle_in_sweep(-PI / 4.0, 0.0, -PI / 2.0));
        assert!(!angle_in_sweep(PI / 4.0, 0.0, -PI / 2.0));
    }
}
