// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path builders: parametric constructions that yield ready-made paths.
//!
//! Arcs are emitted as cubic Bézier approximations. A sweep is recursively
//! halved until each piece covers at most a quarter turn; beyond that the
//! single-cubic approximation error grows sharply, so the guard stays.

use crate::error::{Error, Result};
use crate::part::Part;
use crate::path::Path;
use crate::point::Point;
use crate::{curve, EPSILON};
use core::f64::consts::{FRAC_PI_2, PI, TAU};

/// How an arc path is finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArcStyle {
    /// Leave the arc open.
    #[default]
    Open,
    /// Close with the chord.
    Chord,
    /// Close through the arc's center (a pie slice).
    Pie,
}

/// A single-point path.
pub fn point(p: Point) -> Path {
    Path::new(p)
}

/// A straight line path.
pub fn line(p1: Point, p2: Point) -> Result<Path> {
    let mut path = Path::new(p1);
    path.add_step([p2])?;
    Ok(path)
}

/// An open polyline through the given points.
pub fn polyline(points: impl IntoIterator<Item = Point>) -> Result<Path> {
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return Err(Error::InputShape("polyline needs at least one point"));
    };
    let mut path = Path::new(first);
    for p in iter {
        path.add_step([p])?;
    }
    Ok(path)
}

/// A closed polygon through the given points.
pub fn polygon(points: impl IntoIterator<Item = Point>) -> Result<Path> {
    let mut path = polyline(points)?;
    path.close();
    Ok(path)
}

/// A regular reentrant (star) polygon: `n` outer vertices at `radius`,
/// interleaved with inner vertices at `radius · reentry`.
pub fn reentrant_polygon(
    center: &Point,
    radius: f64,
    n: usize,
    reentry: f64,
    xang: f64,
) -> Result<Path> {
    if n < 3 {
        return Err(Error::InputShape("a star needs at least three points"));
    }
    let step = PI / n as f64;
    polygon((0..2 * n).map(|i| {
        let r = if i % 2 == 0 { radius } else { radius * reentry };
        let a = xang + i as f64 * step;
        Point::new(center.x() + r * a.cos(), center.y() + r * a.sin())
    }))
}

/// Cubic parts approximating the arc of an axis-rotated ellipse.
///
/// `offs` is the parametric start angle and `sweep` the signed extent; the
/// sweep is halved until every piece is at most a quarter turn.
pub fn make_arc_parts(
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    xang: f64,
    offs: f64,
    sweep: f64,
) -> Vec<Part> {
    let mut out = Vec::new();
    arc_parts_rec(cx, cy, rx, ry, xang, offs, sweep, &mut out);
    out
}

#[allow(clippy::too_many_arguments)]
fn arc_parts_rec(
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    xang: f64,
    offs: f64,
    sweep: f64,
    out: &mut Vec<Part>,
) {
    if sweep.abs() < EPSILON {
        return;
    }
    if sweep.abs() > FRAC_PI_2 + EPSILON {
        let half = sweep * 0.5;
        arc_parts_rec(cx, cy, rx, ry, xang, offs, half, out);
        arc_parts_rec(cx, cy, rx, ry, xang, offs + half, half, out);
        return;
    }
    // Unit-circle cubic for the sweep, then map onto the ellipse.
    let k = 4.0 / 3.0 * (sweep / 4.0).tan();
    let (s0, c0) = offs.sin_cos();
    let (s1, c1) = (offs + sweep).sin_cos();
    let unit = [
        (c0, s0),
        (c0 - k * s0, s0 + k * c0),
        (c1 + k * s1, s1 - k * c1),
        (c1, s1),
    ];
    let (sx, cxang) = xang.sin_cos();
    let points = unit.map(|(x, y)| {
        let (ex, ey) = (x * rx, y * ry);
        Point::new(
            cx + ex * cxang - ey * sx,
            cy + ex * sx + ey * cxang,
        )
    });
    out.push(Part::new(points));
}

fn path_from_arc_parts(parts: Vec<Part>, center: &Point, style: ArcStyle) -> Result<Path> {
    let mut path = Path::from_parts(parts)?;
    match style {
        ArcStyle::Open => {}
        ArcStyle::Chord => path.close(),
        ArcStyle::Pie => {
            if !path.end().approx_eq(center) {
                path.add_step([center.clone()])?;
            }
            path.close();
        }
    }
    Ok(path)
}

/// A circular arc around `center` with radius `r`, starting at angle
/// `offs` and sweeping by `sweep` (signed).
pub fn arc(center: &Point, r: f64, offs: f64, sweep: f64, style: ArcStyle) -> Result<Path> {
    elliptical_arc(center, r, r, offs, sweep, 0.0, style)
}

/// A circular arc starting at `p` around `center`, sweeping by `sweep`.
pub fn arc_from_point(p: &Point, center: &Point, sweep: f64, style: ArcStyle) -> Result<Path> {
    let v = p - center;
    let r = v.length();
    if r < EPSILON {
        return Err(Error::CurveDegenerate("arc start coincides with center"));
    }
    arc(center, r, v.angle(), sweep, style)
}

/// An elliptical arc with semi-axes `rx`, `ry` and axis rotation `xang`.
pub fn elliptical_arc(
    center: &Point,
    rx: f64,
    ry: f64,
    offs: f64,
    sweep: f64,
    xang: f64,
    style: ArcStyle,
) -> Result<Path> {
    if rx < EPSILON || ry < EPSILON || sweep.abs() < EPSILON {
        return Err(Error::CurveDegenerate("arc with empty axis or sweep"));
    }
    let sweep = sweep.clamp(-TAU, TAU);
    let parts = make_arc_parts(center.x(), center.y(), rx, ry, xang, offs, sweep);
    path_from_arc_parts(parts, center, style)
}

/// An elliptical arc through the point `p`, around `center`, with the
/// given rx:ry `ratio` and axis rotation.
///
/// The semi-axes are recovered by inverting the ellipse equation for the
/// rotated point, so the resulting ellipse genuinely passes through `p`.
pub fn elliptical_arc_from_point(
    p: &Point,
    center: &Point,
    ratio: f64,
    sweep: f64,
    xang: f64,
    style: ArcStyle,
) -> Result<Path> {
    if ratio < EPSILON {
        return Err(Error::CurveDegenerate("non-positive axis ratio"));
    }
    let v = p - center;
    if v.length() < EPSILON {
        return Err(Error::CurveDegenerate("arc start coincides with center"));
    }
    // Coordinates of p in the unrotated ellipse frame.
    let (s, c) = xang.sin_cos();
    let x = v.x() * c + v.y() * s;
    let y = -v.x() * s + v.y() * c;
    let ry = ((x / ratio).powi(2) + y * y).sqrt();
    if ry < EPSILON {
        return Err(Error::CurveDegenerate("arc start coincides with center"));
    }
    let rx = ratio * ry;
    let offs = (y / ry).atan2(x / rx);
    elliptical_arc(center, rx, ry, offs, sweep, xang, style)
}

/// A closed ellipse with semi-axes `rx`, `ry` and axis rotation `xang`.
pub fn ellipse(center: &Point, rx: f64, ry: f64, xang: f64) -> Result<Path> {
    elliptical_arc(center, rx, ry, 0.0, TAU, xang, ArcStyle::Chord)
}

/// A closed circle.
pub fn circle(center: &Point, r: f64) -> Result<Path> {
    ellipse(center, r, r, 0.0)
}

/// The circle through three points.
///
/// Fails with [`Error::CurveDegenerate`] for colinear input.
pub fn circle_from_points(p1: &Point, p2: &Point, p3: &Point) -> Result<Path> {
    let (center, r) = curve::circumcircle(p1, p2, p3)?;
    circle(&center, r)
}

/// A classic three-centered egg: a semicircular base of radius `r`, two
/// 2r flank arcs, and a small apex arc, apex pointing along `xang + π/2`.
pub fn egg(center: &Point, r: f64, xang: f64) -> Result<Path> {
    let (cx, cy) = (center.x(), center.y());
    let rot = |ox: f64, oy: f64| {
        let (s, c) = xang.sin_cos();
        (cx + ox * c - oy * s, cy + ox * s + oy * c)
    };
    let apex_r = (2.0 - core::f64::consts::SQRT_2) * r;
    let mut parts = Vec::new();
    let (ax, ay) = rot(-r, 0.0);
    let (bx, by) = rot(r, 0.0);
    let (tx, ty) = rot(0.0, r);
    parts.extend(make_arc_parts(ax, ay, 2.0 * r, 2.0 * r, xang, 0.0, PI / 4.0));
    parts.extend(make_arc_parts(tx, ty, apex_r, apex_r, xang, PI / 4.0, FRAC_PI_2));
    parts.extend(make_arc_parts(bx, by, 2.0 * r, 2.0 * r, xang, 3.0 * PI / 4.0, PI / 4.0));
    parts.extend(make_arc_parts(cx, cy, r, r, xang, PI, PI));
    let mut path = Path::from_parts(parts)?;
    path.close();
    Ok(path)
}

/// A lune (crescent): an outer semicircle of radius `r` over the chord
/// `(−r, 0)–(r, 0)` (rotated by `xang` about `center`), closed by an arc
/// whose apex sits at height `bulge` above the chord midpoint.
///
/// A zero bulge degenerates the inner boundary to the chord itself.
pub fn lune(center: &Point, r: f64, bulge: f64, xang: f64) -> Result<Path> {
    if r < EPSILON {
        return Err(Error::CurveDegenerate("lune with empty radius"));
    }
    if (bulge - r).abs() < EPSILON {
        return Err(Error::CurveDegenerate("lune bulge equals its radius"));
    }
    let mut parts = make_arc_parts(center.x(), center.y(), r, r, xang, 0.0, PI);
    let (s, c) = xang.sin_cos();
    let at = |ox: f64, oy: f64| {
        Point::new(
            center.x() + ox * c - oy * s,
            center.y() + ox * s + oy * c,
        )
    };
    let left = at(-r, 0.0);
    let right = at(r, 0.0);
    if bulge.abs() < EPSILON {
        parts.push(Part::line(left, right));
    } else {
        let mid = at(0.0, bulge);
        let (ic, ir) = curve::circumcircle(&left, &mid, &right)?;
        let a0 = (&left - &ic).angle();
        let a1 = (&right - &ic).angle();
        let am = (&mid - &ic).angle();
        let mut sweep = (a1 - a0).rem_euclid(TAU);
        if !curve::angle_in_sweep(am, a0, sweep) {
            sweep -= TAU;
        }
        parts.extend(make_arc_parts(ic.x(), ic.y(), ir, ir, 0.0, a0, sweep));
    }
    let mut path = Path::from_parts(parts)?;
    path.close();
    Ok(path)
}
