// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fillers: pixel sources sampled through rasterized coverage.

use crate::pixmap::Pixmap;
use peniko::color::{AlphaColor, PremulRgba8, Srgb};
use scrawl_path::{Point, Rect};

/// An infinite or bounded image that can answer "what color is at this
/// pixel".
pub trait Filler {
    /// The premultiplied color at pixel `(x, y)` in target coordinates.
    fn color_at(&self, x: i32, y: i32) -> PremulRgba8;

    /// The region outside which the filler is transparent, or `None` for
    /// an unbounded filler.
    fn bounds(&self) -> Option<Rect> {
        None
    }
}

/// A single uniform color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solid {
    premul: PremulRgba8,
}

impl Solid {
    /// A solid filler of the given color.
    pub fn new(color: AlphaColor<Srgb>) -> Self {
        Self {
            premul: color.premultiply().to_rgba8(),
        }
    }
}

impl Filler for Solid {
    fn color_at(&self, _x: i32, _y: i32) -> PremulRgba8 {
        self.premul
    }
}

/// A pixmap placed at an origin, optionally tiled over the plane.
#[derive(Debug, Clone)]
pub struct PixmapFiller {
    pixmap: Pixmap,
    origin: (i32, i32),
    tile: bool,
}

impl PixmapFiller {
    /// A bounded patch with its top-left corner at `origin`.
    pub fn new(pixmap: Pixmap, origin: (i32, i32)) -> Self {
        Self {
            pixmap,
            origin,
            tile: false,
        }
    }

    /// A patch repeated over the whole plane.
    pub fn tiled(pixmap: Pixmap, origin: (i32, i32)) -> Self {
        Self {
            pixmap,
            origin,
            tile: true,
        }
    }
}

impl Filler for PixmapFiller {
    fn color_at(&self, x: i32, y: i32) -> PremulRgba8 {
        let (w, h) = (
            i32::from(self.pixmap.width()),
            i32::from(self.pixmap.height()),
        );
        if w == 0 || h == 0 {
            return PremulRgba8::from_u32(0);
        }
        let (mut px, mut py) = (x - self.origin.0, y - self.origin.1);
        if self.tile {
            px = px.rem_euclid(w);
            py = py.rem_euclid(h);
        } else if px < 0 || py < 0 || px >= w || py >= h {
            return PremulRgba8::from_u32(0);
        }
        self.pixmap.sample(px as u16, py as u16)
    }

    fn bounds(&self) -> Option<Rect> {
        if self.tile {
            return None;
        }
        Some(Rect::new(
            f64::from(self.origin.0),
            f64::from(self.origin.1),
            f64::from(self.origin.0) + f64::from(self.pixmap.width()),
            f64::from(self.origin.1) + f64::from(self.pixmap.height()),
        ))
    }
}

/// A linear gradient between two points with at least two color stops.
#[derive(Debug, Clone)]
pub struct LinearGradient {
    start: Point,
    // Axis vector divided by its squared length, so projection is a dot.
    axis: Point,
    stops: Vec<(f32, AlphaColor<Srgb>)>,
}

impl LinearGradient {
    /// A gradient from `start` to `end`; `stops` are `(offset, color)`
    /// pairs with offsets in `[0, 1]`, sorted ascending.
    ///
    /// Colors are clamped to the first/last stop outside the axis span.
    pub fn new(start: Point, end: Point, mut stops: Vec<(f32, AlphaColor<Srgb>)>) -> Self {
        assert!(stops.len() >= 2, "a gradient needs at least two stops");
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        let axis = &end - &start;
        let len_sq = axis.dot(&axis).max(f64::EPSILON);
        Self {
            start,
            axis: &axis * (1.0 / len_sq),
            stops,
        }
    }
}

impl Filler for LinearGradient {
    fn color_at(&self, x: i32, y: i32) -> PremulRgba8 {
        let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        let t = ((&p - &self.start).dot(&self.axis) as f32).clamp(0.0, 1.0);
        let (mut lo, mut hi) = (self.stops[0], self.stops[self.stops.len() - 1]);
        for w in self.stops.windows(2) {
            if t >= w[0].0 && t <= w[1].0 {
                (lo, hi) = (w[0], w[1]);
                break;
            }
        }
        let span = hi.0 - lo.0;
        let f = if span <= f32::EPSILON {
            0.0
        } else {
            ((t - lo.0) / span).clamp(0.0, 1.0)
        };
        let a = lo.1.components;
        let b = hi.1.components;
        let mixed = AlphaColor::<Srgb>::new([
            a[0] + (b[0] - a[0]) * f,
            a[1] + (b[1] - a[1]) * f,
            a[2] + (b[2] - a[2]) * f,
            a[3] + (b[3] - a[3]) * f,
        ]);
        mixed.premultiply().to_rgba8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_is_everywhere() {
        let s = Solid::new(AlphaColor::from_rgba8(255, 0, 0, 255));
        assert_eq!(s.color_at(0, 0), s.color_at(1000, -1000));
        assert_eq!(s.color_at(0, 0).r, 255);
        assert!(s.bounds().is_none());
    }

    #[test]
    fn bounded_patch_is_transparent_outside() {
        let mut p = Pixmap::new(2, 2);
        p.fill(AlphaColor::from_rgba8(0, 255, 0, 255));
        let f = PixmapFiller::new(p, (10, 10));
        assert_eq!(f.color_at(11, 11).g, 255);
        assert_eq!(f.color_at(9, 10).a, 0);
        let b = f.bounds().unwrap();
        assert!((b.x0 - 10.0).abs() < 1e-9 && (b.x1 - 12.0).abs() < 1e-9);
    }

    #[test]
    fn tiled_patch_repeats() {
        let mut p = Pixmap::new(2, 1);
        p.set_pixel(0, 0, PremulRgba8 { r: 255, g: 0, b: 0, a: 255 });
        p.set_pixel(1, 0, PremulRgba8 { r: 0, g: 0, b: 255, a: 255 });
        let f = PixmapFiller::tiled(p, (0, 0));
        assert_eq!(f.color_at(0, 0).r, 255);
        assert_eq!(f.color_at(2, 5).r, 255);
        assert_eq!(f.color_at(-1, 0).b, 255);
        assert!(f.bounds().is_none());
    }

    #[test]
    fn gradient_interpolates_between_stops() {
        let g = LinearGradient::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            vec![
                (0.0, AlphaColor::from_rgba8(0, 0, 0, 255)),
                (1.0, AlphaColor::from_rgba8(255, 255, 255, 255)),
            ],
        );
        let start = g.color_at(0, 0);
        let mid = g.color_at(50, 0);
        let end = g.color_at(99, 0);
        assert!(start.r < 10);
        assert!(end.r > 245);
        assert!(mid.r > start.r && mid.r < end.r);
    }
}
