// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The fill driver: shape in, pixels out.

use crate::coverage::Coverage;
use crate::filler::Filler;
use crate::mask::Mask;
use crate::pixmap::Pixmap;
use peniko::color::PremulRgba8;
use peniko::Fill;
use scrawl_path::{Path, Rect, Shape};

/// Quality knobs carried through a render call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    /// Tolerance used when flattening curves for rasterization.
    pub flatten_tolerance: f64,
    /// Fill rule applied to winding numbers.
    pub winding_rule: Fill,
    /// Whether edge pixels get fractional coverage.
    pub antialias: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            flatten_tolerance: 0.6,
            winding_rule: Fill::EvenOdd,
            antialias: true,
        }
    }
}

/// How source pixels combine with the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompositeMode {
    /// Source over destination (the painter's default).
    #[default]
    SrcOver,
    /// Source replaces destination where covered.
    Src,
}

#[inline(always)]
fn mul8(a: u8, b: u8) -> u8 {
    ((u16::from(a) * u16::from(b) + 127) / 255) as u8
}

fn scale(pixel: PremulRgba8, coverage: f32) -> PremulRgba8 {
    let s = |c: u8| (f32::from(c) * coverage + 0.5) as u8;
    PremulRgba8 {
        r: s(pixel.r),
        g: s(pixel.g),
        b: s(pixel.b),
        a: s(pixel.a),
    }
}

fn path_has_nan(path: &Path) -> bool {
    path.steps()
        .iter()
        .any(|s| s.points().iter().any(|p| p.is_nan()))
}

/// Integer pixel box of the effective clip, or `None` when empty.
fn clip_box(target: &Pixmap, clip: Option<&Rect>, bounds: &[Option<Rect>]) -> Option<(i32, i32, i32, i32)> {
    let mut eff = Rect::new(
        0.0,
        0.0,
        f64::from(target.width()),
        f64::from(target.height()),
    );
    if let Some(c) = clip {
        eff = eff.intersect(c);
    }
    for b in bounds.iter().flatten() {
        eff = eff.intersect(b);
    }
    if eff.is_empty() {
        return None;
    }
    let x0 = eff.x0.floor().max(0.0) as i32;
    let y0 = eff.y0.floor().max(0.0) as i32;
    let x1 = (eff.x1.ceil() as i32).min(i32::from(target.width()));
    let y1 = (eff.y1.ceil() as i32).min(i32::from(target.height()));
    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

fn accumulate(cov: &mut Coverage, path: &Path, origin: (i32, i32), tolerance: f64) {
    if path_has_nan(path) {
        log::warn!("skipping path with NaN coordinates");
        return;
    }
    let flat = path.flatten(tolerance);
    let (ox, oy) = (origin.0 as f64, origin.1 as f64);
    let start = flat.start();
    cov.move_to((start.x() - ox) as f32, (start.y() - oy) as f32);
    for step in &flat.steps()[1..] {
        let p = step.last();
        cov.line_to((p.x() - ox) as f32, (p.y() - oy) as f32);
    }
    cov.close();
}

/// Fill `shape` into `target` through `filler`, optionally clipped,
/// masked, and composited with the given mode.
///
/// The working region is the intersection of the target, the clip, the
/// shape bounds, the filler bounds, and the mask extent; nothing outside
/// it is touched. Paths containing NaN are skipped with a warning.
#[allow(clippy::too_many_arguments)]
pub fn render_shape(
    target: &mut Pixmap,
    clip: Option<&Rect>,
    shape: &Shape,
    filler: &dyn Filler,
    mask: Option<(&Mask, (i32, i32))>,
    mode: CompositeMode,
    settings: &RenderSettings,
) {
    if shape.is_empty() {
        return;
    }
    let mask_bounds = mask.map(|(m, (mx, my))| {
        Rect::new(
            f64::from(mx),
            f64::from(my),
            f64::from(mx) + f64::from(m.width()),
            f64::from(my) + f64::from(m.height()),
        )
    });
    let Some((x0, y0, x1, y1)) = clip_box(
        target,
        clip,
        &[Some(shape.bounds()), filler.bounds(), mask_bounds],
    ) else {
        return;
    };
    let (cw, ch) = ((x1 - x0) as usize, (y1 - y0) as usize);
    let region = Rect::new(f64::from(x0), f64::from(y0), f64::from(x1), f64::from(y1));
    let mut cov = Coverage::new(cw, ch);
    let mut any = false;
    for path in shape.paths() {
        if path.bounds().intersect(&region).is_empty() {
            continue;
        }
        accumulate(&mut cov, path, (x0, y0), settings.flatten_tolerance);
        any = true;
    }
    if !any {
        return;
    }
    cov.resolve(settings.winding_rule, settings.antialias);
    for y in 0..ch {
        for x in 0..cw {
            let mut c = cov.at(x, y);
            let (tx, ty) = (x0 + x as i32, y0 + y as i32);
            if let Some((m, (mx, my))) = mask {
                let (ux, uy) = (tx - mx, ty - my);
                if ux < 0 || uy < 0 || ux >= i32::from(m.width()) || uy >= i32::from(m.height()) {
                    continue;
                }
                c *= f32::from(m.sample(ux as u16, uy as u16)) / 255.0;
            }
            if c <= 0.0 {
                continue;
            }
            let src = scale(filler.color_at(tx, ty), c.min(1.0));
            let dst = target.sample(tx as u16, ty as u16);
            let out = match mode {
                CompositeMode::SrcOver => {
                    let inv = 255 - src.a;
                    PremulRgba8 {
                        r: src.r.saturating_add(mul8(dst.r, inv)),
                        g: src.g.saturating_add(mul8(dst.g, inv)),
                        b: src.b.saturating_add(mul8(dst.b, inv)),
                        a: src.a.saturating_add(mul8(dst.a, inv)),
                    }
                }
                CompositeMode::Src => src,
            };
            target.set_pixel(tx as u16, ty as u16, out);
        }
    }
}

/// Rasterize `shape`'s coverage over a `width` by `height` canvas into an
/// alpha mask.
pub fn rasterize_mask(shape: &Shape, width: u16, height: u16, settings: &RenderSettings) -> Mask {
    let mut cov = Coverage::new(usize::from(width), usize::from(height));
    for path in shape.paths() {
        accumulate(&mut cov, path, (0, 0), settings.flatten_tolerance);
    }
    cov.resolve(settings.winding_rule, settings.antialias);
    let mut data = Vec::with_capacity(usize::from(width) * usize::from(height));
    for y in 0..usize::from(height) {
        for x in 0..usize::from(width) {
            data.push((cov.at(x, y) * 255.0 + 0.5) as u8);
        }
    }
    Mask::from_parts(data, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filler::Solid;
    use peniko::color::AlphaColor;
    use scrawl_path::builder;
    use scrawl_path::Point;

    #[test]
    fn empty_clip_writes_nothing() {
        let mut target = Pixmap::new(20, 20);
        target.fill(AlphaColor::from_rgba8(255, 255, 255, 255));
        let before = target.data().to_vec();
        let circle = builder::circle(&Point::new(100.0, 100.0), 5.0).unwrap();
        let shape = Shape::from_path(circle);
        let red = Solid::new(AlphaColor::from_rgba8(255, 0, 0, 255));
        render_shape(
            &mut target,
            None,
            &shape,
            &red,
            None,
            CompositeMode::SrcOver,
            &RenderSettings::default(),
        );
        assert_eq!(target.data(), &before[..]);
    }

    #[test]
    fn mask_gates_the_fill() {
        let mut target = Pixmap::new(10, 10);
        let square = builder::polygon([
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ])
        .unwrap();
        let shape = Shape::from_path(square);
        // Mask passes only the left half.
        let mut alpha = vec![0_u8; 100];
        for y in 0..10 {
            for x in 0..5 {
                alpha[y * 10 + x] = 255;
            }
        }
        let mask = Mask::from_parts(alpha, 10, 10);
        let green = Solid::new(AlphaColor::from_rgba8(0, 255, 0, 255));
        render_shape(
            &mut target,
            None,
            &shape,
            &green,
            Some((&mask, (0, 0))),
            CompositeMode::SrcOver,
            &RenderSettings::default(),
        );
        assert_eq!(target.sample(2, 5).g, 255);
        assert_eq!(target.sample(7, 5).g, 0);
    }

    #[test]
    fn rasterized_mask_matches_the_shape() {
        let square = builder::polygon([
            Point::new(2.0, 2.0),
            Point::new(8.0, 2.0),
            Point::new(8.0, 8.0),
            Point::new(2.0, 8.0),
        ])
        .unwrap();
        let mask = rasterize_mask(
            &Shape::from_path(square),
            10,
            10,
            &RenderSettings::default(),
        );
        assert_eq!(mask.sample(5, 5), 255);
        assert_eq!(mask.sample(0, 0), 0);
    }
}
