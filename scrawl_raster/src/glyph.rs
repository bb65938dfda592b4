// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph outlines extracted as paths.
//!
//! Outlines come out in font coordinates scaled to the requested pixel
//! size, with y pointing up; compose with [`Affine::flip_y`] (or a full
//! text layout transform) before rasterizing.
//!
//! [`Affine::flip_y`]: scrawl_path::Affine::flip_y

use scrawl_path::{Path, Point, Shape};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{FontRef, GlyphId, MetadataProvider};

/// Collects pen callbacks into closed [`Path`] contours.
#[derive(Default)]
struct PathPen {
    paths: Vec<Path>,
    current: Option<Path>,
}

impl PathPen {
    fn flush(&mut self) {
        if let Some(mut path) = self.current.take() {
            if path.steps().len() > 1 {
                // Font contours are implicitly closed.
                path.close();
                self.paths.push(path);
            }
        }
    }

    fn finish(mut self) -> Vec<Path> {
        self.flush();
        self.paths
    }
}

impl OutlinePen for PathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush();
        self.current = Some(Path::new(Point::new(f64::from(x), f64::from(y))));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        if let Some(path) = &mut self.current {
            // A segment collapsing onto the previous point is dropped.
            let _ = path.line_to(Point::new(f64::from(x), f64::from(y)));
        }
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        if let Some(path) = &mut self.current {
            let _ = path.quad_to(
                Point::new(f64::from(cx0), f64::from(cy0)),
                Point::new(f64::from(x), f64::from(y)),
            );
        }
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        if let Some(path) = &mut self.current {
            let _ = path.curve_to(
                Point::new(f64::from(cx0), f64::from(cy0)),
                Point::new(f64::from(cx1), f64::from(cy1)),
                Point::new(f64::from(x), f64::from(y)),
            );
        }
    }

    fn close(&mut self) {
        self.flush();
    }
}

/// The outline of `glyph_id` at `ppem` pixels per em, one path per
/// contour, or `None` when the font has no outline for the glyph.
pub fn glyph_paths(font: &FontRef<'_>, glyph_id: GlyphId, ppem: f32) -> Option<Vec<Path>> {
    let outline = font.outline_glyphs().get(glyph_id)?;
    let mut pen = PathPen::default();
    let settings = DrawSettings::unhinted(Size::new(ppem), LocationRef::default());
    outline.draw(settings, &mut pen).ok()?;
    Some(pen.finish())
}

/// The outline of `glyph_id` as a single multi-contour shape, ready for
/// even-odd or non-zero filling.
pub fn glyph_shape(font: &FontRef<'_>, glyph_id: GlyphId, ppem: f32) -> Option<Shape> {
    let paths = glyph_paths(font, glyph_id, ppem)?;
    let mut shape = Shape::new();
    shape.add_paths(&paths);
    Some(shape)
}
