// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Alpha and luminance masks.

use crate::pixmap::Pixmap;
use std::sync::Arc;

#[derive(Debug, PartialEq, Eq)]
struct MaskRepr {
    data: Vec<u8>,
    width: u16,
    height: u16,
}

/// A per-pixel alpha mask, cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask(Arc<MaskRepr>);

impl Mask {
    /// A mask from the pixmap's alpha channel.
    pub fn new_alpha(pixmap: &Pixmap) -> Self {
        Self::new_with(pixmap, true)
    }

    /// A mask from the pixmap's luminance.
    pub fn new_luminance(pixmap: &Pixmap) -> Self {
        Self::new_with(pixmap, false)
    }

    /// A mask from raw alpha values, row-major.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not exactly `width * height` values.
    pub fn from_parts(data: Vec<u8>, width: u16, height: u16) -> Self {
        assert_eq!(
            data.len(),
            usize::from(width) * usize::from(height),
            "expected `data` to have length of exactly `width * height`"
        );
        Self(Arc::new(MaskRepr {
            data,
            width,
            height,
        }))
    }

    fn new_with(pixmap: &Pixmap, alpha_mask: bool) -> Self {
        let data = pixmap
            .data()
            .iter()
            .map(|pixel| {
                if alpha_mask {
                    pixel.a
                } else {
                    let r = f32::from(pixel.r) / 255.;
                    let g = f32::from(pixel.g) / 255.;
                    let b = f32::from(pixel.b) / 255.;
                    // CSS Masking Module Level 1 § 7.10.1 luma weights;
                    // r, g, b are already premultiplied.
                    let luma = r * 0.2126 + g * 0.7152 + b * 0.0722;
                    (luma * 255.0 + 0.5) as u8
                }
            })
            .collect();
        Self(Arc::new(MaskRepr {
            data,
            width: pixmap.width(),
            height: pixmap.height(),
        }))
    }

    /// The width in pixels.
    pub fn width(&self) -> u16 {
        self.0.width
    }

    /// The height in pixels.
    pub fn height(&self) -> u16 {
        self.0.height
    }

    /// Sample the mask at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics when sampling out of bounds.
    #[inline(always)]
    pub fn sample(&self, x: u16, y: u16) -> u8 {
        self.0.data[usize::from(y) * usize::from(self.0.width) + usize::from(x)]
    }
}
