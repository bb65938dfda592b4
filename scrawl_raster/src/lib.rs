// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU rasterization for [`scrawl_path`] geometry.
//!
//! Shapes are flattened, scan-converted into anti-aliased coverage, and
//! blended into a premultiplied RGBA8 [`Pixmap`] through a [`Filler`].
//! [`Renderable`] layers directives into retained scenes.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod coverage;
mod filler;
#[cfg(feature = "text")]
mod glyph;
mod mask;
mod pixmap;
mod render;
mod renderable;

pub use coverage::Coverage;
pub use filler::{Filler, LinearGradient, PixmapFiller, Solid};
#[cfg(feature = "text")]
pub use glyph::{glyph_paths, glyph_shape};
pub use mask::Mask;
pub use pixmap::Pixmap;
pub use render::{rasterize_mask, render_shape, CompositeMode, RenderSettings};
pub use renderable::{Pen, Renderable};

pub use peniko;
#[cfg(feature = "text")]
pub use skrifa;
