// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A premultiplied RGBA8 pixel target.

use peniko::color::{AlphaColor, PremulRgba8, Rgba8, Srgb};

/// A pixmap of premultiplied RGBA8 pixels in row-major order, origin at
/// the top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u16,
    height: u16,
    buf: Vec<PremulRgba8>,
}

impl Pixmap {
    /// A pixmap of the given size, fully transparent.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            buf: vec![PremulRgba8::from_u32(0); usize::from(width) * usize::from(height)],
        }
    }

    /// A pixmap from existing premultiplied pixel data.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not exactly `width * height` pixels.
    pub fn from_parts(data: Vec<PremulRgba8>, width: u16, height: u16) -> Self {
        assert_eq!(
            data.len(),
            usize::from(width) * usize::from(height),
            "expected `data` to have length of exactly `width * height`"
        );
        Self {
            width,
            height,
            buf: data,
        }
    }

    /// The width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// The height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The pixels, row-major.
    pub fn data(&self) -> &[PremulRgba8] {
        &self.buf
    }

    /// The pixels, row-major, mutable.
    pub fn data_mut(&mut self) -> &mut [PremulRgba8] {
        &mut self.buf
    }

    /// The pixels as raw bytes in `[r, g, b, a]` order.
    pub fn data_as_u8_slice(&self) -> &[u8] {
        bytemuck::cast_slice(&self.buf)
    }

    /// The pixels as raw bytes, mutable.
    pub fn data_as_u8_slice_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.buf)
    }

    /// Sample the pixel at `(x, y)`.
    #[inline(always)]
    pub fn sample(&self, x: u16, y: u16) -> PremulRgba8 {
        self.buf[usize::from(self.width) * usize::from(y) + usize::from(x)]
    }

    /// Overwrite the pixel at `(x, y)`.
    #[inline(always)]
    pub fn set_pixel(&mut self, x: u16, y: u16, pixel: PremulRgba8) {
        let idx = usize::from(self.width) * usize::from(y) + usize::from(x);
        self.buf[idx] = pixel;
    }

    /// Flood the whole pixmap with a color.
    pub fn fill(&mut self, color: AlphaColor<Srgb>) {
        let premul = color.premultiply().to_rgba8();
        self.buf.fill(premul);
    }

    /// Scale every channel by `alpha`.
    pub fn multiply_alpha(&mut self, alpha: u8) {
        let multiply = |component| ((u16::from(alpha) * u16::from(component)) / 255) as u8;
        for pixel in &mut self.buf {
            *pixel = PremulRgba8 {
                r: multiply(pixel.r),
                g: multiply(pixel.g),
                b: multiply(pixel.b),
                a: multiply(pixel.a),
            };
        }
    }

    /// Consume the pixmap, unpremultiplying each pixel.
    ///
    /// Not fast, but useful for saving to PNG etc.
    pub fn take_unpremultiplied(self) -> Vec<Rgba8> {
        self.buf
            .into_iter()
            .map(|PremulRgba8 { r, g, b, a }| {
                if a != 0 {
                    let scale = 255.0 / f32::from(a);
                    let unpremultiply = |component| (f32::from(component) * scale + 0.5) as u8;
                    Rgba8 {
                        r: unpremultiply(r),
                        g: unpremultiply(g),
                        b: unpremultiply(b),
                        a,
                    }
                } else {
                    Rgba8 { r, g, b, a }
                }
            })
            .collect()
    }

    /// Decode a PNG into a pixmap, premultiplying its pixels.
    #[cfg(feature = "png")]
    pub fn from_png(data: impl std::io::Read) -> Result<Self, png::DecodingError> {
        let mut decoder = png::Decoder::new(data);
        decoder.set_transformations(
            png::Transformations::normalize_to_color8() | png::Transformations::ALPHA,
        );
        let mut reader = decoder.read_info()?;
        let mut pixmap = {
            let info = reader.info();
            let width: u16 = info
                .width
                .try_into()
                .map_err(|_| png::DecodingError::LimitsExceeded)?;
            let height: u16 = info
                .height
                .try_into()
                .map_err(|_| png::DecodingError::LimitsExceeded)?;
            Self::new(width, height)
        };
        let (color_type, _) = reader.output_color_type();
        match color_type {
            png::ColorType::Rgba => {
                reader.next_frame(pixmap.data_as_u8_slice_mut())?;
            }
            png::ColorType::GrayscaleAlpha => {
                let mut gray = vec![0; reader.output_buffer_size()];
                reader.next_frame(&mut gray)?;
                for (ga, pixel) in gray.chunks_exact(2).zip(pixmap.data_mut()) {
                    *pixel = PremulRgba8 {
                        r: ga[0],
                        g: ga[0],
                        b: ga[0],
                        a: ga[1],
                    };
                }
            }
            _ => unreachable!("transformations normalize to 8-bit color with alpha"),
        }
        for pixel in pixmap.data_mut() {
            let a = u16::from(pixel.a);
            let premultiply = |e: u8| ((u16::from(e) * a) / 255) as u8;
            pixel.r = premultiply(pixel.r);
            pixel.g = premultiply(pixel.g);
            pixel.b = premultiply(pixel.b);
        }
        Ok(pixmap)
    }

    /// Encode the pixmap as a PNG.
    #[cfg(feature = "png")]
    pub fn into_png(self) -> Result<Vec<u8>, png::EncodingError> {
        let mut data = Vec::new();
        let mut encoder = png::Encoder::new(&mut data, u32::from(self.width), u32::from(self.height));
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(bytemuck::cast_slice(&self.take_unpremultiplied()))?;
        writer.finish().map(|_| data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_and_sample() {
        let mut p = Pixmap::new(4, 4);
        p.fill(AlphaColor::from_rgba8(255, 0, 0, 255));
        assert_eq!(p.sample(2, 2), PremulRgba8 { r: 255, g: 0, b: 0, a: 255 });
    }

    #[test]
    fn unpremultiply_round_trips_opaque_pixels() {
        let mut p = Pixmap::new(1, 1);
        p.set_pixel(0, 0, PremulRgba8 { r: 10, g: 20, b: 30, a: 255 });
        let plain = p.take_unpremultiplied();
        assert_eq!(plain[0], Rgba8 { r: 10, g: 20, b: 30, a: 255 });
    }

    #[test]
    fn multiply_alpha_halves_channels() {
        let mut p = Pixmap::new(1, 1);
        p.set_pixel(0, 0, PremulRgba8 { r: 200, g: 100, b: 0, a: 255 });
        p.multiply_alpha(127);
        let px = p.sample(0, 0);
        assert!(px.r >= 99 && px.r <= 100);
        assert_eq!(px.a, 127);
    }
}
