// Copyright 2026 the Scrawl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anti-aliased coverage accumulation.
//!
//! Contours are scan-converted into a per-pixel signed-difference buffer:
//! each edge adds, per scanline, the signed area it sweeps between
//! adjacent pixel columns. A horizontal prefix sum then turns the buffer
//! into winding numbers, which the fill rule maps to coverage in `[0, 1]`.

use peniko::Fill;

/// Coverage accumulator for one fill operation.
///
/// Coordinates are in buffer-local pixels; the caller translates target
/// coordinates before feeding contours.
pub struct Coverage {
    width: usize,
    height: usize,
    // Stride is width + 2: one spill column for edge antialiasing and one
    // for edges clamped to the right border.
    data: Vec<f32>,
    start: Option<(f32, f32)>,
    cursor: (f32, f32),
}

impl Coverage {
    /// An empty accumulator covering `width` by `height` pixels.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; (width + 2) * height],
            start: None,
            cursor: (0.0, 0.0),
        }
    }

    fn stride(&self) -> usize {
        self.width + 2
    }

    /// Begin a contour, closing any open one.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.close();
        self.start = Some((x, y));
        self.cursor = (x, y);
    }

    /// Extend the open contour with a straight edge.
    pub fn line_to(&mut self, x: f32, y: f32) {
        if self.start.is_none() {
            self.start = Some((x, y));
        } else {
            self.add_edge(self.cursor, (x, y));
        }
        self.cursor = (x, y);
    }

    /// Close the open contour back to its starting point.
    pub fn close(&mut self) {
        if let Some(start) = self.start {
            if start != self.cursor {
                self.add_edge(self.cursor, start);
            }
        }
        self.start = None;
    }

    fn add_edge(&mut self, p0: (f32, f32), p1: (f32, f32)) {
        // Clip to the right border: the part beyond it collapses to a
        // vertical edge just inside, preserving winding.
        let w = self.width as f32;
        if p0.0 > w || p1.0 > w {
            if p0.0 > w && p1.0 > w {
                self.add_edge_clipped((w - 0.001, p0.1), (w - 0.001, p1.1));
                return;
            }
            let t = (p0.0 - w) / (p0.0 - p1.0);
            let mid = (w, (1.0 - t) * p0.1 + t * p1.1);
            if p0.0 < w {
                self.add_edge_clipped(p0, mid);
                self.add_edge_clipped((w - 0.001, mid.1), (w - 0.001, p1.1));
            } else {
                self.add_edge_clipped((w - 0.001, p0.1), (w - 0.001, mid.1));
                self.add_edge_clipped(mid, p1);
            }
            return;
        }
        // Clip to the left border likewise: the part left of zero becomes
        // a vertical edge at x = 0.
        if p0.0 < 0.0 || p1.0 < 0.0 {
            if p0.0 <= 0.0 && p1.0 <= 0.0 {
                self.add_edge_clipped((0.0, p0.1), (0.0, p1.1));
                return;
            }
            let t = p0.0 / (p0.0 - p1.0);
            let mid = (0.0, (1.0 - t) * p0.1 + t * p1.1);
            if p1.0 > 0.0 {
                self.add_edge_clipped((0.0, p0.1), mid);
                self.add_edge_clipped(mid, p1);
            } else {
                self.add_edge_clipped(p0, mid);
                self.add_edge_clipped(mid, (0.0, p1.1));
            }
            return;
        }
        self.add_edge_clipped(p0, p1);
    }

    fn add_edge_clipped(&mut self, p0: (f32, f32), p1: (f32, f32)) {
        if (p0.1 - p1.1).abs() < 1e-6 {
            // Horizontal edges sweep no signed column difference.
            return;
        }
        let stride = self.stride();
        let (dir, p0, p1) = if p0.1 < p1.1 {
            (1.0_f32, p0, p1)
        } else {
            (-1.0_f32, p1, p0)
        };
        let dxdy = (p1.0 - p0.0) / (p1.1 - p0.1);
        let y_first = p0.1.max(0.0) as usize;
        let mut x_next = if p0.1 < 0.0 {
            p0.0 - p0.1 * dxdy
        } else {
            p0.0
        };
        let y_last = (p1.1.ceil().max(0.0) as usize).min(self.height);
        for y in y_first..y_last {
            let x = x_next;
            let row = y * stride;
            let dy = ((y + 1) as f32).min(p1.1) - (y as f32).max(p0.1);
            let d = dir * dy;
            x_next = x + dxdy * dy;
            let (x0, x1) = if x < x_next { (x, x_next) } else { (x_next, x) };
            let x0_floor = x0.floor().max(0.0);
            let x0i = x0_floor as usize;
            let x1_ceil = x1.ceil();
            let x1i = x1_ceil as usize;
            if x1i <= x0i + 1 {
                // The edge crosses a single column this scanline.
                let xmf = 0.5 * (x + x_next) - x0_floor;
                self.data[row + x0i] += d * (1.0 - xmf);
                self.data[row + x0i + 1] += d * xmf;
            } else {
                let s = (x1 - x0).recip();
                let x0f = x0 - x0_floor;
                let x1f = x1 - x1_ceil + 1.0;
                let a0 = 0.5 * s * (1.0 - x0f) * (1.0 - x0f);
                let am = 0.5 * s * x1f * x1f;
                self.data[row + x0i] += d * a0;
                if x1i == x0i + 2 {
                    self.data[row + x0i + 1] += d * (1.0 - a0 - am);
                } else {
                    let a1 = s * (1.5 - x0f);
                    self.data[row + x0i + 1] += d * (a1 - a0);
                    for xi in x0i + 2..x1i - 1 {
                        self.data[row + xi] += d * s;
                    }
                    let a2 = a1 + (x1i - x0i - 3) as f32 * s;
                    self.data[row + x1i - 1] += d * (1.0 - a2 - am);
                }
                self.data[row + x1i] += d * am;
            }
        }
    }

    /// Close any open contour and turn the buffer into per-pixel coverage
    /// under the given fill rule.
    ///
    /// Without antialiasing, coverage snaps to 0 or 1 at a 0.5 threshold.
    pub fn resolve(&mut self, fill: Fill, antialias: bool) {
        self.close();
        let stride = self.stride();
        for y in 0..self.height {
            let row = y * stride;
            let mut acc = 0.0_f32;
            for x in 0..stride {
                acc += self.data[row + x];
                let value = match fill {
                    Fill::NonZero => acc.abs().min(1.0),
                    Fill::EvenOdd => ((acc + 1.0).rem_euclid(2.0) - 1.0).abs(),
                };
                self.data[row + x] = if antialias {
                    if value < 1e-6 {
                        0.0
                    } else {
                        value
                    }
                } else if value >= 0.5 {
                    1.0
                } else {
                    0.0
                };
            }
        }
    }

    /// Coverage at pixel `(x, y)`; meaningful after [`resolve`](Self::resolve).
    #[inline(always)]
    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.stride() + x]
    }

    /// The accumulator's width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The accumulator's height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_coverage(fill: Fill, antialias: bool) -> Coverage {
        let mut c = Coverage::new(10, 10);
        c.move_to(2.0, 2.0);
        c.line_to(8.0, 2.0);
        c.line_to(8.0, 8.0);
        c.line_to(2.0, 8.0);
        c.close();
        c.resolve(fill, antialias);
        c
    }

    #[test]
    fn interior_is_fully_covered() {
        let c = rect_coverage(Fill::NonZero, true);
        assert!((c.at(5, 5) - 1.0).abs() < 1e-5);
        assert!(c.at(0, 0) < 1e-6);
        assert!(c.at(9, 9) < 1e-6);
    }

    #[test]
    fn fill_rules_agree_on_simple_contours() {
        let nz = rect_coverage(Fill::NonZero, true);
        let eo = rect_coverage(Fill::EvenOdd, true);
        for y in 0..10 {
            for x in 0..10 {
                assert!((nz.at(x, y) - eo.at(x, y)).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn even_odd_carves_holes() {
        let mut c = Coverage::new(10, 10);
        for (lo, hi) in [(1.0_f32, 9.0_f32), (3.0, 7.0)] {
            c.move_to(lo, lo);
            c.line_to(hi, lo);
            c.line_to(hi, hi);
            c.line_to(lo, hi);
            c.close();
        }
        c.resolve(Fill::EvenOdd, true);
        assert!(c.at(5, 5) < 1e-5);
        assert!((c.at(2, 5) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn half_covered_edge_pixels_antialias() {
        let mut c = Coverage::new(4, 4);
        c.move_to(0.5, 0.0);
        c.line_to(1.5, 0.0);
        c.line_to(1.5, 4.0);
        c.line_to(0.5, 4.0);
        c.close();
        c.resolve(Fill::NonZero, true);
        assert!((c.at(0, 2) - 0.5).abs() < 1e-4);
        assert!((c.at(1, 2) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn thresholding_disables_antialiasing() {
        let mut c = Coverage::new(4, 4);
        c.move_to(0.4, 0.0);
        c.line_to(1.6, 0.0);
        c.line_to(1.6, 4.0);
        c.line_to(0.4, 4.0);
        c.close();
        c.resolve(Fill::NonZero, false);
        for x in 0..4 {
            let v = c.at(x, 2);
            assert!(v == 0.0 || v == 1.0);
        }
    }

    #[test]
    fn geometry_right_of_the_buffer_still_winds() {
        // A rectangle sticking out past the right border must still fill
        // its in-buffer portion.
        let mut c = Coverage::new(4, 4);
        c.move_to(2.0, 1.0);
        c.line_to(9.0, 1.0);
        c.line_to(9.0, 3.0);
        c.line_to(2.0, 3.0);
        c.close();
        c.resolve(Fill::NonZero, true);
        assert!(c.at(3, 2) > 0.99);
        assert!(c.at(1, 2) < 1e-6);
    }
}
