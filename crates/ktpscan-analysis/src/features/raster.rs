// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster statistics — grayscale field and HSV saturation classification.

use image::{ImageBuffer, Luma, Rgb, RgbImage};

/// Row-major luminance field with values in [0, 1].
pub type GrayField = ImageBuffer<Luma<f32>, Vec<f32>>;

/// BT.601 luma of an 8-bit RGB triple, scaled to [0, 1].
///
/// Computed in `f64` and rounded once, so a triple whose exact luma is a
/// threshold value lands on that threshold's `f32` image.
#[inline]
pub fn luminance(Rgb([r, g, b]): Rgb<u8>) -> f32 {
    ((0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) / 255.0) as f32
}

/// Convert the raster to a grayscale field once; every grayscale-based
/// extractor reads this same buffer.
pub fn grayscale_field(raster: &RgbImage) -> GrayField {
    ImageBuffer::from_fn(raster.width(), raster.height(), |x, y| {
        Luma([luminance(*raster.get_pixel(x, y))])
    })
}

/// Hue in degrees [0, 360) and saturation in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub hue: f32,
    pub saturation: f32,
}

impl Hsv {
    pub fn from_rgb(Rgb([r, g, b]): Rgb<u8>) -> Self {
        let r = r as f32 / 255.0;
        let g = g as f32 / 255.0;
        let b = b as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let saturation = if max > 0.0 { delta / max } else { 0.0 };

        let hue = if delta <= 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let hue = if hue < 0.0 { hue + 360.0 } else { hue };

        Self { hue, saturation }
    }
}

/// Fraction of pixels whose HSV saturation exceeds `threshold`.
pub fn colored_fraction(raster: &RgbImage, threshold: f64) -> f64 {
    let total = raster.width() as u64 * raster.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let colored = raster
        .pixels()
        .filter(|p| Hsv::from_rgb(**p).saturation as f64 > threshold)
        .count();
    colored as f64 / total as f64
}
