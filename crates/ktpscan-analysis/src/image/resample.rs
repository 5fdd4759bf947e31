// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Safe downscaling — caps the longer side of a raster before analysis so the
// per-pixel passes stay bounded regardless of camera resolution.

use std::borrow::Cow;

use image::RgbImage;
use image::imageops::{self, FilterType};
use tracing::{debug, instrument};

/// Shrink `raster` so its longer side is at most `max_dimension`, preserving
/// aspect ratio. Uses Lanczos3 filtering for high-quality downscaling.
///
/// Rasters already within the limit are returned borrowed and untouched, so
/// the operation is idempotent.
#[instrument(skip(raster), fields(width = raster.width(), height = raster.height()))]
pub fn safe_downscale(raster: &RgbImage, max_dimension: u32) -> Cow<'_, RgbImage> {
    let (width, height) = raster.dimensions();
    let max_dimension = max_dimension.max(1);
    let longer = width.max(height);

    if longer <= max_dimension {
        return Cow::Borrowed(raster);
    }

    let scale = max_dimension as f64 / longer as f64;
    let new_w = ((width as f64 * scale).round() as u32).clamp(1, max_dimension);
    let new_h = ((height as f64 * scale).round() as u32).clamp(1, max_dimension);

    let resized = imageops::resize(raster, new_w, new_h, FilterType::Lanczos3);
    debug!(new_w, new_h, "Downscale complete");
    Cow::Owned(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn small_raster_is_borrowed_unchanged() {
        let img = RgbImage::from_pixel(1000, 500, Rgb([10, 20, 30]));
        let out = safe_downscale(&img, 1400);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.dimensions(), (1000, 500));
    }

    #[test]
    fn exact_limit_is_unchanged() {
        let img = RgbImage::from_pixel(1400, 900, Rgb([0, 0, 0]));
        assert!(matches!(safe_downscale(&img, 1400), Cow::Borrowed(_)));
    }

    #[test]
    fn large_raster_preserves_aspect() {
        let img = RgbImage::from_pixel(3000, 1001, Rgb([200, 200, 200]));
        let out = safe_downscale(&img, 1400);
        let (w, h) = out.dimensions();
        assert_eq!(w, 1400);
        assert_eq!(h, 467);

        let before = 3000.0 / 1001.0;
        let after = w as f64 / h as f64;
        assert!((before - after).abs() < 0.01, "aspect drifted: {before} vs {after}");
    }

    #[test]
    fn portrait_raster_caps_height() {
        let img = RgbImage::from_pixel(1000, 2800, Rgb([1, 2, 3]));
        let out = safe_downscale(&img, 1400);
        assert_eq!(out.dimensions(), (500, 1400));
    }

    #[test]
    fn downscale_is_idempotent() {
        let img = RgbImage::from_pixel(2800, 1750, Rgb([90, 120, 200]));
        let once = safe_downscale(&img, 1400).into_owned();
        let twice = safe_downscale(&once, 1400);
        assert!(matches!(twice, Cow::Borrowed(_)));
        assert_eq!(twice.as_ref(), &once);
    }
}
