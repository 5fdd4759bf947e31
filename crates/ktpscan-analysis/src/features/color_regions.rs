// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Color-region heuristics over the original RGB raster: the card's blue
// background, the red-toned portrait on the right, and strong unexpected
// colour patches (stickers, fingers, foreign objects).

use image::RgbImage;
use ktpscan_core::config::PixelThresholds;

use super::Hsv;

/// The three colour-region measurements of one raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRegions {
    pub blue_background_fraction: f64,
    pub red_portrait_score: f64,
    pub occlusion_fraction: f64,
}

/// Run all three colour-region scans.
pub fn color_regions(raster: &RgbImage, t: &PixelThresholds) -> ColorRegions {
    ColorRegions {
        blue_background_fraction: blue_background_fraction(raster, t),
        red_portrait_score: red_portrait_right_score(raster, t),
        occlusion_fraction: occlusion_fraction(raster, t),
    }
}

/// First column of the right third.
fn right_third_start(width: u32) -> u32 {
    (width * 2) / 3
}

fn in_blue_band(hsv: &Hsv, t: &PixelThresholds) -> bool {
    let hue = hsv.hue as f64;
    hue >= t.blue_hue_min && hue <= t.blue_hue_max
}

fn is_red_hue(hsv: &Hsv, t: &PixelThresholds) -> bool {
    let hue = hsv.hue as f64;
    hue <= t.red_hue_max || hue >= t.red_hue_wrap_min
}

/// Fraction of all pixels that are saturated blue-band background.
pub fn blue_background_fraction(raster: &RgbImage, t: &PixelThresholds) -> f64 {
    let total = raster.width() as u64 * raster.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let blue = raster
        .pixels()
        .map(|p| Hsv::from_rgb(*p))
        .filter(|hsv| hsv.saturation as f64 > t.blue_saturation && in_blue_band(hsv, t))
        .count();
    blue as f64 / total as f64
}

/// Fraction of right-third pixels that are saturated red.
pub fn red_portrait_right_score(raster: &RgbImage, t: &PixelThresholds) -> f64 {
    let start = right_third_start(raster.width());
    let region = (raster.width() - start) as u64 * raster.height() as u64;
    if region == 0 {
        return 0.0;
    }
    let red = raster
        .enumerate_pixels()
        .filter(|(x, _, _)| *x >= start)
        .map(|(_, _, p)| Hsv::from_rgb(*p))
        .filter(|hsv| hsv.saturation as f64 > t.red_saturation && is_red_hue(hsv, t))
        .count();
    red as f64 / region as f64
}

/// Fraction of all pixels that are strongly saturated but neither card blue
/// nor expected portrait red in the right third.
pub fn occlusion_fraction(raster: &RgbImage, t: &PixelThresholds) -> f64 {
    let total = raster.width() as u64 * raster.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let start = right_third_start(raster.width());
    let occluded = raster
        .enumerate_pixels()
        .filter(|(x, _, p)| {
            let hsv = Hsv::from_rgb(**p);
            if hsv.saturation as f64 <= t.occlusion_saturation || in_blue_band(&hsv, t) {
                return false;
            }
            let expected_portrait = *x >= start
                && hsv.saturation as f64 > t.red_saturation
                && is_red_hue(&hsv, t);
            !expected_portrait
        })
        .count();
    occluded as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    const CARD_BLUE: Rgb<u8> = Rgb([100, 125, 200]);
    const PORTRAIT_RED: Rgb<u8> = Rgb([200, 40, 40]);
    const STICKER_GREEN: Rgb<u8> = Rgb([30, 200, 30]);
    const PAPER: Rgb<u8> = Rgb([235, 235, 230]);

    fn thresholds() -> PixelThresholds {
        PixelThresholds::default()
    }

    #[test]
    fn half_blue_raster() {
        let mut img = RgbImage::from_pixel(60, 40, PAPER);
        draw_filled_rect_mut(&mut img, Rect::at(0, 0).of_size(60, 20), CARD_BLUE);
        let regions = color_regions(&img, &thresholds());
        assert!((regions.blue_background_fraction - 0.5).abs() < 1e-12);
        assert_eq!(regions.red_portrait_score, 0.0);
        assert_eq!(regions.occlusion_fraction, 0.0);
    }

    #[test]
    fn portrait_on_right_is_not_occlusion() {
        let mut img = RgbImage::from_pixel(60, 40, PAPER);
        // Right third starts at x = 40; fill the whole of it.
        draw_filled_rect_mut(&mut img, Rect::at(40, 0).of_size(20, 40), PORTRAIT_RED);
        let regions = color_regions(&img, &thresholds());
        assert!((regions.red_portrait_score - 1.0).abs() < 1e-12);
        assert_eq!(regions.occlusion_fraction, 0.0);
    }

    #[test]
    fn red_on_left_counts_as_occlusion() {
        let mut img = RgbImage::from_pixel(60, 40, PAPER);
        draw_filled_rect_mut(&mut img, Rect::at(0, 0).of_size(10, 12), PORTRAIT_RED);
        let regions = color_regions(&img, &thresholds());
        assert_eq!(regions.red_portrait_score, 0.0);
        assert!((regions.occlusion_fraction - 120.0 / 2400.0).abs() < 1e-12);
    }

    #[test]
    fn green_sticker_anywhere_is_occlusion() {
        let mut img = RgbImage::from_pixel(60, 40, CARD_BLUE);
        draw_filled_rect_mut(&mut img, Rect::at(45, 10).of_size(10, 10), STICKER_GREEN);
        let regions = color_regions(&img, &thresholds());
        assert!((regions.occlusion_fraction - 100.0 / 2400.0).abs() < 1e-12);
    }

    #[test]
    fn pale_blue_is_below_saturation_floor() {
        // Saturation 0.1 < 0.15.
        let img = RgbImage::from_pixel(10, 10, Rgb([180, 190, 200]));
        assert_eq!(blue_background_fraction(&img, &thresholds()), 0.0);
    }
}
