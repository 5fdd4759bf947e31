// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Censorship block detector — finds flat, near-black or near-white blocks that
// look like redaction bars rather than natural image content.

use ktpscan_core::config::CensorThresholds;

use super::GrayField;

/// Side length of the square blocks used for a `width` x `height` raster.
pub fn block_size(width: u32, height: u32, t: &CensorThresholds) -> u32 {
    (width.min(height) / t.block_divisor.max(1)).max(t.min_block_size.max(1))
}

/// Area-weighted fraction of the image covered by censored blocks.
///
/// Partial blocks on the right and bottom edges count by their clipped area.
pub fn censor_fraction(gray: &GrayField, t: &CensorThresholds) -> f64 {
    let (width, height) = gray.dimensions();
    let total = width as u64 * height as u64;
    if total == 0 {
        return 0.0;
    }

    let side = block_size(width, height, t);
    let tables = IntegralTables::new(gray);
    let mut censored_area = 0u64;

    for y1 in (0..height).step_by(side as usize) {
        let y2 = (y1 + side).min(height);
        for x1 in (0..width).step_by(side as usize) {
            let x2 = (x1 + side).min(width);
            let area = (x2 - x1) as u64 * (y2 - y1) as u64;
            if area == 0 {
                continue;
            }

            let (mean, variance) = tables.region_stats(x1, y1, x2, y2);
            let extreme = mean < t.dark_mean || mean > t.bright_mean;
            if extreme && variance < t.flat_variance {
                censored_area += area;
            }
        }
    }

    censored_area as f64 / total as f64
}

// -- Integral image helpers ---------------------------------------------------

/// Summed-area tables of gray values and their squares.
///
/// `sum[y * (width+1) + x]` holds the sum over the rectangle [0, 0) to (x, y)
/// (exclusive on both axes), with a zero-padded first row and column.
struct IntegralTables {
    stride: usize,
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl IntegralTables {
    fn new(gray: &GrayField) -> Self {
        let (w, h) = gray.dimensions();
        let stride = w as usize + 1;
        let mut sum = vec![0.0f64; stride * (h as usize + 1)];
        let mut sum_sq = vec![0.0f64; stride * (h as usize + 1)];
        let data = gray.as_raw();

        for y in 0..h as usize {
            let mut row_sum = 0.0f64;
            let mut row_sq = 0.0f64;
            for x in 0..w as usize {
                let v = data[y * w as usize + x] as f64;
                row_sum += v;
                row_sq += v * v;
                let idx = (y + 1) * stride + (x + 1);
                let above = y * stride + (x + 1);
                sum[idx] = row_sum + sum[above];
                sum_sq[idx] = row_sq + sum_sq[above];
            }
        }

        Self {
            stride,
            sum,
            sum_sq,
        }
    }

    fn rect(&self, table: &[f64], x1: u32, y1: u32, x2: u32, y2: u32) -> f64 {
        let s = self.stride;
        let (x1, y1, x2, y2) = (x1 as usize, y1 as usize, x2 as usize, y2 as usize);
        table[y2 * s + x2] - table[y1 * s + x2] - table[y2 * s + x1] + table[y1 * s + x1]
    }

    /// Mean and population variance over `[x1, x2) x [y1, y2)`.
    fn region_stats(&self, x1: u32, y1: u32, x2: u32, y2: u32) -> (f64, f64) {
        let area = ((x2 - x1) * (y2 - y1)) as f64;
        if area == 0.0 {
            return (0.0, 0.0);
        }
        let mean = self.rect(&self.sum, x1, y1, x2, y2) / area;
        let mean_sq = self.rect(&self.sum_sq, x1, y1, x2, y2) / area;
        (mean, (mean_sq - mean * mean).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn thresholds() -> CensorThresholds {
        CensorThresholds::default()
    }

    #[test]
    fn block_size_floor_and_scale() {
        let t = thresholds();
        assert_eq!(block_size(100, 60, &t), 8);
        assert_eq!(block_size(1400, 880, &t), 22);
    }

    #[test]
    fn mid_gray_is_never_censored() {
        let gray = GrayField::from_pixel(80, 50, Luma([0.5]));
        assert_eq!(censor_fraction(&gray, &thresholds()), 0.0);
    }

    #[test]
    fn all_black_is_fully_censored() {
        let gray = GrayField::from_pixel(83, 51, Luma([0.0]));
        assert!((censor_fraction(&gray, &thresholds()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn black_bar_counts_its_area() {
        // 80x48 raster, 8px blocks; a black bar covering blocks x 16..48, y 8..24.
        let gray = GrayField::from_fn(80, 48, |x, y| {
            let in_bar = (16..48).contains(&x) && (8..24).contains(&y);
            Luma([if in_bar { 0.0 } else { 0.5 }])
        });
        let expected = (32.0 * 16.0) / (80.0 * 48.0);
        assert!((censor_fraction(&gray, &thresholds()) - expected).abs() < 1e-12);
    }

    #[test]
    fn partial_edge_blocks_use_clipped_area() {
        // 20x8 raster, 8px blocks: two full blocks and a 4x8 strip on the right.
        let gray = GrayField::from_fn(20, 8, |x, _| Luma([if x >= 16 { 1.0 } else { 0.5 }]));
        let expected = 32.0 / 160.0;
        assert!((censor_fraction(&gray, &thresholds()) - expected).abs() < 1e-12);
    }

    #[test]
    fn textured_dark_block_is_not_flat() {
        // Dark but noisy: mean ~0.05 with variance well above the flatness floor.
        let gray = GrayField::from_fn(16, 16, |x, y| Luma([if (x + y) % 2 == 0 { 0.0 } else { 0.1 }]));
        assert_eq!(censor_fraction(&gray, &thresholds()), 0.0);
    }
}
