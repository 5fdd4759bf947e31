// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Focus measure: variance of the Laplacian response.

use super::{GrayField, convolve3x3};

/// 4-neighbour discrete Laplacian.
const LAPLACIAN: [f32; 9] = [0.0, 1.0, 0.0, 1.0, -4.0, 1.0, 0.0, 1.0, 0.0];

/// Scale applied to the variance so typical scans land in tens, not thousandths.
const VLAP_SCALE: f64 = 1000.0;

/// Variance of the absolute Laplacian over interior pixels, times 1000.
///
/// Higher values mean more high-frequency detail (less blur). Images with
/// no interior pixels (smaller than 3x3) yield 0.
pub fn variance_of_laplacian(gray: &GrayField) -> f64 {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return 0.0;
    }

    let w = width as usize;
    let data = gray.as_raw();
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;

    for y in 1..height as usize - 1 {
        for x in 1..w - 1 {
            let response = convolve3x3(data, w, x, y, &LAPLACIAN).abs() as f64;
            sum += response;
            sum_sq += response * response;
        }
    }

    let n = ((width - 2) as f64) * ((height - 2) as f64);
    let mean = sum / n;
    let variance = (sum_sq / n - mean * mean).max(0.0);
    VLAP_SCALE * variance
}
