// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Visual feature extractors. Each one is a read-only pass over the raster or
// the grayscale field derived from it.

pub mod censor;
pub mod color_regions;
pub mod contrast;
pub mod edges;
pub mod raster;
pub mod sharpness;
pub mod text_density;

pub use raster::{GrayField, Hsv};

/// Correlate a 3x3 kernel (row-major) with the 3x3 neighbourhood centred on
/// interior pixel `(x, y)` of a row-major field of the given width.
#[inline]
pub(crate) fn convolve3x3(data: &[f32], width: usize, x: usize, y: usize, kernel: &[f32; 9]) -> f32 {
    let mut acc = 0.0f32;
    for ky in 0..3 {
        let row = (y + ky - 1) * width;
        for kx in 0..3 {
            acc += kernel[ky * 3 + kx] * data[row + x + kx - 1];
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convolve_identity_kernel() {
        let data: Vec<f32> = (0..9).map(|v| v as f32).collect();
        let identity = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(convolve3x3(&data, 3, 1, 1, &identity), 4.0);
    }

    #[test]
    fn convolve_horizontal_ramp() {
        // Every row rises by 2 across the window; row weights 1, 2, 1 give 8.
        let data = [0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0, 1.0, 2.0];
        let sobel_x = [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0];
        assert_eq!(convolve3x3(&data, 3, 1, 1, &sobel_x), 8.0);
    }
}
