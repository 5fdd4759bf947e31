// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global RMS contrast.

use super::GrayField;

/// Population standard deviation of the whole grayscale field.
pub fn rms_contrast(gray: &GrayField) -> f64 {
    let data = gray.as_raw();
    if data.is_empty() {
        return 0.0;
    }

    let n = data.len() as f64;
    let (sum, sum_sq) = data.iter().fold((0.0f64, 0.0f64), |(s, sq), v| {
        let v = *v as f64;
        (s + v, sq + v * v)
    });
    let mean = sum / n;
    // Clamp guards against tiny negative variance from rounding.
    (sum_sq / n - mean * mean).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn uniform_field_has_zero_contrast() {
        let gray = GrayField::from_pixel(16, 9, Luma([128.0 / 255.0]));
        assert_eq!(rms_contrast(&gray), 0.0);
    }

    #[test]
    fn half_black_half_white_is_one_half() {
        let gray = GrayField::from_fn(10, 4, |x, _| Luma([if x < 5 { 0.0 } else { 1.0 }]));
        assert!((rms_contrast(&gray) - 0.5).abs() < 1e-9);
    }
}
