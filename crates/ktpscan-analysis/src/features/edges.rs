// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sobel edge detection over the grayscale field.

use super::{GrayField, convolve3x3};

const SOBEL_X: [f32; 9] = [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0];
const SOBEL_Y: [f32; 9] = [-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0];

/// Boolean edge mask plus the edge-pixel fraction over interior pixels.
///
/// The mask is stored full-size and row-major; the 1-pixel border is always
/// `false` because the Sobel window does not fit there.
#[derive(Debug, Clone)]
pub struct EdgeMap {
    width: u32,
    mask: Vec<bool>,
    edge_count: usize,
    interior_count: usize,
}

impl EdgeMap {
    pub fn is_edge(&self, x: u32, y: u32) -> bool {
        self.mask[y as usize * self.width as usize + x as usize]
    }

    /// Row-major mask, same dimensions as the grayscale field.
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Edge pixels over interior pixels; 0 when there is no interior.
    pub fn density(&self) -> f64 {
        if self.interior_count == 0 {
            0.0
        } else {
            self.edge_count as f64 / self.interior_count as f64
        }
    }
}

/// Mark interior pixels whose Sobel magnitude (on a 0..255 scale) exceeds
/// `threshold`.
pub fn detect_edges(gray: &GrayField, threshold: f64) -> EdgeMap {
    let (width, height) = gray.dimensions();
    let w = width as usize;
    let h = height as usize;
    let mut mask = vec![false; w * h];
    let mut edge_count = 0usize;

    if width < 3 || height < 3 {
        return EdgeMap {
            width,
            mask,
            edge_count,
            interior_count: 0,
        };
    }

    let data = gray.as_raw();
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let gx = convolve3x3(data, w, x, y, &SOBEL_X) as f64;
            let gy = convolve3x3(data, w, x, y, &SOBEL_Y) as f64;
            let magnitude = (gx * gx + gy * gy).sqrt() * 255.0;
            if magnitude > threshold {
                mask[y * w + x] = true;
                edge_count += 1;
            }
        }
    }

    EdgeMap {
        width,
        mask,
        edge_count,
        interior_count: (w - 2) * (h - 2),
    }
}
