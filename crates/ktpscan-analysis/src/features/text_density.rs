// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text-density heuristic: edges that sit on mid-gray pixels look like ink
// strokes on paper; edges on pure black or white are borders or glare.

use super::GrayField;
use super::edges::EdgeMap;

/// Fraction of edge pixels whose gray value lies strictly inside `(low, high)`.
///
/// Returns 0 when the edge map has no edges.
pub fn text_density(gray: &GrayField, edges: &EdgeMap, low: f64, high: f64) -> f64 {
    let total = edges.edge_count();
    if total == 0 {
        return 0.0;
    }

    // Compare at the field's own precision.
    let (low, high) = (low as f32, high as f32);
    let inked = edges
        .mask()
        .iter()
        .zip(gray.as_raw())
        .filter(|(is_edge, value)| **is_edge && **value > low && **value < high)
        .count();

    inked as f64 / total as f64
}
