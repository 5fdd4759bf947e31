// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ktpscan-analysis — Image feature extraction and scoring for KTP scans.
//
// Provides per-pixel statistics (grayscale, HSV saturation/hue), focus,
// edge, contrast and text-density measures, color-region and redaction
// heuristics, a fuzzy OCR keyword gate, and the decision engine that
// combines them into a score and label.

pub mod engine;
pub mod features;
pub mod gate;
pub mod image;
pub mod ocr;
pub mod scoring;

// Re-export the primary entry points so callers can use `ktpscan_analysis::KtpAnalyzer` etc.
pub use engine::KtpAnalyzer;
pub use gate::keywords::KeywordGate;
pub use crate::image::resample::safe_downscale;
pub use ocr::recognizer::{FixedTextRecognizer, TextRecognizer, recognize_with_timeout};

#[cfg(feature = "ocr")]
pub use ocr::ocrs_backend::OcrsRecognizer;
