// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the KTP scan checker.

use serde::{Deserialize, Serialize};

/// Maximum number of characters of recognised text kept for diagnostics.
pub const OCR_SAMPLE_CHARS: usize = 48;

/// What the OCR collaborator produced, as seen by the keyword gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrOutcome {
    /// At least one KTP keyword was recognised.
    FoundKeywords,
    /// Text came back but none of the keywords matched.
    NoKeywords,
    /// Recognition failed or exceeded the bounded wait.
    TimeoutOrError,
    /// The recognition model or runtime is not installed.
    RecognitionUnavailable,
}

impl OcrOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoundKeywords => "found_keywords",
            Self::NoKeywords => "no_keywords",
            Self::TimeoutOrError => "timeout_or_error",
            Self::RecognitionUnavailable => "recognition_unavailable",
        }
    }

    /// Whether the outcome means no usable text was obtained.
    ///
    /// Unavailable recognition scores exactly like a timeout.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::TimeoutOrError | Self::RecognitionUnavailable)
    }
}

impl std::fmt::Display for OcrOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OCR result summary carried through to the final report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrDiagnostic {
    pub outcome: OcrOutcome,
    pub has_keywords: bool,
    /// Length of the recognised text in characters.
    pub text_length: usize,
    /// Leading slice of the recognised text.
    pub sample: String,
}

impl OcrDiagnostic {
    /// Build a diagnostic for text that went through the keyword gate.
    pub fn from_text(text: &str, has_keywords: bool) -> Self {
        let outcome = if has_keywords {
            OcrOutcome::FoundKeywords
        } else {
            OcrOutcome::NoKeywords
        };
        Self {
            outcome,
            has_keywords,
            text_length: text.chars().count(),
            sample: text.chars().take(OCR_SAMPLE_CHARS).collect(),
        }
    }

    /// Diagnostic for a recognition call that failed or ran out of time.
    pub fn timeout_or_error() -> Self {
        Self::without_text(OcrOutcome::TimeoutOrError)
    }

    /// Diagnostic for a missing OCR model or runtime.
    pub fn unavailable() -> Self {
        Self::without_text(OcrOutcome::RecognitionUnavailable)
    }

    fn without_text(outcome: OcrOutcome) -> Self {
        Self {
            outcome,
            has_keywords: false,
            text_length: 0,
            sample: String::new(),
        }
    }
}

/// Coarse document classification from the colored-pixel fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    ColorDocument,
    GrayscaleDocumentOnColoredBg,
    GrayscaleDocument,
    /// Visual features were never computed (OCR gate rejected first).
    Unknown,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ColorDocument => "color_document",
            Self::GrayscaleDocumentOnColoredBg => "grayscale_document_on_colored_bg",
            Self::GrayscaleDocument => "grayscale_document",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final categorical verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLabel {
    Good,
    Fair,
    Poor,
    Reject,
    RejectNonKtp,
    RejectCensored,
    RejectNonKtpOcrTimeout,
}

impl QualityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Reject => "reject",
            Self::RejectNonKtp => "reject_non_ktp",
            Self::RejectCensored => "reject_censored",
            Self::RejectNonKtpOcrTimeout => "reject_non_ktp_ocr_timeout",
        }
    }
}

impl std::fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar measurements extracted from one raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Fraction of pixels whose HSV saturation exceeds the colored threshold.
    pub colored_fraction: f64,
    /// Variance of the absolute Laplacian response, scaled by 1000.
    pub sharpness: f64,
    pub edge_density: f64,
    pub rms_contrast: f64,
    pub text_density: f64,
    pub blue_background_fraction: f64,
    pub red_portrait_score: f64,
    pub censor_fraction: f64,
    pub occlusion_fraction: f64,
    pub aspect_ratio: f64,
    pub document_kind: DocumentKind,
}

/// Every intermediate value of the weighted score, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub color_norm: f64,
    pub sharpness_norm: f64,
    pub edge_norm: f64,
    pub contrast_norm: f64,
    pub text_norm: f64,
    /// `100 × Σ weight·norm`, before any penalty.
    pub weighted: f64,
    pub photocopy_factor: f64,
    pub censor_factor: f64,
    pub occlusion_factor: f64,
    /// Visual score after all penalties, clamped to [0, 100].
    pub score: f64,
}

/// Outcome of one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Final score in [0, 100].
    pub score: f64,
    pub label: QualityLabel,
    pub document_kind: DocumentKind,
    /// Absent when the OCR gate rejected before pixel analysis.
    pub features: Option<FeatureVector>,
    /// Absent for every terminal state reached before scoring.
    pub breakdown: Option<ScoreBreakdown>,
    pub ocr: OcrDiagnostic,
}

impl AnalysisResult {
    /// Ordered `(key, value)` pairs for plain-text presentation.
    pub fn to_key_values(&self) -> Vec<(&'static str, String)> {
        let mut kv = vec![
            ("score", format!("{:.1}", self.score)),
            ("label", self.label.to_string()),
            ("document_type", self.document_kind.to_string()),
            ("ocr_outcome", self.ocr.outcome.to_string()),
            ("ocr_has_keywords", self.ocr.has_keywords.to_string()),
            ("ocr_text_length", self.ocr.text_length.to_string()),
            ("ocr_sample", format!("{:?}", self.ocr.sample)),
        ];

        if let Some(f) = &self.features {
            kv.extend([
                ("colored_fraction", format!("{:.4}", f.colored_fraction)),
                ("sharpness_vlap", format!("{:.3}", f.sharpness)),
                ("edge_density", format!("{:.4}", f.edge_density)),
                ("rms_contrast", format!("{:.4}", f.rms_contrast)),
                ("text_density", format!("{:.4}", f.text_density)),
                ("blue_bg_fraction", format!("{:.4}", f.blue_background_fraction)),
                ("red_portrait_score", format!("{:.4}", f.red_portrait_score)),
                ("censor_fraction", format!("{:.4}", f.censor_fraction)),
                ("occlusion_fraction", format!("{:.4}", f.occlusion_fraction)),
                ("aspect_ratio", format!("{:.3}", f.aspect_ratio)),
            ]);
        }

        if let Some(b) = &self.breakdown {
            kv.extend([
                ("weighted_score", format!("{:.2}", b.weighted)),
                ("photocopy_factor", format!("{:.3}", b.photocopy_factor)),
                ("censor_factor", format!("{:.3}", b.censor_factor)),
                ("occlusion_factor", format!("{:.3}", b.occlusion_factor)),
            ]);
        }

        kv
    }
}

impl std::fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (key, value) in self.to_key_values() {
            writeln!(f, "{key}: {value}")?;
        }
        Ok(())
    }
}
