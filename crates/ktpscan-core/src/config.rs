// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Analyzer configuration. Every tunable constant of the scoring model lives
// here so a deployment can recalibrate without rebuilding.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{KtpError, Result};

/// Inclusive `[lo, hi]` range used for min-max normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub lo: f64,
    pub hi: f64,
}

impl Band {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }
}

/// Complete analyzer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Longer side cap for the internal working copy of the raster.
    pub max_dimension: u32,
    /// Bounded wait for the OCR collaborator, in milliseconds.
    pub ocr_timeout_ms: u64,
    pub pixels: PixelThresholds,
    pub censor: CensorThresholds,
    pub likelihood: LikelihoodThresholds,
    pub bands: NormalizationBands,
    pub weights: ScoreWeights,
    pub penalties: PenaltyConfig,
    pub ocr_gate: OcrGateConfig,
    pub labels: LabelThresholds,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_dimension: 1400,
            ocr_timeout_ms: 12_000,
            pixels: PixelThresholds::default(),
            censor: CensorThresholds::default(),
            likelihood: LikelihoodThresholds::default(),
            bands: NormalizationBands::default(),
            weights: ScoreWeights::default(),
            penalties: PenaltyConfig::default(),
            ocr_gate: OcrGateConfig::default(),
            labels: LabelThresholds::default(),
        }
    }
}

/// Per-pixel classification thresholds (HSV and edge magnitude).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelThresholds {
    /// Saturation above which a pixel counts as colored.
    pub colored_saturation: f64,
    /// Sobel magnitude (0..255 scale) above which a pixel is an edge.
    pub edge_magnitude: f64,
    /// Open grayscale interval for "ink" edges.
    pub text_gray_low: f64,
    pub text_gray_high: f64,
    pub blue_saturation: f64,
    pub blue_hue_min: f64,
    pub blue_hue_max: f64,
    pub red_saturation: f64,
    /// Red hue accepted at or below this angle...
    pub red_hue_max: f64,
    /// ...or at or above this one.
    pub red_hue_wrap_min: f64,
    pub occlusion_saturation: f64,
    /// Colored fraction above which the scan is a color document.
    pub color_document_fraction: f64,
    /// Colored fraction above which a grayscale document sits on a colored background.
    pub tinted_background_fraction: f64,
}

impl Default for PixelThresholds {
    fn default() -> Self {
        Self {
            colored_saturation: 0.18,
            edge_magnitude: 20.0,
            text_gray_low: 0.15,
            text_gray_high: 0.85,
            blue_saturation: 0.15,
            blue_hue_min: 185.0,
            blue_hue_max: 265.0,
            red_saturation: 0.35,
            red_hue_max: 25.0,
            red_hue_wrap_min: 335.0,
            occlusion_saturation: 0.55,
            color_document_fraction: 0.35,
            tinted_background_fraction: 0.08,
        }
    }
}

/// Redaction-bar detector constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CensorThresholds {
    pub min_block_size: u32,
    /// Block side is `min(width, height) / block_divisor`, floored at `min_block_size`.
    pub block_divisor: u32,
    pub dark_mean: f64,
    pub bright_mean: f64,
    pub flat_variance: f64,
    /// Censored area fraction at which the scan is rejected outright.
    pub hard_reject_fraction: f64,
}

impl Default for CensorThresholds {
    fn default() -> Self {
        Self {
            min_block_size: 8,
            block_divisor: 40,
            dark_mean: 0.08,
            bright_mean: 0.96,
            flat_variance: 0.00035,
            hard_reject_fraction: 0.10,
        }
    }
}

/// Bounds of the "looks like a KTP" predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LikelihoodThresholds {
    pub aspect_min: f64,
    pub aspect_max: f64,
    pub min_text_density: f64,
    pub min_blue_fraction: f64,
    pub min_red_portrait: f64,
}

impl Default for LikelihoodThresholds {
    fn default() -> Self {
        Self {
            aspect_min: 1.2,
            aspect_max: 2.4,
            min_text_density: 0.12,
            min_blue_fraction: 0.08,
            min_red_portrait: 0.05,
        }
    }
}

/// Min-max bands each raw feature is normalized against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationBands {
    /// Applied after `ln(1 + x)`.
    pub sharpness: Band,
    pub edge_density: Band,
    pub contrast: Band,
    pub text_density: Band,
    pub colored_fraction: Band,
}

impl Default for NormalizationBands {
    fn default() -> Self {
        Self {
            sharpness: Band::new(2.0, 80.0),
            edge_density: Band::new(0.01, 0.25),
            contrast: Band::new(0.015, 0.30),
            text_density: Band::new(0.10, 0.95),
            colored_fraction: Band::new(0.02, 0.35),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub colored_fraction: f64,
    pub sharpness: f64,
    pub edge_density: f64,
    pub contrast: f64,
    pub text_density: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            colored_fraction: 0.10,
            sharpness: 0.12,
            edge_density: 0.18,
            contrast: 0.28,
            text_density: 0.32,
        }
    }
}

/// Multiplicative penalty shaping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyConfig {
    /// Flat factor for anything that is not a color document.
    pub photocopy_factor: f64,
    pub censor_strength: f64,
    /// Censored fraction at which the linear ramp saturates.
    pub censor_full_at: f64,
    pub occlusion_strength: f64,
    /// Occluded fraction at which the quadratic ramp saturates.
    pub occlusion_full_at: f64,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            photocopy_factor: 0.60,
            censor_strength: 0.85,
            censor_full_at: 0.06,
            occlusion_strength: 0.45,
            occlusion_full_at: 0.30,
        }
    }
}

/// Keyword gate and OCR-degradation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrGateConfig {
    pub keywords: Vec<String>,
    pub similarity_threshold: f64,
    /// Score multiplier when OCR timed out or was unavailable.
    pub timeout_multiplier: f64,
    pub auto_reject_on_weak_visual: bool,
    /// Normalized text density below which a timed-out scan is weak.
    pub weak_text_norm: f64,
    /// Raw edge density below which a timed-out scan is weak.
    pub weak_edge_density: f64,
}

impl Default for OcrGateConfig {
    fn default() -> Self {
        Self {
            keywords: vec!["NIK".into(), "NAMA".into(), "ALAMAT".into()],
            similarity_threshold: 0.78,
            timeout_multiplier: 0.25,
            auto_reject_on_weak_visual: true,
            weak_text_norm: 0.25,
            weak_edge_density: 0.06,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelThresholds {
    pub good: f64,
    pub fair: f64,
    pub poor: f64,
}

impl Default for LabelThresholds {
    fn default() -> Self {
        Self {
            good: 80.0,
            fair: 60.0,
            poor: 40.0,
        }
    }
}

impl AnalyzerConfig {
    /// Load a (possibly partial) JSON config; missing keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Bounded OCR wait as a `Duration`.
    pub fn ocr_timeout(&self) -> Duration {
        Duration::from_millis(self.ocr_timeout_ms)
    }

    /// Reject settings the scoring model cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_dimension == 0 {
            return Err(invalid("max_dimension must be positive"));
        }
        if self.ocr_timeout_ms == 0 {
            return Err(invalid("ocr_timeout_ms must be positive"));
        }
        if self.censor.min_block_size == 0 || self.censor.block_divisor == 0 {
            return Err(invalid("censor block sizing must be positive"));
        }

        let bands = [
            ("sharpness", self.bands.sharpness),
            ("edge_density", self.bands.edge_density),
            ("contrast", self.bands.contrast),
            ("text_density", self.bands.text_density),
            ("colored_fraction", self.bands.colored_fraction),
        ];
        for (name, band) in bands {
            if !(band.lo < band.hi) {
                return Err(invalid(&format!(
                    "band `{name}` must satisfy lo < hi (got {}..{})",
                    band.lo, band.hi
                )));
            }
        }
        if self.bands.sharpness.lo < 0.0 {
            return Err(invalid("sharpness band must be non-negative"));
        }

        let w = &self.weights;
        let weights = [w.colored_fraction, w.sharpness, w.edge_density, w.contrast, w.text_density];
        if weights.iter().any(|v| *v < 0.0) {
            return Err(invalid("score weights must be non-negative"));
        }

        if self.penalties.censor_full_at <= 0.0 || self.penalties.occlusion_full_at <= 0.0 {
            return Err(invalid("penalty ramps must saturate at a positive fraction"));
        }

        if self.ocr_gate.keywords.is_empty() {
            return Err(invalid("at least one OCR keyword is required"));
        }
        if self.ocr_gate.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(invalid("OCR keywords must not be blank"));
        }

        let l = &self.labels;
        if !(l.good >= l.fair && l.fair >= l.poor) {
            return Err(invalid("label thresholds must be ordered good >= fair >= poor"));
        }

        Ok(())
    }
}

fn invalid(msg: &str) -> KtpError {
    KtpError::InvalidConfig(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        AnalyzerConfig::default().validate().unwrap();
        assert_eq!(AnalyzerConfig::default().ocr_timeout(), Duration::from_secs(12));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ktpscan.json");
        std::fs::write(
            &path,
            r#"{ "max_dimension": 900, "ocr_gate": { "auto_reject_on_weak_visual": false } }"#,
        )
        .unwrap();

        let config = AnalyzerConfig::from_json_file(&path).unwrap();
        assert_eq!(config.max_dimension, 900);
        assert!(!config.ocr_gate.auto_reject_on_weak_visual);
        assert_eq!(config.ocr_gate.keywords, vec!["NIK", "NAMA", "ALAMAT"]);
        assert_eq!(config.ocr_gate.timeout_multiplier, 0.25);
        assert_eq!(config.bands, NormalizationBands::default());
    }

    #[test]
    fn inverted_band_is_rejected() {
        let mut config = AnalyzerConfig::default();
        config.bands.contrast = Band::new(0.3, 0.01);
        assert!(matches!(config.validate(), Err(KtpError::InvalidConfig(_))));
    }

    #[test]
    fn empty_keywords_rejected() {
        let mut config = AnalyzerConfig::default();
        config.ocr_gate.keywords.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AnalyzerConfig::from_json_file("/nonexistent/ktpscan.json").unwrap_err();
        assert!(matches!(err, KtpError::Io(_)));
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = AnalyzerConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, KtpError::Serialization(_)));
    }
}
