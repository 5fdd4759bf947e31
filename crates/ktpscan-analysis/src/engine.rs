// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Decision & scoring engine.
//
// Terminal states, first match wins:
//
// 1. OCR found text without any keyword       → reject_non_ktp (no pixel work)
// 2. KTP-likelihood predicate fails           → reject_non_ktp
// 3. Censored area at or above hard threshold → reject_censored
// 4. Weighted score, degraded by an OCR timeout/unavailability, and
//    optionally rejected as reject_non_ktp_ocr_timeout when the visual
//    evidence is weak; otherwise bucketed into good / fair / poor / reject.

use std::sync::Arc;

use image::RgbImage;
use ktpscan_core::config::AnalyzerConfig;
use ktpscan_core::error::{KtpError, Result};
use ktpscan_core::types::{
    AnalysisResult, DocumentKind, FeatureVector, OcrDiagnostic, OcrOutcome, QualityLabel,
};
use tracing::{debug, info, instrument};

use crate::features::censor::censor_fraction;
use crate::features::color_regions::color_regions;
use crate::features::contrast::rms_contrast;
use crate::features::edges::detect_edges;
use crate::features::raster::{colored_fraction, grayscale_field};
use crate::features::sharpness::variance_of_laplacian;
use crate::features::text_density::text_density;
use crate::gate::KeywordGate;
use crate::image::resample::safe_downscale;
use crate::ocr::recognizer::{TextRecognizer, recognize_with_timeout};
use crate::scoring::{
    clamp_score, classify_document, is_ktp_likely, label_for_score, normalize, score_features,
};

/// Scores photographed documents as KTP scans.
///
/// Holds only immutable configuration, so one analyzer can serve concurrent
/// calls; every derived buffer lives for a single call.
///
/// ```ignore
/// let analyzer = KtpAnalyzer::new(AnalyzerConfig::default())?;
/// let ocr = analyzer.diagnose_text(&ocr_text);
/// let result = analyzer.analyze(&raster, &ocr)?;
/// println!("{result}");
/// ```
#[derive(Debug, Clone)]
pub struct KtpAnalyzer {
    config: AnalyzerConfig,
    gate: KeywordGate,
}

impl KtpAnalyzer {
    /// Build an analyzer after validating `config`.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        let gate = KeywordGate::from_config(&config.ocr_gate);
        Ok(Self { config, gate })
    }

    /// Run already-recognised text through the keyword gate.
    pub fn diagnose_text(&self, text: &str) -> OcrDiagnostic {
        self.gate.diagnose(text)
    }

    /// Analyze `raster` given an OCR outcome obtained elsewhere.
    ///
    /// # Errors
    ///
    /// [`KtpError::EmptyRaster`] for a zero-area raster. Nothing else fails.
    #[instrument(skip_all, fields(width = raster.width(), height = raster.height(), ocr = %ocr.outcome))]
    pub fn analyze(&self, raster: &RgbImage, ocr: &OcrDiagnostic) -> Result<AnalysisResult> {
        ensure_non_empty(raster)?;

        if ocr.outcome == OcrOutcome::NoKeywords {
            info!("OCR text has no KTP keywords; skipping pixel analysis");
            return Ok(AnalysisResult {
                score: 0.0,
                label: QualityLabel::RejectNonKtp,
                document_kind: DocumentKind::Unknown,
                features: None,
                breakdown: None,
                ocr: ocr.clone(),
            });
        }

        let working = safe_downscale(raster, self.config.max_dimension);
        let features = self.features_of(&working);
        Ok(self.decide(&features, ocr))
    }

    /// Run OCR with the bounded wait, then analyze.
    ///
    /// OCR runs on the downscaled working copy. Recognizer failures never
    /// surface as errors; they become the OCR outcome.
    #[instrument(skip_all, fields(width = raster.width(), height = raster.height()))]
    pub fn analyze_with_recognizer(
        &self,
        raster: &RgbImage,
        recognizer: Arc<dyn TextRecognizer>,
    ) -> Result<AnalysisResult> {
        ensure_non_empty(raster)?;

        let working = Arc::new(safe_downscale(raster, self.config.max_dimension).into_owned());
        let ocr = recognize_with_timeout(
            recognizer,
            Arc::clone(&working),
            self.config.ocr_timeout(),
            &self.gate,
        );
        self.analyze(&working, &ocr)
    }

    /// Compute the full feature vector for `raster` (after downscaling).
    #[instrument(skip_all, fields(width = raster.width(), height = raster.height()))]
    pub fn extract_features(&self, raster: &RgbImage) -> Result<FeatureVector> {
        ensure_non_empty(raster)?;
        let working = safe_downscale(raster, self.config.max_dimension);
        Ok(self.features_of(&working))
    }

    fn features_of(&self, raster: &RgbImage) -> FeatureVector {
        let pixels = &self.config.pixels;

        let gray = grayscale_field(raster);
        let colored = colored_fraction(raster, pixels.colored_saturation);
        let sharpness = variance_of_laplacian(&gray);
        let edges = detect_edges(&gray, pixels.edge_magnitude);
        let contrast = rms_contrast(&gray);
        let text = text_density(&gray, &edges, pixels.text_gray_low, pixels.text_gray_high);
        let regions = color_regions(raster, pixels);
        let censor = censor_fraction(&gray, &self.config.censor);

        let features = FeatureVector {
            colored_fraction: colored,
            sharpness,
            edge_density: edges.density(),
            rms_contrast: contrast,
            text_density: text,
            blue_background_fraction: regions.blue_background_fraction,
            red_portrait_score: regions.red_portrait_score,
            censor_fraction: censor,
            occlusion_fraction: regions.occlusion_fraction,
            aspect_ratio: raster.width() as f64 / raster.height() as f64,
            document_kind: classify_document(colored, pixels),
        };

        debug!(
            colored = features.colored_fraction,
            vlap = features.sharpness,
            edge = features.edge_density,
            contrast = features.rms_contrast,
            text = features.text_density,
            blue = features.blue_background_fraction,
            red = features.red_portrait_score,
            censor = features.censor_fraction,
            occlusion = features.occlusion_fraction,
            aspect = features.aspect_ratio,
            kind = %features.document_kind,
            "Features extracted"
        );
        features
    }

    /// Apply the decision tree to already-extracted features.
    pub fn decide(&self, features: &FeatureVector, ocr: &OcrDiagnostic) -> AnalysisResult {
        let reject = |label: QualityLabel| AnalysisResult {
            score: 0.0,
            label,
            document_kind: features.document_kind,
            features: Some(*features),
            breakdown: None,
            ocr: ocr.clone(),
        };

        if ocr.outcome == OcrOutcome::NoKeywords {
            return reject(QualityLabel::RejectNonKtp);
        }

        if !is_ktp_likely(features, &self.config.likelihood) {
            info!(label = %QualityLabel::RejectNonKtp, "KTP-likelihood predicate failed");
            return reject(QualityLabel::RejectNonKtp);
        }

        if features.censor_fraction >= self.config.censor.hard_reject_fraction {
            info!(
                censor = features.censor_fraction,
                label = %QualityLabel::RejectCensored,
                "Censored area above hard limit"
            );
            return reject(QualityLabel::RejectCensored);
        }

        let breakdown = score_features(features, &self.config);
        let mut score = breakdown.score;

        if ocr.outcome.is_degraded() {
            let gate = &self.config.ocr_gate;
            score = clamp_score(score * gate.timeout_multiplier);

            let bands = &self.config.bands;
            let text_norm =
                normalize(features.text_density, bands.text_density.lo, bands.text_density.hi);
            let weak_visual =
                text_norm < gate.weak_text_norm || features.edge_density < gate.weak_edge_density;

            if gate.auto_reject_on_weak_visual && weak_visual {
                info!(
                    text_norm,
                    edge = features.edge_density,
                    label = %QualityLabel::RejectNonKtpOcrTimeout,
                    "No OCR confirmation and weak visual evidence"
                );
                return AnalysisResult {
                    breakdown: Some(breakdown),
                    ..reject(QualityLabel::RejectNonKtpOcrTimeout)
                };
            }
        }

        let label = label_for_score(score, &self.config.labels);
        info!(score, label = %label, kind = %features.document_kind, "Analysis complete");

        AnalysisResult {
            score,
            label,
            document_kind: features.document_kind,
            features: Some(*features),
            breakdown: Some(breakdown),
            ocr: ocr.clone(),
        }
    }
}

fn ensure_non_empty(raster: &RgbImage) -> Result<()> {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Err(KtpError::EmptyRaster { width, height });
    }
    Ok(())
}
