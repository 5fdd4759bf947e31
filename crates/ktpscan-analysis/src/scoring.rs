// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scoring model. Normalization curves, weighted sum, penalty shaping,
// document classification, KTP-likelihood predicate and label buckets.
//
// Everything here is a pure function of a `FeatureVector` and the config.

use ktpscan_core::config::{
    AnalyzerConfig, LabelThresholds, LikelihoodThresholds, PenaltyConfig, PixelThresholds,
};
use ktpscan_core::types::{DocumentKind, FeatureVector, QualityLabel, ScoreBreakdown};

/// Linear min-max normalization clamped to [0, 1].
///
/// NaN maps to 0. A degenerate band (`hi <= lo`) acts as a step at `hi`.
pub fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    if hi <= lo {
        return if value >= hi { 1.0 } else { 0.0 };
    }
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// Min-max normalization in `ln(1 + x)` space, for long-tailed features.
pub fn normalize_log(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    normalize(value.max(0.0).ln_1p(), lo.max(0.0).ln_1p(), hi.max(0.0).ln_1p())
}

/// Linear censor penalty factor, saturating at `censor_full_at`.
pub fn censor_penalty(censor_fraction: f64, p: &PenaltyConfig) -> f64 {
    let ramp = (censor_fraction / p.censor_full_at).clamp(0.0, 1.0);
    1.0 - p.censor_strength * ramp
}

/// Quadratic occlusion penalty factor, saturating at `occlusion_full_at`.
pub fn occlusion_penalty(occlusion_fraction: f64, p: &PenaltyConfig) -> f64 {
    let ramp = (occlusion_fraction / p.occlusion_full_at).clamp(0.0, 1.0);
    1.0 - p.occlusion_strength * ramp * ramp
}

/// Classify the scan from its colored-pixel fraction.
pub fn classify_document(colored_fraction: f64, t: &PixelThresholds) -> DocumentKind {
    if colored_fraction > t.color_document_fraction {
        DocumentKind::ColorDocument
    } else if colored_fraction > t.tinted_background_fraction {
        DocumentKind::GrayscaleDocumentOnColoredBg
    } else {
        DocumentKind::GrayscaleDocument
    }
}

/// Card-shaped, text-bearing, and either card-blue or carrying a portrait.
pub fn is_ktp_likely(f: &FeatureVector, t: &LikelihoodThresholds) -> bool {
    let aspect_ok = f.aspect_ratio >= t.aspect_min && f.aspect_ratio <= t.aspect_max;
    let text_ok = f.text_density >= t.min_text_density;
    let color_ok =
        f.blue_background_fraction >= t.min_blue_fraction || f.red_portrait_score >= t.min_red_portrait;
    aspect_ok && text_ok && color_ok
}

/// Visual score with every normalization and penalty step recorded.
pub fn score_features(f: &FeatureVector, config: &AnalyzerConfig) -> ScoreBreakdown {
    let bands = &config.bands;
    let w = &config.weights;

    let color_norm = normalize(f.colored_fraction, bands.colored_fraction.lo, bands.colored_fraction.hi);
    let sharpness_norm = normalize_log(f.sharpness, bands.sharpness.lo, bands.sharpness.hi);
    let edge_norm = normalize(f.edge_density, bands.edge_density.lo, bands.edge_density.hi);
    let contrast_norm = normalize(f.rms_contrast, bands.contrast.lo, bands.contrast.hi);
    let text_norm = normalize(f.text_density, bands.text_density.lo, bands.text_density.hi);

    let weighted = 100.0
        * (w.colored_fraction * color_norm
            + w.sharpness * sharpness_norm
            + w.edge_density * edge_norm
            + w.contrast * contrast_norm
            + w.text_density * text_norm);

    let photocopy_factor = if f.document_kind == DocumentKind::ColorDocument {
        1.0
    } else {
        config.penalties.photocopy_factor
    };
    let censor_factor = censor_penalty(f.censor_fraction, &config.penalties);
    let occlusion_factor = occlusion_penalty(f.occlusion_fraction, &config.penalties);

    let score = clamp_score(weighted * photocopy_factor * censor_factor * occlusion_factor);

    ScoreBreakdown {
        color_norm,
        sharpness_norm,
        edge_norm,
        contrast_norm,
        text_norm,
        weighted,
        photocopy_factor,
        censor_factor,
        occlusion_factor,
        score,
    }
}

/// Bucket a final score into good / fair / poor / reject.
pub fn label_for_score(score: f64, t: &LabelThresholds) -> QualityLabel {
    if score >= t.good {
        QualityLabel::Good
    } else if score >= t.fair {
        QualityLabel::Fair
    } else if score >= t.poor {
        QualityLabel::Poor
    } else {
        QualityLabel::Reject
    }
}

/// Clamp to [0, 100]; NaN becomes 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() { 0.0 } else { score.clamp(0.0, 100.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn features() -> FeatureVector {
        FeatureVector {
            colored_fraction: 0.0,
            sharpness: 2.0,
            edge_density: 0.25,
            rms_contrast: 0.30,
            text_density: 0.10 + 0.85 * 0.90625,
            blue_background_fraction: 0.5,
            red_portrait_score: 0.0,
            censor_fraction: 0.0,
            occlusion_fraction: 0.0,
            aspect_ratio: 1.6,
            document_kind: DocumentKind::GrayscaleDocument,
        }
    }

    #[test]
    fn normalize_clamps_and_scales() {
        assert_eq!(normalize(-1.0, 0.01, 0.25), 0.0);
        assert_eq!(normalize(5.0, 0.01, 0.25), 1.0);
        assert!((normalize(0.13, 0.01, 0.25) - 0.5).abs() < 1e-12);
        assert_eq!(normalize(f64::NAN, 0.0, 1.0), 0.0);
    }

    #[test]
    fn normalize_log_endpoints() {
        assert_eq!(normalize_log(2.0, 2.0, 80.0), 0.0);
        assert_eq!(normalize_log(80.0, 2.0, 80.0), 1.0);
        assert_eq!(normalize_log(0.0, 2.0, 80.0), 0.0);
        let mid = normalize_log(12.0, 2.0, 80.0);
        let expected = (13.0f64.ln() - 3.0f64.ln()) / (81.0f64.ln() - 3.0f64.ln());
        assert!((mid - expected).abs() < 1e-12);
    }

    #[test]
    fn censor_penalty_ramp() {
        let p = PenaltyConfig::default();
        assert!((censor_penalty(0.06, &p) - 0.15).abs() < 1e-12);
        assert!((censor_penalty(0.03, &p) - 0.575).abs() < 1e-12);
        assert_eq!(censor_penalty(0.0, &p), 1.0);
        assert!((censor_penalty(0.5, &p) - 0.15).abs() < 1e-12);
    }

    #[test]
    fn occlusion_penalty_is_quadratic() {
        let p = PenaltyConfig::default();
        assert_eq!(occlusion_penalty(0.0, &p), 1.0);
        assert!((occlusion_penalty(0.15, &p) - (1.0 - 0.45 * 0.25)).abs() < 1e-12);
        assert!((occlusion_penalty(0.30, &p) - 0.55).abs() < 1e-12);
        assert!((occlusion_penalty(0.90, &p) - 0.55).abs() < 1e-12);
    }

    #[test]
    fn document_classification_bands() {
        let t = PixelThresholds::default();
        assert_eq!(classify_document(0.36, &t), DocumentKind::ColorDocument);
        assert_eq!(classify_document(0.35, &t), DocumentKind::GrayscaleDocumentOnColoredBg);
        assert_eq!(classify_document(0.09, &t), DocumentKind::GrayscaleDocumentOnColoredBg);
        assert_eq!(classify_document(0.08, &t), DocumentKind::GrayscaleDocument);
    }

    #[test]
    fn likelihood_requires_shape_text_and_color() {
        let t = LikelihoodThresholds::default();
        let mut f = features();
        assert!(is_ktp_likely(&f, &t));

        f.aspect_ratio = 1.0;
        assert!(!is_ktp_likely(&f, &t));
        f.aspect_ratio = 1.6;

        f.text_density = 0.11;
        assert!(!is_ktp_likely(&f, &t));
        f.text_density = 0.12;
        assert!(is_ktp_likely(&f, &t));

        f.blue_background_fraction = 0.0;
        assert!(!is_ktp_likely(&f, &t));
        f.red_portrait_score = 0.05;
        assert!(is_ktp_likely(&f, &t));
    }

    #[test]
    fn grayscale_scan_gets_photocopy_penalty() {
        let config = AnalyzerConfig::default();
        let b = score_features(&features(), &config);
        assert_eq!(b.color_norm, 0.0);
        assert_eq!(b.sharpness_norm, 0.0);
        assert!((b.weighted - 75.0).abs() < 1e-9, "weighted = {}", b.weighted);
        assert_eq!(b.photocopy_factor, 0.60);
        assert!((b.score - 45.0).abs() < 1e-9);
        assert_eq!(label_for_score(b.score, &config.labels), QualityLabel::Poor);
    }

    #[test]
    fn perfect_color_scan_scores_100() {
        let config = AnalyzerConfig::default();
        let f = FeatureVector {
            colored_fraction: 0.5,
            sharpness: 500.0,
            edge_density: 0.4,
            rms_contrast: 0.4,
            text_density: 0.99,
            document_kind: DocumentKind::ColorDocument,
            ..features()
        };
        let b = score_features(&f, &config);
        assert!((b.score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn label_boundaries() {
        let t = LabelThresholds::default();
        assert_eq!(label_for_score(80.0, &t), QualityLabel::Good);
        assert_eq!(label_for_score(79.99, &t), QualityLabel::Fair);
        assert_eq!(label_for_score(60.0, &t), QualityLabel::Fair);
        assert_eq!(label_for_score(40.0, &t), QualityLabel::Poor);
        assert_eq!(label_for_score(39.99, &t), QualityLabel::Reject);
    }

    proptest! {
        #[test]
        fn normalize_stays_in_unit_range(x in -1.0e6f64..1.0e6) {
            let n = normalize(x, 0.015, 0.30);
            prop_assert!((0.0..=1.0).contains(&n));
            let l = normalize_log(x, 2.0, 80.0);
            prop_assert!((0.0..=1.0).contains(&l));
        }

        #[test]
        fn normalize_is_monotonic(a in -10.0f64..10.0, b in -10.0f64..10.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(normalize(lo, 0.01, 0.25) <= normalize(hi, 0.01, 0.25));
            prop_assert!(normalize_log(lo, 2.0, 80.0) <= normalize_log(hi, 2.0, 80.0));
        }

        #[test]
        fn normalize_is_idempotent_inside_band(x in 0.0f64..=1.0) {
            let once = normalize(x, 0.0, 1.0);
            prop_assert_eq!(normalize(once, 0.0, 1.0), once);
        }

        #[test]
        fn score_is_bounded(
            colored in 0.0f64..1.0,
            sharpness in 0.0f64..10_000.0,
            edge in 0.0f64..1.0,
            contrast in 0.0f64..0.5,
            text in 0.0f64..1.0,
            censor in 0.0f64..1.0,
            occlusion in 0.0f64..1.0
        ) {
            let config = AnalyzerConfig::default();
            let f = FeatureVector {
                colored_fraction: colored,
                sharpness,
                edge_density: edge,
                rms_contrast: contrast,
                text_density: text,
                censor_fraction: censor,
                occlusion_fraction: occlusion,
                document_kind: classify_document(colored, &config.pixels),
                ..features()
            };
            let b = score_features(&f, &config);
            prop_assert!((0.0..=100.0).contains(&b.score));
        }
    }
}
