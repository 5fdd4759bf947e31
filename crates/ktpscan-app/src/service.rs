// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Check service: config → decode → OCR source → analysis → report.

use std::path::Path;

use image::RgbImage;
use ktpscan_analysis::KtpAnalyzer;
use ktpscan_core::error::{KtpError, Result};
use ktpscan_core::human_messages::{HumanVerdict, verdict_for};
use ktpscan_core::{AnalysisResult, AnalyzerConfig, OcrDiagnostic};
use tracing::{info, instrument, warn};

use crate::cli::Args;

/// Everything the binary needs to print and pick an exit code.
#[derive(Debug)]
pub struct CheckOutcome {
    pub result: AnalysisResult,
    pub verdict: HumanVerdict,
    pub rendered: String,
    pub accepted: bool,
}

#[instrument(skip_all, fields(image = %args.image.display()))]
pub fn run(args: &Args) -> Result<CheckOutcome> {
    let config = load_config(args.config.as_deref())?;
    let analyzer = KtpAnalyzer::new(config)?;
    let raster = load_raster(&args.image)?;

    let result = analyze(&analyzer, &raster, args)?;
    let verdict = verdict_for(result.label);
    info!(score = result.score, label = %result.label, "Check finished");

    let rendered = render(&result, &verdict, args.json)?;
    Ok(CheckOutcome {
        accepted: verdict.accepted,
        result,
        verdict,
        rendered,
    })
}

fn load_config(path: Option<&Path>) -> Result<AnalyzerConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading analyzer config");
            AnalyzerConfig::from_json_file(path)
        }
        None => Ok(AnalyzerConfig::default()),
    }
}

fn load_raster(path: &Path) -> Result<RgbImage> {
    let decoded = image::open(path)
        .map_err(|err| KtpError::ImageError(format!("{}: {err}", path.display())))?;
    Ok(decoded.to_rgb8())
}

fn analyze(analyzer: &KtpAnalyzer, raster: &RgbImage, args: &Args) -> Result<AnalysisResult> {
    if let Some(text) = &args.ocr_text {
        return analyzer.analyze(raster, &analyzer.diagnose_text(text));
    }
    if let Some(path) = &args.ocr_text_file {
        let text = std::fs::read_to_string(path)?;
        return analyzer.analyze(raster, &analyzer.diagnose_text(&text));
    }

    #[cfg(feature = "ocr")]
    if let Some(models) = &args.ocr_models {
        use std::sync::Arc;

        use ktpscan_analysis::OcrsRecognizer;

        let recognizer = match models {
            Some(dir) => OcrsRecognizer::from_model_dir(dir),
            None => OcrsRecognizer::with_defaults(),
        };
        match recognizer {
            Ok(recognizer) => return analyzer.analyze_with_recognizer(raster, Arc::new(recognizer)),
            Err(err) => warn!(error = %err, "OCR engine could not start"),
        }
        return analyzer.analyze(raster, &OcrDiagnostic::unavailable());
    }

    warn!("no OCR source given; scoring without text recognition");
    analyzer.analyze(raster, &OcrDiagnostic::unavailable())
}

/// JSON, or `key: value` lines followed by the human verdict.
pub fn render(result: &AnalysisResult, verdict: &HumanVerdict, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(result)?);
    }
    Ok(format!("{result}\n{}\n{}", verdict.message, verdict.suggestion))
}
