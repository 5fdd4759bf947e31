// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `ocrs` recognizer backend.
//
// A pure-Rust OCR engine backed by neural network models executed via `rten`.
// Only available with the `ocr` feature:
//
// ```toml
// ktpscan-analysis = { path = "crates/ktpscan-analysis", features = ["ocr"] }
// ```
//
// # Model Setup
//
// Two model files are required:
//
// - **Detection model** (`text-detection.rten`) — locates text regions.
// - **Recognition model** (`text-recognition.rten`) — decodes characters.
//
// Running `ocrs-cli` once downloads both into `$XDG_CACHE_HOME/ocrs`
// (typically `~/.cache/ocrs`), which is where this backend looks by default.

use std::path::{Path, PathBuf};

use image::RgbImage;
use ktpscan_core::error::{KtpError, Result};
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument};

use super::recognizer::TextRecognizer;

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Default directory for cached OCR model files.
///
/// `$XDG_CACHE_HOME/ocrs`, falling back to `~/.cache/ocrs`.
pub fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Locations of the two model files.
#[derive(Debug, Clone)]
pub struct OcrsModelPaths {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrsModelPaths {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrsModelPaths {
    /// Expects `dir` to contain `text-detection.rten` and `text-recognition.rten`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Missing files mean recognition is unavailable, not that it failed.
    pub fn validate(&self) -> Result<()> {
        for path in [&self.detection_model_path, &self.recognition_model_path] {
            if !path.exists() {
                return Err(KtpError::OcrUnavailable(format!(
                    "model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// [`TextRecognizer`] backed by the `ocrs` engine.
///
/// Model loading is the expensive step; build one and reuse it.
pub struct OcrsRecognizer {
    engine: OcrEngine,
}

impl OcrsRecognizer {
    /// Load both models.
    ///
    /// # Errors
    ///
    /// [`KtpError::OcrUnavailable`] if a model file is missing or cannot be
    /// loaded.
    #[instrument(skip_all, fields(
        detection = %paths.detection_model_path.display(),
        recognition = %paths.recognition_model_path.display(),
    ))]
    pub fn new(paths: &OcrsModelPaths) -> Result<Self> {
        paths.validate()?;

        info!("Loading OCR models");
        let detection_model = load_model(&paths.detection_model_path)?;
        let recognition_model = load_model(&paths.recognition_model_path)?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| KtpError::OcrUnavailable(format!("failed to initialise OCR engine: {err}")))?;

        info!("OCR engine initialised");
        Ok(Self { engine })
    }

    /// Load models from the default cache directory.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&OcrsModelPaths::default())
    }

    pub fn from_model_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::new(&OcrsModelPaths::from_dir(dir))
    }
}

fn load_model(path: &Path) -> Result<Model> {
    Model::load_file(path).map_err(|err| {
        KtpError::OcrUnavailable(format!("failed to load model from {}: {err}", path.display()))
    })
}

impl TextRecognizer for OcrsRecognizer {
    #[instrument(skip_all, fields(width = raster.width(), height = raster.height()))]
    fn recognize(&self, raster: &RgbImage) -> Result<String> {
        let (width, height) = raster.dimensions();

        let source = ImageSource::from_bytes(raster.as_raw(), (width, height)).map_err(|err| {
            KtpError::OcrError(format!("failed to create image source ({width}x{height}): {err}"))
        })?;

        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| KtpError::OcrError(format!("OCR preprocessing failed: {err}")))?;

        let text = self
            .engine
            .get_text(&input)
            .map_err(|err| KtpError::OcrError(format!("OCR text recognition failed: {err}")))?;

        debug!(lines = text.lines().count(), chars = text.len(), "OCR recognition complete");
        Ok(text)
    }

    fn name(&self) -> &str {
        "ocrs"
    }
}
