// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text recognizer trait and the bounded wait around it.
//
// Recognition is opaque and may stall. The wrapper runs it on a worker thread
// and stops waiting after the configured timeout; a late result is dropped.

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use image::RgbImage;
use ktpscan_core::error::{KtpError, Result};
use ktpscan_core::types::OcrDiagnostic;
use tracing::{debug, instrument, warn};

use crate::gate::KeywordGate;

/// Turns a raster into UTF-8 text.
///
/// Implementations report a missing model or runtime as
/// [`KtpError::OcrUnavailable`] so it stays distinguishable from other failures.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, raster: &RgbImage) -> Result<String>;

    /// Short name for logs.
    fn name(&self) -> &str {
        "recognizer"
    }
}

/// Recognizer that always returns the same text.
///
/// Used by hosts that already hold OCR output.
#[derive(Debug, Clone)]
pub struct FixedTextRecognizer {
    text: String,
}

impl FixedTextRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TextRecognizer for FixedTextRecognizer {
    fn recognize(&self, _raster: &RgbImage) -> Result<String> {
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Run `recognizer` on `raster`, waiting at most `timeout`, and pass any
/// text through the keyword gate.
///
/// Never fails: every failure mode becomes an [`OcrDiagnostic`].
///
/// Each call spawns one worker thread. On timeout that thread is detached,
/// not cancelled, and keeps running until the recognizer returns. A
/// recognizer that stalls on every call therefore accumulates one thread per
/// timed-out call; hosts facing such a backend should stop calling it (for
/// example after the first `timeout_or_error`) rather than retry in a loop.
#[instrument(skip_all, fields(recognizer = recognizer.name(), timeout_ms = timeout.as_millis() as u64))]
pub fn recognize_with_timeout(
    recognizer: Arc<dyn TextRecognizer>,
    raster: Arc<RgbImage>,
    timeout: Duration,
    gate: &KeywordGate,
) -> OcrDiagnostic {
    let (tx, rx) = mpsc::channel();

    let spawned = thread::Builder::new()
        .name("ktpscan-ocr".into())
        .spawn(move || {
            let result = recognizer.recognize(&raster);
            // The receiver is gone if the caller already timed out.
            let _ = tx.send(result);
        });

    if let Err(err) = spawned {
        warn!(error = %err, "failed to spawn OCR worker");
        return OcrDiagnostic::timeout_or_error();
    }

    match rx.recv_timeout(timeout) {
        Ok(Ok(text)) => {
            debug!(chars = text.chars().count(), "OCR text received");
            gate.diagnose(&text)
        }
        Ok(Err(KtpError::OcrUnavailable(detail))) => {
            warn!(%detail, "text recognition unavailable");
            OcrDiagnostic::unavailable()
        }
        Ok(Err(err)) => {
            warn!(error = %err, "text recognition failed");
            OcrDiagnostic::timeout_or_error()
        }
        Err(RecvTimeoutError::Timeout) => {
            warn!(error = %KtpError::OcrTimeout(timeout), "abandoning OCR worker");
            OcrDiagnostic::timeout_or_error()
        }
        Err(RecvTimeoutError::Disconnected) => {
            warn!("OCR worker exited without a result");
            OcrDiagnostic::timeout_or_error()
        }
    }
}
