// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for ktpscan.

use std::time::Duration;

use thiserror::Error;

/// Top-level error type for all ktpscan operations.
#[derive(Debug, Error)]
pub enum KtpError {
    // -- Input errors --
    #[error("raster has zero area ({width}x{height})")]
    EmptyRaster { width: u32, height: u32 },

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- OCR collaborator --
    #[error("text recognition unavailable: {0}")]
    OcrUnavailable(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    #[error("OCR did not finish within {0:?}")]
    OcrTimeout(Duration),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KtpError>;
