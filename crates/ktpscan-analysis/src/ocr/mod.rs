// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR collaborator seam — the recognizer trait, the bounded-wait wrapper,
// and the optional `ocrs` backend.

pub mod recognizer;

#[cfg(feature = "ocr")]
pub mod ocrs_backend;

pub use recognizer::{FixedTextRecognizer, TextRecognizer, recognize_with_timeout};

#[cfg(feature = "ocr")]
pub use ocrs_backend::OcrsRecognizer;
