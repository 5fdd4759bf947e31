// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable verdicts for people photographing their ID card.
//
// Every label and error is mapped to plain language with a clear next step.

use crate::error::KtpError;
use crate::types::QualityLabel;

/// How the presentation layer should treat a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Scan accepted as-is.
    Accepted,
    /// Scan accepted but a retake would help.
    Marginal,
    /// User should retake the photo.
    Retake,
    /// Nothing the user can do with this image (wrong document, bad file).
    Permanent,
}

/// Plain-language summary with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanVerdict {
    /// Shown as a heading.
    pub message: String,
    /// Shown as body text.
    pub suggestion: String,
    /// Whether downstream processing should accept the scan.
    pub accepted: bool,
    pub severity: Severity,
}

/// Describe an analysis label to the person who took the photo.
pub fn verdict_for(label: QualityLabel) -> HumanVerdict {
    match label {
        QualityLabel::Good => HumanVerdict {
            message: "Your ID card photo looks great.".into(),
            suggestion: "No action needed.".into(),
            accepted: true,
            severity: Severity::Accepted,
        },
        QualityLabel::Fair => HumanVerdict {
            message: "Your ID card photo is usable.".into(),
            suggestion: "For best results, retake it in even light with the card filling the frame."
                .into(),
            accepted: true,
            severity: Severity::Marginal,
        },
        QualityLabel::Poor => HumanVerdict {
            message: "Your ID card photo is hard to read.".into(),
            suggestion: "Hold the camera steady, avoid glare, and use the original card rather than a photocopy."
                .into(),
            accepted: false,
            severity: Severity::Retake,
        },
        QualityLabel::Reject => HumanVerdict {
            message: "We can't read this ID card photo.".into(),
            suggestion: "Retake the photo in good light, in focus, with the whole card visible."
                .into(),
            accepted: false,
            severity: Severity::Retake,
        },
        QualityLabel::RejectNonKtp => HumanVerdict {
            message: "This doesn't look like a KTP.".into(),
            suggestion: "Photograph the front of your KTP, lying flat, with the whole card in view."
                .into(),
            accepted: false,
            severity: Severity::Permanent,
        },
        QualityLabel::RejectCensored => HumanVerdict {
            message: "Parts of the card are covered or blacked out.".into(),
            suggestion: "Remove any stickers, marks, or edits and photograph the card unaltered."
                .into(),
            accepted: false,
            severity: Severity::Retake,
        },
        QualityLabel::RejectNonKtpOcrTimeout => HumanVerdict {
            message: "We couldn't confirm this is a KTP.".into(),
            suggestion: "Text reading took too long and the photo is unclear. Retake it closer and sharper."
                .into(),
            accepted: false,
            severity: Severity::Retake,
        },
    }
}

/// Describe an error that stopped the analysis before a verdict existed.
pub fn humanize_error(err: &KtpError) -> HumanVerdict {
    match err {
        KtpError::EmptyRaster { .. } | KtpError::ImageError(_) => HumanVerdict {
            message: "We couldn't open this photo.".into(),
            suggestion: "Try taking the photo again, or choose a JPEG or PNG file.".into(),
            accepted: false,
            severity: Severity::Permanent,
        },
        KtpError::OcrUnavailable(_) | KtpError::OcrError(_) | KtpError::OcrTimeout(_) => {
            HumanVerdict {
                message: "Text reading isn't working right now.".into(),
                suggestion: "Try again in a moment.".into(),
                accepted: false,
                severity: Severity::Retake,
            }
        }
        KtpError::InvalidConfig(detail) => HumanVerdict {
            message: "The checker is misconfigured.".into(),
            suggestion: format!("Contact support. ({detail})"),
            accepted: false,
            severity: Severity::Permanent,
        },
        KtpError::Io(_) | KtpError::Serialization(_) => HumanVerdict {
            message: "A settings file couldn't be read.".into(),
            suggestion: "Check the file exists and contains valid JSON.".into(),
            accepted: false,
            severity: Severity::Permanent,
        },
    }
}
