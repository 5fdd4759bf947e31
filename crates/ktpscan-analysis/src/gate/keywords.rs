// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fuzzy keyword gate. Decides whether OCR output contains any of the KTP
// field labels, tolerating the usual digit/letter misreads and small edit
// distances.

use ktpscan_core::config::OcrGateConfig;
use ktpscan_core::types::OcrDiagnostic;
use tracing::debug;

/// How strongly one keyword was found in the text.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordMatch {
    pub keyword: String,
    /// 1.0 for a substring hit, otherwise the best token similarity.
    pub confidence: f64,
    pub matched: bool,
}

/// Per-keyword matches plus the overall verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct GateResult {
    pub matches: Vec<KeywordMatch>,
    pub has_keywords: bool,
}

/// Matches recognised text against a fixed keyword list.
#[derive(Debug, Clone)]
pub struct KeywordGate {
    keywords: Vec<String>,
    threshold: f64,
}

impl KeywordGate {
    pub fn new<I, S>(keywords: I, threshold: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_uppercase())
                .collect(),
            threshold,
        }
    }

    pub fn from_config(config: &OcrGateConfig) -> Self {
        Self::new(&config.keywords, config.similarity_threshold)
    }

    /// Score every keyword against `text`.
    pub fn evaluate(&self, text: &str) -> GateResult {
        let normalized = normalize_ocr_text(text);
        let tokens: Vec<&str> = normalized.split_whitespace().collect();

        let matches: Vec<KeywordMatch> = self
            .keywords
            .iter()
            .map(|keyword| {
                let confidence = if normalized.contains(keyword.as_str()) {
                    1.0
                } else {
                    tokens
                        .iter()
                        .map(|token| similarity(keyword, token))
                        .fold(0.0, f64::max)
                };
                KeywordMatch {
                    keyword: keyword.clone(),
                    confidence,
                    matched: confidence >= self.threshold,
                }
            })
            .collect();

        let has_keywords = matches.iter().any(|m| m.matched);
        debug!(
            tokens = tokens.len(),
            has_keywords,
            "Keyword gate evaluated"
        );
        GateResult {
            matches,
            has_keywords,
        }
    }

    /// Run the gate and package the outcome as an OCR diagnostic.
    pub fn diagnose(&self, text: &str) -> OcrDiagnostic {
        OcrDiagnostic::from_text(text, self.evaluate(text).has_keywords)
    }
}

/// Uppercase and undo common OCR digit-for-letter confusions.
pub fn normalize_ocr_text(text: &str) -> String {
    text.to_uppercase()
        .chars()
        .map(|c| match c {
            '0' => 'O',
            '1' | '|' => 'I',
            '5' => 'S',
            '6' => 'G',
            '8' => 'B',
            '4' => 'A',
            other => other,
        })
        .collect()
}

/// `1 - levenshtein(a, b) / min(len(a), len(b))`, clamped to [0, 1].
///
/// Lengths are in characters. Either string empty gives 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let shorter = a.chars().count().min(b.chars().count());
    if shorter == 0 {
        return 0.0;
    }
    let distance = strsim::levenshtein(a, b) as f64;
    (1.0 - distance / shorter as f64).clamp(0.0, 1.0)
}
