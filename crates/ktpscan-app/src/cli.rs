// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Score a photographed KTP for ID-card likelihood and scan quality.
///
/// Without any OCR source the analysis runs as if text recognition were
/// unavailable, which caps the score.
#[derive(Parser, Debug, Clone)]
#[command(name = "ktpscan")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Photo to analyze (any format the `image` crate decodes).
    pub image: PathBuf,

    /// JSON file overriding analyzer thresholds; missing keys keep defaults.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Text already recognised from the photo.
    #[arg(long, conflicts_with = "ocr_text_file")]
    pub ocr_text: Option<String>,

    /// File holding text already recognised from the photo.
    #[arg(long)]
    pub ocr_text_file: Option<PathBuf>,

    /// Run the built-in OCR engine with models from this directory
    /// (defaults to the ocrs cache when given without a value).
    #[cfg(feature = "ocr")]
    #[arg(long, num_args = 0..=1, conflicts_with_all = ["ocr_text", "ocr_text_file"])]
    pub ocr_models: Option<Option<PathBuf>>,

    /// Emit the result as JSON instead of `key: value` lines.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_text_and_json() {
        let args = Args::try_parse_from(["ktpscan", "card.jpg", "--ocr-text", "NIK 3201", "--json"])
            .unwrap();
        assert_eq!(args.image, PathBuf::from("card.jpg"));
        assert_eq!(args.ocr_text.as_deref(), Some("NIK 3201"));
        assert!(args.json);
        assert!(args.config.is_none());
    }

    #[test]
    fn text_sources_are_exclusive() {
        let result = Args::try_parse_from([
            "ktpscan",
            "card.jpg",
            "--ocr-text",
            "NIK",
            "--ocr-text-file",
            "ocr.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn image_is_required() {
        assert!(Args::try_parse_from(["ktpscan"]).is_err());
    }
}
