// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the analysis pipeline in ktpscan-analysis.
// Measures full feature extraction on a synthetic card at working resolution
// and the downscale step on an oversized phone photo.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgb, RgbImage};

use ktpscan_analysis::{KtpAnalyzer, safe_downscale};
use ktpscan_core::{AnalyzerConfig, OcrDiagnostic};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Blue card with dark text rows and a red portrait block on the right.
fn synthetic_card(width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb([100, 125, 200]));
    let portrait_x = width * 7 / 10;
    for y in 0..height {
        for x in 0..width {
            let text_row = y > height / 10 && (y % 20) < 3;
            let text_col = x > width / 20 && x < width * 6 / 10 && (x % 45) < 35;
            if text_row && text_col {
                img.put_pixel(x, y, Rgb([40, 40, 40]));
            } else if x >= portrait_x && y > height / 5 && y < height * 7 / 10 {
                img.put_pixel(x, y, Rgb([200, 40, 40]));
            }
        }
    }
    img
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_analyze(c: &mut Criterion) {
    let analyzer = match KtpAnalyzer::new(AnalyzerConfig::default()) {
        Ok(analyzer) => analyzer,
        Err(err) => panic!("default config rejected: {err}"),
    };
    let card = synthetic_card(1400, 880);
    let ocr = OcrDiagnostic::from_text("NIK NAMA ALAMAT", true);

    c.bench_function("analyze (1400x880)", |b| {
        b.iter(|| black_box(analyzer.analyze(black_box(&card), &ocr)));
    });
}

fn bench_downscale(c: &mut Criterion) {
    let photo = synthetic_card(4000, 2500);

    c.bench_function("safe_downscale (4000x2500 -> 1400)", |b| {
        b.iter(|| black_box(safe_downscale(black_box(&photo), 1400).into_owned()));
    });
}

criterion_group!(benches, bench_analyze, bench_downscale);
criterion_main!(benches);
