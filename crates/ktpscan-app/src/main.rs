// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ktpscan — KTP scan checker
//
// Entry point. Initialises logging, parses arguments and hands off to the
// check service. Logs go to stderr so stdout carries only the report.

mod cli;
mod service;

use std::process::ExitCode;

use clap::Parser;
use ktpscan_core::human_messages::humanize_error;

use cli::Args;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!(image = %args.image.display(), "ktpscan starting");

    match service::run(&args) {
        Ok(outcome) => {
            tracing::debug!(
                kind = %outcome.result.document_kind,
                severity = ?outcome.verdict.severity,
                "Verdict ready"
            );
            println!("{}", outcome.rendered);
            if outcome.accepted {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(err) => {
            tracing::error!(error = %err, "analysis failed");
            let verdict = humanize_error(&err);
            eprintln!("{}\n{}", verdict.message, verdict.suggestion);
            ExitCode::FAILURE
        }
    }
}
