// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ktpscan — Core types, configuration and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod human_messages;
pub mod types;

pub use config::AnalyzerConfig;
pub use error::KtpError;
pub use types::*;
