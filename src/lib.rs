// PHI Redactor - Spreadsheet PHI detection and redaction
// Copyright (c) 2025 PHI Redactor Contributors
// Licensed under the MIT License

//! # PHI Redactor
//!
//! PHI Redactor scans Excel and CSV workbooks for protected health
//! information and writes redacted copies together with a CSV audit report
//! per input file.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Classifying** columns by header so identifier columns are redacted whole
//! - **Detecting** entities in free text with regex patterns and a statistical
//!   analyzer service
//! - **Redacting** detected spans with type placeholders or keyed hashes
//! - **Auditing** every redaction and every cell that could not be evaluated
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - File pipeline and batch runner
//! - [`redaction`] - Rules, recognizers, scanner, applier and audit report
//! - [`adapters`] - Spreadsheet formats and the analyzer HTTP client
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use phi_redactor::config::load_config;
//! use phi_redactor::core::pipeline::{BatchRunner, PipelineController};
//! use std::path::PathBuf;
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("phi-redactor.toml")?;
//!     let controller = PipelineController::from_config(&config).await?;
//!     let runner = BatchRunner::new(controller, &config);
//!
//!     let (_tx, shutdown) = watch::channel(false);
//!     let summary = runner
//!         .run(vec![PathBuf::from("patients.xlsx")], shutdown)
//!         .await;
//!
//!     println!("Redacted {} values", summary.total_redactions());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`], whose error type is
//! [`domain::RedactorError`]. Configuration errors are fatal and abort a run
//! before any file is opened; everything else is contained to one file or
//! one cell.
//!
//! ## Logging
//!
//! Logging uses the `tracing` crate. Cell contents are never written to log
//! fields; only file names, sheet names and coordinates are.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod redaction;
