//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for phi-redactor using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// phi-redactor - PHI detection and redaction for spreadsheets
#[derive(Parser, Debug)]
#[command(name = "phi-redactor")]
#[command(version, about, long_about = None)]
#[command(author = "PHI Redactor Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults to ./phi-redactor.toml when present)
    #[arg(short, long, env = "PHI_REDACTOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PHI_REDACTOR_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Redact PHI in one or more spreadsheets
    Redact(commands::redact::RedactArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Test a regular expression against sample text
    CheckPattern(commands::check_pattern::CheckPatternArgs),
}
