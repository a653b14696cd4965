//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output on stderr
//! - JSON-formatted local log files with rotation
//! - Helper macros for pipeline events
//!
//! Cell values are PHI and must never appear in log fields. The macros below
//! only take file, sheet and coordinate information.
//!
//! # Example
//!
//! ```no_run
//! use phi_redactor::logging::init_logging;
//! use phi_redactor::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of processing for one input file
///
/// # Example
///
/// ```no_run
/// use phi_redactor::log_file_start;
///
/// log_file_start!("patients.xlsx", 3);
/// ```
#[macro_export]
macro_rules! log_file_start {
    ($file:expr, $sheets:expr) => {
        tracing::info!(
            file = %$file,
            sheets = $sheets,
            "Processing file"
        );
    };
}

/// Log the completion of one input file
///
/// # Example
///
/// ```no_run
/// use phi_redactor::log_file_complete;
/// use std::time::Duration;
///
/// log_file_complete!("patients.xlsx", 42, 1, Duration::from_millis(850));
/// ```
#[macro_export]
macro_rules! log_file_complete {
    ($file:expr, $redactions:expr, $flagged:expr, $duration:expr) => {
        tracing::info!(
            file = %$file,
            redactions = $redactions,
            cells_flagged = $flagged,
            duration_ms = $duration.as_millis() as u64,
            "File processed"
        );
    };
}

/// Log a cell that could not be evaluated
///
/// # Example
///
/// ```no_run
/// use phi_redactor::log_cell_failure;
///
/// log_cell_failure!("Visits", 12, 4, "analyzer timeout");
/// ```
#[macro_export]
macro_rules! log_cell_failure {
    ($sheet:expr, $row:expr, $column:expr, $error:expr) => {
        tracing::warn!(
            sheet = %$sheet,
            row = $row,
            column = $column,
            error = %$error,
            "Cell left unredacted"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use phi_redactor::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying operation"
        );
    };
}
