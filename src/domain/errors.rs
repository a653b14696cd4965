//! Domain error types
//!
//! This module defines the error hierarchy for the redaction pipeline.
//! All errors are domain-specific and don't expose third-party types.
//!
//! The four pipeline categories map onto how far an error propagates:
//! configuration errors abort the run, file access and write errors fail a
//! single file, and cell processing errors flag a single cell.

use thiserror::Error;

/// Main redactor error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum RedactorError {
    /// Configuration-related errors (fatal for the whole run)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input file could not be opened or parsed
    #[error("Cannot read '{path}': {message}")]
    FileAccess { path: String, message: String },

    /// A single cell could not be evaluated
    #[error("Cell processing error: {0}")]
    CellProcessing(String),

    /// Output artifact could not be written
    #[error("Cannot write '{path}': {message}")]
    Write { path: String, message: String },

    /// Statistical analyzer errors
    #[error("Analyzer error: {0}")]
    Analyzer(#[from] AnalyzerError),

    /// Per-file processing deadline exceeded
    #[error("Timed out after {0} seconds")]
    Timeout(u64),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl RedactorError {
    /// Creates a file access error for `path`
    pub fn file_access(path: impl AsRef<std::path::Path>, message: impl Into<String>) -> Self {
        RedactorError::FileAccess {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Creates a write error for `path`
    pub fn write(path: impl AsRef<std::path::Path>, message: impl Into<String>) -> Self {
        RedactorError::Write {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Returns true if this error must abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RedactorError::Configuration(_) | RedactorError::Validation(_)
        )
    }

    /// Short machine-readable category used in summaries and reports
    pub fn kind(&self) -> &'static str {
        match self {
            RedactorError::Configuration(_) => "configuration",
            RedactorError::FileAccess { .. } => "file_access",
            RedactorError::CellProcessing(_) | RedactorError::Analyzer(_) => "cell_processing",
            RedactorError::Write { .. } => "write",
            RedactorError::Timeout(_) => "timeout",
            RedactorError::Validation(_) => "validation",
            RedactorError::Serialization(_) => "serialization",
            RedactorError::Io(_) => "io",
        }
    }
}

/// Statistical analyzer errors
///
/// Errors that occur when calling the entity-recognition service.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Failed to connect to the analyzer
    #[error("Failed to connect to analyzer: {0}")]
    ConnectionFailed(String),

    /// Analyzer reachable but not ready (model not loaded)
    #[error("Analyzer unavailable: {0}")]
    Unavailable(String),

    /// Invalid response from analyzer
    #[error("Invalid response from analyzer: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Returned span does not fit the analyzed text
    #[error("Invalid span {start}..{end} for text of {len} characters")]
    InvalidSpan { start: usize, end: usize, len: usize },
}

// Conversion from std::io::Error
impl From<std::io::Error> for RedactorError {
    fn from(err: std::io::Error) -> Self {
        RedactorError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RedactorError {
    fn from(err: serde_json::Error) -> Self {
        RedactorError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RedactorError {
    fn from(err: toml::de::Error) -> Self {
        RedactorError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv errors
impl From<csv::Error> for RedactorError {
    fn from(err: csv::Error) -> Self {
        RedactorError::Serialization(format!("CSV error: {err}"))
    }
}

// Invalid regexes only come from configuration
impl From<regex::Error> for RedactorError {
    fn from(err: regex::Error) -> Self {
        RedactorError::Configuration(format!("Invalid regex: {err}"))
    }
}
