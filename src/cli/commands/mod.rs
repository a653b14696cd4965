//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod check_pattern;
pub mod init;
pub mod redact;
pub mod validate;
