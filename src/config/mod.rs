//! Configuration management.
//!
//! TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PHI_REDACTOR_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load (all failures are fatal configuration errors)
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run mode
//! - [`DetectionConfig`] - Entity types, confidence threshold, normalization
//! - [`AnalyzerConfig`] - Statistical analyzer endpoint and label mapping
//! - [`RuleConfig`] - Tagged `header_aliases` / `pattern` rule entries
//! - [`RedactionConfig`] - Strategy, hash key, per-type overrides
//! - [`OutputConfig`] - Output directory and naming
//! - [`AuditConfig`] - Plaintext retention policy
//! - [`PipelineConfig`] - Parallelism and per-file timeout
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [detection]
//! confidence_threshold = 0.35
//!
//! [analyzer]
//! endpoint = "http://localhost:5002"
//!
//! [[rules]]
//! kind = "header_aliases"
//! entity_type = "DATE_OF_BIRTH"
//! aliases = ["DOB", "DateOfBirth", "Birth Date"]
//!
//! [[rules]]
//! kind = "pattern"
//! name = "site_mrn"
//! entity_type = "MRN"
//! regex = '\bMR-\d{7}\b'
//! confidence = 0.9
//!
//! [redaction]
//! strategy = "hash"
//! hash_key = "${PHI_REDACTOR_HASH_KEY}"
//! ```
//!
//! # Validation
//!
//! ```rust,no_run
//! use phi_redactor::config::load_config;
//!
//! match load_config("phi-redactor.toml") {
//!     Ok(_) => println!("Configuration valid"),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_or_default, parse_config};
pub use schema::{
    AnalyzerConfig, ApplicationConfig, AuditConfig, DetectionConfig, LoggingConfig, MatchMode,
    OutputConfig, PipelineConfig, RedactionConfig, RedactorConfig, RuleConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
