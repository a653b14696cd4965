//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::config::loader::DEFAULT_CONFIG_FILE;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: String,

    /// Include every option with explanatory comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing PHI Redactor configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Start an analyzer service or set analyzer.enabled = false");
                println!("  3. For the hash strategy, export PHI_REDACTOR_HASH_KEY");
                println!("  4. Validate configuration: phi-redactor validate-config");
                println!("  5. Redact: phi-redactor redact <files or directories>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# PHI Redactor Configuration File
# Spreadsheet PHI detection and redaction

[application]
log_level = "info"
dry_run = false

[detection]
confidence_threshold = 0.20
normalize_text = true
include_builtin_rules = true

[analyzer]
enabled = true
endpoint = "http://localhost:5002"
language = "en"
timeout_seconds = 30

[redaction]
strategy = "replace"

[output]
suffix = "_redacted"
replace_existing = true

[audit]
record_plaintext = false

[pipeline]
max_parallel_files = 2
file_timeout_seconds = 900
has_header_row = true

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# PHI Redactor Configuration File
# Spreadsheet PHI detection and redaction
#
# This file contains all configuration options with examples and explanations.
# Any ${VAR_NAME} reference outside a comment is replaced with the value of
# that environment variable. PHI_REDACTOR_<SECTION>_<KEY> variables override
# the values below.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (write audit reports only, no redacted workbooks)
dry_run = false

# ============================================================================
# Detection
# ============================================================================
[detection]
# Entity types recognized in this run. Rules and analyzer labels for types
# not listed here are ignored.
entity_types = [
    "PERSON", "SSN", "MRN", "DATE_OF_BIRTH", "DATE", "ADDRESS", "LOCATION",
    "PHONE", "EMAIL", "CREDIT_CARD", "IBAN", "IP_ADDRESS", "LICENSE_NUMBER",
    "HEALTH_PLAN", "NRP",
]

# Detections with a confidence below this value are discarded (0.0 - 1.0)
confidence_threshold = 0.20

# Repair mis-decoded punctuation (smart quotes, dashes) before scanning
normalize_text = true

# Append the built-in header aliases and patterns after the rules below
include_builtin_rules = true

# ============================================================================
# Statistical Analyzer (Presidio-compatible HTTP service)
# ============================================================================
[analyzer]
# Set to false to rely on header aliases and patterns only
enabled = true

# Base URL; the service must answer GET /health and POST /analyze
endpoint = "http://localhost:5002"

# Language code sent with every request
language = "en"

# Per-request timeout in seconds
timeout_seconds = 30

# Retries for connection failures and 5xx responses
max_retries = 2

# Discard findings whose text contains markup characters: " { } [ ] :
drop_markup_spans = true

# Analyzer label to entity type mapping
[analyzer.labels]
PERSON = "PERSON"
EMAIL_ADDRESS = "EMAIL"
PHONE_NUMBER = "PHONE"
US_SSN = "SSN"
DATE_TIME = "DATE"
LOCATION = "LOCATION"
MEDICAL_LICENSE = "LICENSE_NUMBER"
US_DRIVER_LICENSE = "LICENSE_NUMBER"
NRP = "NRP"
CREDIT_CARD = "CREDIT_CARD"
IBAN_CODE = "IBAN"
IP_ADDRESS = "IP_ADDRESS"

# ============================================================================
# Rules
# ============================================================================
# Rules are evaluated before the built-in library. The first header alias
# rule that matches a column wins.
#
# Header aliases force full-cell redaction of every non-blank cell below a
# matching header. Headers and aliases are compared after lower-casing and
# removing everything but letters and digits.
[[rules]]
kind = "header_aliases"
entity_type = "DATE_OF_BIRTH"
aliases = ["DOB", "Birth Date"]
# exact | contains
match_mode = "exact"

# Patterns emit a detection with a fixed confidence wherever the regex matches
[[rules]]
kind = "pattern"
name = "site_mrn"
entity_type = "MRN"
regex = '\bMR-\d{7}\b'
confidence = 0.9

# ============================================================================
# Redaction
# ============================================================================
[redaction]
# replace: substitute [ENTITY_TYPE]
# hash: substitute [ENTITY_TYPE:<keyed digest prefix>]
strategy = "replace"

# Required when any entity type uses the hash strategy
# hash_key = "${PHI_REDACTOR_HASH_KEY}"

# Hex digits of the digest kept in the cell (8-64)
hash_length = 16

# Per-entity-type strategy overrides
[redaction.overrides]
# MRN = "hash"

# ============================================================================
# Output
# ============================================================================
[output]
# Directory for redacted files and reports (default: next to each input)
# directory = "redacted"

# Appended to the input file stem: patients.xlsx -> patients_redacted.xlsx
suffix = "_redacted"

# Replace outputs left by a previous run
replace_existing = true

# ============================================================================
# Audit Report
# ============================================================================
[audit]
# Keep the original text of replace-strategy redactions in the report.
# The report then contains PHI and must be protected like the input.
record_plaintext = false

# ============================================================================
# Pipeline
# ============================================================================
[pipeline]
# Files processed concurrently (1-64)
max_parallel_files = 2

# Upper bound on processing one file in seconds; 0 disables the limit
file_timeout_seconds = 900

# Treat row 1 of every sheet as the header row
has_header_row = true

# ============================================================================
# Logging
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Local log directory
local_path = "logs"

# Log rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}
