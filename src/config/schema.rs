//! Configuration schema definitions
//!
//! Every section has defaults, so an empty file (or no file at all) yields a
//! usable configuration.

use super::secret::SecretString;
use crate::domain::{EntityType, RedactionStrategy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Root configuration structure that maps to the TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedactorConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Entity types and thresholds
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Statistical analyzer service
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Header alias and pattern rules, evaluated before the built-in library
    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    /// Redaction strategy selection
    #[serde(default)]
    pub redaction: RedactionConfig,

    /// Output file placement
    #[serde(default)]
    pub output: OutputConfig,

    /// Audit report policy
    #[serde(default)]
    pub audit: AuditConfig,

    /// Batch scheduling
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RedactorConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.detection.validate()?;

        let known: BTreeSet<&EntityType> = self.detection.entity_types.iter().collect();
        self.analyzer.validate(&known)?;
        for (index, rule) in self.rules.iter().enumerate() {
            rule.validate(&known)
                .map_err(|e| format!("rules[{index}]: {e}"))?;
        }
        self.redaction.validate(&known)?;
        self.output.validate()?;
        self.pipeline.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Scan and write the audit report, but no redacted workbook
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Entity types this run recognizes; rules for other types are ignored
    #[serde(default = "default_entity_types")]
    pub entity_types: Vec<EntityType>,

    /// Detections strictly below this confidence are discarded
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Repair mis-decoded punctuation before scanning
    #[serde(default = "default_true")]
    pub normalize_text: bool,

    /// Append the built-in alias and pattern rules after user rules
    #[serde(default = "default_true")]
    pub include_builtin_rules: bool,
}

impl DetectionConfig {
    fn validate(&self) -> Result<(), String> {
        if self.entity_types.is_empty() {
            return Err("detection.entity_types cannot be empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "detection.confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            ));
        }
        Ok(())
    }

    pub fn is_enabled(&self, entity_type: &EntityType) -> bool {
        self.entity_types.contains(entity_type)
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            entity_types: default_entity_types(),
            confidence_threshold: default_confidence_threshold(),
            normalize_text: true,
            include_builtin_rules: true,
        }
    }
}

/// Statistical analyzer (Presidio-compatible HTTP service)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Disable to run with pattern and column rules only
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the analyzer service
    #[serde(default = "default_analyzer_endpoint")]
    pub endpoint: String,

    /// Language code sent with every request
    #[serde(default = "default_language")]
    pub language: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_analyzer_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retries for connection failures and 5xx responses
    #[serde(default = "default_analyzer_max_retries")]
    pub max_retries: u32,

    /// Discard findings whose text contains `"{}[]:` markup characters
    #[serde(default = "default_true")]
    pub drop_markup_spans: bool,

    /// Analyzer label to entity type mapping. Labels that are unmapped or
    /// map to a disabled entity type are not requested.
    #[serde(default = "default_analyzer_labels")]
    pub labels: BTreeMap<String, EntityType>,
}

impl AnalyzerConfig {
    fn validate(&self, known: &BTreeSet<&EntityType>) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| format!("analyzer.endpoint '{}' is not a valid URL: {e}", self.endpoint))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!(
                "analyzer.endpoint must use http or https, got '{}'",
                url.scheme()
            ));
        }
        if self.timeout_seconds == 0 {
            return Err("analyzer.timeout_seconds must be > 0".to_string());
        }
        if self.language.trim().is_empty() {
            return Err("analyzer.language cannot be empty".to_string());
        }
        if !self.labels.values().any(|t| known.contains(t)) {
            return Err(
                "analyzer.labels does not map any label to an entry of detection.entity_types"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_analyzer_endpoint(),
            language: default_language(),
            timeout_seconds: default_analyzer_timeout_seconds(),
            max_retries: default_analyzer_max_retries(),
            drop_markup_spans: true,
            labels: default_analyzer_labels(),
        }
    }
}

/// How a header alias is compared against normalized header text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Normalized header equals normalized alias
    #[default]
    Exact,
    /// Normalized header contains normalized alias
    Contains,
}

/// A rule entry: either a header alias list or a regex recognizer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleConfig {
    /// Forces full-cell redaction for columns whose header matches
    HeaderAliases {
        entity_type: EntityType,
        aliases: Vec<String>,
        #[serde(default)]
        match_mode: MatchMode,
    },
    /// Emits detections with a fixed confidence wherever the regex matches
    Pattern {
        name: String,
        entity_type: EntityType,
        regex: String,
        #[serde(default = "default_pattern_confidence")]
        confidence: f64,
    },
}

impl RuleConfig {
    pub fn entity_type(&self) -> &EntityType {
        match self {
            RuleConfig::HeaderAliases { entity_type, .. } => entity_type,
            RuleConfig::Pattern { entity_type, .. } => entity_type,
        }
    }

    pub(crate) fn validate(&self, known: &BTreeSet<&EntityType>) -> Result<(), String> {
        if !known.contains(self.entity_type()) {
            return Err(format!(
                "entity type '{}' is not in detection.entity_types",
                self.entity_type()
            ));
        }
        match self {
            RuleConfig::HeaderAliases { aliases, .. } => {
                if aliases.iter().all(|a| a.trim().is_empty()) {
                    return Err("header_aliases rule needs at least one alias".to_string());
                }
            }
            RuleConfig::Pattern {
                name,
                regex,
                confidence,
                ..
            } => {
                if name.trim().is_empty() {
                    return Err("pattern rule needs a name".to_string());
                }
                if !(0.0..=1.0).contains(confidence) {
                    return Err(format!(
                        "pattern '{name}' confidence must be within [0, 1], got {confidence}"
                    ));
                }
                regex::Regex::new(regex)
                    .map_err(|e| format!("pattern '{name}' has an invalid regex: {e}"))?;
            }
        }
        Ok(())
    }
}

/// Redaction strategy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionConfig {
    /// Strategy applied to every entity type without an override
    #[serde(default)]
    pub strategy: RedactionStrategy,

    /// Key for the hash strategy; required when any type hashes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_key: Option<SecretString>,

    /// Number of hex digits kept from the digest
    #[serde(default = "default_hash_length")]
    pub hash_length: usize,

    /// Per-entity-type strategy overrides
    #[serde(default)]
    pub overrides: BTreeMap<EntityType, RedactionStrategy>,
}

impl RedactionConfig {
    fn validate(&self, known: &BTreeSet<&EntityType>) -> Result<(), String> {
        use secrecy::ExposeSecret;

        for entity_type in self.overrides.keys() {
            if !known.contains(entity_type) {
                return Err(format!(
                    "redaction.overrides.{entity_type} is not in detection.entity_types"
                ));
            }
        }
        if self.uses_hash() {
            match &self.hash_key {
                Some(key) if !key.expose_secret().is_empty() => {}
                _ => {
                    return Err(
                        "redaction.hash_key is required when the hash strategy is used"
                            .to_string(),
                    )
                }
            }
        }
        if !(8..=64).contains(&self.hash_length) {
            return Err(format!(
                "redaction.hash_length must be between 8 and 64, got {}",
                self.hash_length
            ));
        }
        Ok(())
    }

    /// Strategy for one entity type, honoring overrides
    pub fn strategy_for(&self, entity_type: &EntityType) -> RedactionStrategy {
        self.overrides
            .get(entity_type)
            .copied()
            .unwrap_or(self.strategy)
    }

    pub fn uses_hash(&self) -> bool {
        self.strategy == RedactionStrategy::Hash
            || self.overrides.values().any(|s| *s == RedactionStrategy::Hash)
    }
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            strategy: RedactionStrategy::Replace,
            hash_key: None,
            hash_length: default_hash_length(),
            overrides: BTreeMap::new(),
        }
    }
}

/// Output placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for outputs; defaults to each input's own directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Appended to the input stem
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Replace outputs left by a previous run
    #[serde(default = "default_true")]
    pub replace_existing: bool,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.suffix.is_empty() {
            return Err("output.suffix cannot be empty".to_string());
        }
        if self
            .suffix
            .chars()
            .any(|c| std::path::is_separator(c) || c == '.')
        {
            return Err(format!(
                "output.suffix '{}' may not contain path separators or dots",
                self.suffix
            ));
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            suffix: default_suffix(),
            replace_existing: true,
        }
    }
}

/// Audit report policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Store original text for replace-strategy records.
    /// Hash-strategy records never carry plaintext.
    #[serde(default)]
    pub record_plaintext: bool,
}

/// Batch scheduling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Files processed concurrently
    #[serde(default = "default_max_parallel_files")]
    pub max_parallel_files: usize,

    /// Upper bound on processing one file; 0 disables the limit
    #[serde(default = "default_file_timeout_seconds")]
    pub file_timeout_seconds: u64,

    /// Treat row 1 of every sheet as the header row
    #[serde(default = "default_true")]
    pub has_header_row: bool,
}

impl PipelineConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_parallel_files == 0 || self.max_parallel_files > 64 {
            return Err(format!(
                "pipeline.max_parallel_files must be between 1 and 64, got {}",
                self.max_parallel_files
            ));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_parallel_files: default_max_parallel_files(),
            file_timeout_seconds: default_file_timeout_seconds(),
            has_header_row: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn entity(name: &'static str) -> EntityType {
    EntityType::builtin(name)
}

fn default_entity_types() -> Vec<EntityType> {
    [
        "PERSON",
        "SSN",
        "MRN",
        "DATE_OF_BIRTH",
        "DATE",
        "ADDRESS",
        "LOCATION",
        "PHONE",
        "EMAIL",
        "CREDIT_CARD",
        "IBAN",
        "IP_ADDRESS",
        "LICENSE_NUMBER",
        "HEALTH_PLAN",
        "NRP",
    ]
    .into_iter()
    .map(entity)
    .collect()
}

fn default_confidence_threshold() -> f64 {
    0.20
}

fn default_analyzer_endpoint() -> String {
    "http://localhost:5002".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_analyzer_timeout_seconds() -> u64 {
    30
}

fn default_analyzer_max_retries() -> u32 {
    2
}

fn default_analyzer_labels() -> BTreeMap<String, EntityType> {
    [
        ("PERSON", "PERSON"),
        ("EMAIL_ADDRESS", "EMAIL"),
        ("PHONE_NUMBER", "PHONE"),
        ("US_SSN", "SSN"),
        ("DATE_TIME", "DATE"),
        ("LOCATION", "LOCATION"),
        ("MEDICAL_LICENSE", "LICENSE_NUMBER"),
        ("US_DRIVER_LICENSE", "LICENSE_NUMBER"),
        ("NRP", "NRP"),
        ("CREDIT_CARD", "CREDIT_CARD"),
        ("IBAN_CODE", "IBAN"),
        ("IP_ADDRESS", "IP_ADDRESS"),
    ]
    .into_iter()
    .map(|(label, t)| (label.to_string(), entity(t)))
    .collect()
}

fn default_pattern_confidence() -> f64 {
    0.85
}

fn default_hash_length() -> usize {
    16
}

fn default_suffix() -> String {
    "_redacted".to_string()
}

fn default_max_parallel_files() -> usize {
    2
}

fn default_file_timeout_seconds() -> u64 {
    900
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
