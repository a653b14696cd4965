//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::RedactorConfig;
use super::secret::secret_string;
use crate::domain::{RedactionStrategy, RedactorError, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "phi-redactor.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RedactorConfig
/// 4. Applies environment variable overrides (PHI_REDACTOR_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Every failure is a `RedactorError::Configuration`.
///
/// # Examples
///
/// ```no_run
/// use phi_redactor::config::loader::load_config;
///
/// let config = load_config("phi-redactor.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RedactorConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RedactorError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RedactorError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses, overrides and validates configuration text
pub fn parse_config(contents: &str) -> Result<RedactorConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: RedactorConfig = toml::from_str(&contents)
        .map_err(|e| RedactorError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;
    validate(&config)?;

    Ok(config)
}

/// Loads `path` if given, otherwise `phi-redactor.toml` when present,
/// otherwise built-in defaults (with environment overrides applied)
pub fn load_or_default(path: Option<&Path>) -> Result<RedactorConfig> {
    if let Some(path) = path {
        return load_config(path);
    }

    let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
    if fallback.exists() {
        return load_config(fallback);
    }

    tracing::debug!("No configuration file found, using defaults");
    let mut config = RedactorConfig::default();
    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &RedactorConfig) -> Result<()> {
    config.validate().map_err(|e| {
        RedactorError::Configuration(format!("Configuration validation failed: {e}"))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        // Comment lines are copied untouched
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RedactorError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        RedactorError::Configuration(format!("Invalid value '{value}' for {name}"))
    })
}

/// Applies environment variable overrides using the PHI_REDACTOR_* prefix
///
/// Environment variables follow the pattern: PHI_REDACTOR_<SECTION>_<KEY>
/// For example: PHI_REDACTOR_REDACTION_HASH_KEY, PHI_REDACTOR_OUTPUT_DIRECTORY
fn apply_env_overrides(config: &mut RedactorConfig) -> Result<()> {
    const P: &str = "PHI_REDACTOR";
    let var = |key: &str| std::env::var(format!("{P}_{key}")).ok();

    // Application overrides
    if let Some(val) = var("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = var("APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Detection overrides
    if let Some(val) = var("DETECTION_CONFIDENCE_THRESHOLD") {
        config.detection.confidence_threshold =
            parse_env("PHI_REDACTOR_DETECTION_CONFIDENCE_THRESHOLD", &val)?;
    }

    // Analyzer overrides
    if let Some(val) = var("ANALYZER_ENABLED") {
        config.analyzer.enabled = val.parse().unwrap_or(true);
    }
    if let Some(val) = var("ANALYZER_ENDPOINT") {
        config.analyzer.endpoint = val;
    }
    if let Some(val) = var("ANALYZER_LANGUAGE") {
        config.analyzer.language = val;
    }
    if let Some(val) = var("ANALYZER_TIMEOUT_SECONDS") {
        config.analyzer.timeout_seconds =
            parse_env("PHI_REDACTOR_ANALYZER_TIMEOUT_SECONDS", &val)?;
    }

    // Redaction overrides
    if let Some(val) = var("REDACTION_STRATEGY") {
        config.redaction.strategy = match val.trim().to_ascii_lowercase().as_str() {
            "replace" => RedactionStrategy::Replace,
            "hash" => RedactionStrategy::Hash,
            other => {
                return Err(RedactorError::Configuration(format!(
                    "Invalid PHI_REDACTOR_REDACTION_STRATEGY '{other}'. Must be one of: replace, hash"
                )))
            }
        };
    }
    if let Some(val) = var("REDACTION_HASH_KEY") {
        config.redaction.hash_key = Some(secret_string(val));
    }

    // Output overrides
    if let Some(val) = var("OUTPUT_DIRECTORY") {
        config.output.directory = Some(PathBuf::from(val));
    }
    if let Some(val) = var("OUTPUT_SUFFIX") {
        config.output.suffix = val;
    }

    // Pipeline overrides
    if let Some(val) = var("PIPELINE_MAX_PARALLEL_FILES") {
        config.pipeline.max_parallel_files =
            parse_env("PHI_REDACTOR_PIPELINE_MAX_PARALLEL_FILES", &val)?;
    }
    if let Some(val) = var("PIPELINE_FILE_TIMEOUT_SECONDS") {
        config.pipeline.file_timeout_seconds =
            parse_env("PHI_REDACTOR_PIPELINE_FILE_TIMEOUT_SECONDS", &val)?;
    }

    // Logging overrides
    if let Some(val) = var("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = var("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
