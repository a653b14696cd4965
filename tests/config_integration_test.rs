//! Integration tests for configuration loading and validation
//!
//! Every test takes `ENV_MUTEX` because overrides are read from the process
//! environment.

use phi_redactor::config::{load_config, load_or_default, MatchMode, RuleConfig};
use phi_redactor::domain::{EntityType, RedactionStrategy};
use phi_redactor::redaction::RuleSet;
use secrecy::ExposeSecret;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    for key in [
        "PHI_REDACTOR_APPLICATION_LOG_LEVEL",
        "PHI_REDACTOR_APPLICATION_DRY_RUN",
        "PHI_REDACTOR_DETECTION_CONFIDENCE_THRESHOLD",
        "PHI_REDACTOR_ANALYZER_ENABLED",
        "PHI_REDACTOR_ANALYZER_ENDPOINT",
        "PHI_REDACTOR_REDACTION_STRATEGY",
        "PHI_REDACTOR_REDACTION_HASH_KEY",
        "PHI_REDACTOR_OUTPUT_DIRECTORY",
        "PHI_REDACTOR_PIPELINE_MAX_PARALLEL_FILES",
        "TEST_REDACTOR_HASH_KEY",
    ] {
        std::env::remove_var(key);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn et(name: &str) -> EntityType {
    EntityType::new(name).unwrap()
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"
dry_run = true

[detection]
entity_types = ["PERSON", "SSN", "MRN", "DATE"]
confidence_threshold = 0.4
normalize_text = false
include_builtin_rules = false

[analyzer]
endpoint = "http://analyzer.internal:3000"
language = "es"
timeout_seconds = 10
max_retries = 1
drop_markup_spans = false

[analyzer.labels]
PERSON = "PERSON"
US_SSN = "SSN"

[[rules]]
kind = "header_aliases"
entity_type = "MRN"
aliases = ["MRN", "Chart #"]
match_mode = "contains"

[[rules]]
kind = "pattern"
name = "site_mrn"
entity_type = "MRN"
regex = '\bMR-\d{7}\b'
confidence = 0.95

[redaction]
strategy = "replace"
hash_key = "k3y"
hash_length = 12

[redaction.overrides]
SSN = "hash"

[output]
directory = "redacted"
suffix = "_clean"
replace_existing = false

[audit]
record_plaintext = true

[pipeline]
max_parallel_files = 4
file_timeout_seconds = 0
has_header_row = false

[logging]
local_enabled = true
local_path = "/tmp/phi-redactor"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(config.detection.entity_types.len(), 4);
    assert_eq!(config.detection.confidence_threshold, 0.4);
    assert!(!config.detection.normalize_text);
    assert_eq!(config.analyzer.endpoint, "http://analyzer.internal:3000");
    assert_eq!(config.analyzer.language, "es");
    assert_eq!(config.analyzer.labels.len(), 2);
    assert_eq!(config.rules.len(), 2);
    assert!(matches!(
        &config.rules[0],
        RuleConfig::HeaderAliases { match_mode: MatchMode::Contains, .. }
    ));
    assert_eq!(config.redaction.strategy_for(&et("SSN")), RedactionStrategy::Hash);
    assert_eq!(config.redaction.strategy_for(&et("MRN")), RedactionStrategy::Replace);
    assert_eq!(config.redaction.hash_length, 12);
    assert_eq!(config.output.directory, Some(PathBuf::from("redacted")));
    assert!(!config.output.replace_existing);
    assert!(config.audit.record_plaintext);
    assert_eq!(config.pipeline.max_parallel_files, 4);
    assert!(!config.pipeline.has_header_row);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[analyzer]\nenabled = false\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert!(!config.application.dry_run);
    assert_eq!(config.detection.confidence_threshold, 0.20);
    assert!(config.detection.include_builtin_rules);
    assert_eq!(config.redaction.strategy, RedactionStrategy::Replace);
    assert_eq!(config.output.suffix, "_redacted");
    assert_eq!(config.pipeline.max_parallel_files, 2);
    assert!(!config.audit.record_plaintext);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_REDACTOR_HASH_KEY", "substituted-key");

    let file = write_config(
        r#"
[redaction]
strategy = "hash"
hash_key = "${TEST_REDACTOR_HASH_KEY}"
"#,
    );
    let config = load_config(file.path()).unwrap();
    let key = config.redaction.hash_key.as_ref().unwrap();
    assert_eq!(key.expose_secret().as_bytes(), b"substituted-key");

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable_is_fatal() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[redaction]\nhash_key = \"${TEST_REDACTOR_HASH_KEY}\"\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("TEST_REDACTOR_HASH_KEY"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("PHI_REDACTOR_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("PHI_REDACTOR_DETECTION_CONFIDENCE_THRESHOLD", "0.6");
    std::env::set_var("PHI_REDACTOR_REDACTION_STRATEGY", "hash");
    std::env::set_var("PHI_REDACTOR_REDACTION_HASH_KEY", "env-key");
    std::env::set_var("PHI_REDACTOR_OUTPUT_DIRECTORY", "/tmp/out");

    let file = write_config("[analyzer]\nenabled = false\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.detection.confidence_threshold, 0.6);
    assert_eq!(config.redaction.strategy, RedactionStrategy::Hash);
    assert!(config.redaction.hash_key.is_some());
    assert_eq!(config.output.directory, Some(PathBuf::from("/tmp/out")));

    cleanup_env_vars();
}

#[test]
fn test_invalid_env_override_is_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("PHI_REDACTOR_PIPELINE_MAX_PARALLEL_FILES", "lots");

    let file = write_config("[analyzer]\nenabled = false\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("PHI_REDACTOR_PIPELINE_MAX_PARALLEL_FILES"));

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        ("[application]\nlog_level = \"loud\"\n", "log_level"),
        ("[detection]\nconfidence_threshold = 2.0\n", "confidence_threshold"),
        ("[detection]\nentity_types = []\n", "entity_types"),
        ("[analyzer]\nendpoint = \"not a url\"\n", "analyzer.endpoint"),
        ("[redaction]\nstrategy = \"hash\"\n", "hash_key"),
        ("[output]\nsuffix = \"\"\n", "suffix"),
        ("[pipeline]\nmax_parallel_files = 0\n", "max_parallel_files"),
        (
            "[[rules]]\nkind = \"pattern\"\nname = \"bad\"\nentity_type = \"MRN\"\nregex = \"(\"\n",
            "invalid regex",
        ),
        (
            "[[rules]]\nkind = \"header_aliases\"\nentity_type = \"PASSPORT\"\naliases = [\"Passport\"]\n",
            "PASSPORT",
        ),
    ];

    for (content, expected) in cases {
        let file = write_config(content);
        let err = load_config(file.path()).unwrap_err();
        assert!(err.is_fatal(), "{content}");
        assert!(
            err.to_string().contains(expected),
            "expected '{expected}' in '{err}'"
        );
    }
}

#[test]
fn test_unknown_rule_kind_is_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[[rules]]\nkind = \"dictionary\"\nentity_type = \"MRN\"\n");
    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_load_or_default_without_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("PHI_REDACTOR_ANALYZER_ENABLED", "false");

    let config = load_or_default(None).unwrap();
    assert!(!config.analyzer.enabled);

    cleanup_env_vars();
}

#[test]
fn test_user_rules_precede_builtin_library() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[analyzer]
enabled = false

[[rules]]
kind = "header_aliases"
entity_type = "PERSON"
aliases = ["DOB"]
"#,
    );
    let config = load_config(file.path()).unwrap();
    let rules = RuleSet::from_config(&config).unwrap();

    assert!(rules.alias_rules().len() > 1);
    assert_eq!(rules.alias_rules()[0].entity_type, et("PERSON"));
    assert!(!rules.pattern_rules().is_empty());
}
