//! Integration tests for logging functionality

use phi_redactor::config::LoggingConfig;
use phi_redactor::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.local_path, "logs");
}

#[test]
fn test_invalid_level_is_rejected_before_install() {
    let err = init_logging("verbose", &LoggingConfig::default()).err().unwrap();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("verbose"));
}

// The global subscriber can only be installed once per process, so file
// logging is exercised by a single test.
#[test]
fn test_file_logging_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };
    assert!(!log_path.exists());

    let guard = init_logging("debug", &config).unwrap();
    drop(guard);

    assert!(log_path.is_dir());
    let written = std::fs::read_to_string(log_path.join("phi-redactor.log")).unwrap();
    assert!(written.contains("Logging initialized"));
}
