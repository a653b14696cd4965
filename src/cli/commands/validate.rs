//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the phi-redactor configuration file.

use crate::adapters::analyzer::{EntityAnalyzer, PresidioClient};
use crate::config::{load_or_default, RedactorConfig};
use crate::redaction::RuleSet;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also check that the analyzer service answers its health endpoint
    #[arg(long)]
    pub check_analyzer: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        let shown = config_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(default)".to_string());
        tracing::info!(config_path = %shown, "Validating configuration");

        println!("🔍 Validating configuration file: {shown}");
        println!();

        let config = match load_or_default(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        // Regex compilation happens here rather than in validate()
        let rules = match RuleSet::from_config(&config) {
            Ok(r) => r,
            Err(e) => {
                println!("❌ Rule compilation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print_summary(&config, &rules);

        if self.check_analyzer {
            return Ok(check_analyzer(&config).await);
        }
        Ok(0)
    }
}

fn print_summary(config: &RedactorConfig, rules: &RuleSet) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Dry Run: {}", config.application.dry_run);
    println!(
        "  Entity Types: {}",
        config
            .detection
            .entity_types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  Confidence Threshold: {:.2}",
        config.detection.confidence_threshold
    );
    if config.analyzer.enabled {
        println!("  Analyzer: {}", config.analyzer.endpoint);
        println!("  Analyzer Labels: {}", config.analyzer.labels.len());
    } else {
        println!("  Analyzer: disabled");
    }
    println!("  Header Alias Rules: {}", rules.alias_rules().len());
    println!("  Pattern Rules: {}", rules.pattern_rules().len());
    println!("  Strategy: {}", config.redaction.strategy.as_str());
    for (entity_type, strategy) in &config.redaction.overrides {
        println!("    {entity_type}: {}", strategy.as_str());
    }
    match &config.output.directory {
        Some(dir) => println!("  Output Directory: {}", dir.display()),
        None => println!("  Output Directory: next to each input"),
    }
    println!("  Output Suffix: {}", config.output.suffix);
    println!("  Record Plaintext: {}", config.audit.record_plaintext);
    println!("  Parallel Files: {}", config.pipeline.max_parallel_files);
    println!();
}

async fn check_analyzer(config: &RedactorConfig) -> i32 {
    if !config.analyzer.enabled {
        println!("ℹ️  Analyzer disabled; nothing to check");
        return 0;
    }

    println!("🔌 Checking analyzer at {}", config.analyzer.endpoint);
    let client = match PresidioClient::new(&config.analyzer) {
        Ok(c) => c,
        Err(e) => {
            println!("❌ Failed to create analyzer client");
            println!("   Error: {e}");
            return 2;
        }
    };

    match client.health_check().await {
        Ok(()) => {
            println!("✅ Analyzer is ready");
            0
        }
        Err(e) => {
            tracing::error!(error = %e, "Analyzer health check failed");
            println!("❌ Analyzer is not available");
            println!("   Error: {e}");
            2
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_valid_file_returns_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("phi-redactor.toml");
        std::fs::write(&path, "[analyzer]\nenabled = false\n").unwrap();

        let args = ValidateArgs {
            check_analyzer: true,
        };
        assert_eq!(args.execute(Some(&path)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_file_returns_two() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("phi-redactor.toml");
        std::fs::write(&path, "[detection]\nconfidence_threshold = 1.5\n").unwrap();

        let args = ValidateArgs {
            check_analyzer: false,
        };
        assert_eq!(args.execute(Some(&path)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_returns_two() {
        let args = ValidateArgs {
            check_analyzer: false,
        };
        let path = Path::new("/nonexistent/phi-redactor.toml");
        assert_eq!(args.execute(Some(path)).await.unwrap(), 2);
    }
}
