//! Redact command implementation
//!
//! This module implements the `redact` command, which runs the detection
//! and redaction pipeline over spreadsheets and directories of spreadsheets.

use crate::adapters::spreadsheet::SUPPORTED_EXTENSIONS;
use crate::config::{load_or_default, RedactorConfig};
use crate::core::pipeline::{BatchRunner, FileStatus, PipelineController, RunSummary};
use clap::Args;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

/// Arguments for the redact command
#[derive(Args, Debug)]
pub struct RedactArgs {
    /// Spreadsheet files or directories to process
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Directory for redacted files and reports (default: next to each input)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Scan and write reports without producing redacted workbooks
    #[arg(long)]
    pub dry_run: bool,

    /// Override detection.confidence_threshold
    #[arg(long, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Skip the statistical analyzer and rely on patterns and column rules
    #[arg(long)]
    pub no_analyzer: bool,
}

impl RedactArgs {
    /// Execute the redact command
    pub async fn execute(
        &self,
        config_path: Option<&Path>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting redact command");

        let mut config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };
        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let inputs = collect_inputs(&self.inputs, &config.output.suffix)?;
        if inputs.is_empty() {
            println!("⚠️  No spreadsheets found in the given inputs");
            return Ok(0);
        }

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - no redacted workbooks will be written");
            println!("🔍 DRY RUN MODE - reports only, no redacted workbooks");
            println!();
        }

        let controller = match PipelineController::from_config(&config).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize pipeline");
                eprintln!("Failed to initialize pipeline: {e}");
                return Ok(if e.is_fatal() { 2 } else { 5 });
            }
        };

        println!("🚀 Redacting {} file(s)...", inputs.len());
        println!();

        let runner = BatchRunner::new(controller, &config);
        let summary = runner.run(inputs, shutdown_signal).await;

        print_summary(&summary);
        Ok(summary.exit_code())
    }

    fn apply_overrides(&self, config: &mut RedactorConfig) {
        if let Some(dir) = &self.output_dir {
            tracing::info!(output_dir = %dir.display(), "Overriding output directory from CLI");
            config.output.directory = Some(dir.clone());
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        if let Some(threshold) = self.threshold {
            tracing::info!(threshold, "Overriding confidence threshold from CLI");
            config.detection.confidence_threshold = threshold;
        }
        if self.no_analyzer {
            tracing::info!("Disabling statistical analyzer from CLI");
            config.analyzer.enabled = false;
        }
    }
}

/// Expands directories (non-recursively) into supported spreadsheet files
///
/// Files inside a directory whose stem ends with `suffix` or `_report` are
/// outputs of an earlier run and are skipped. Explicit file arguments are
/// always kept.
pub fn collect_inputs(inputs: &[PathBuf], suffix: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = std::fs::read_dir(input)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_candidate(path, suffix))
            .collect();
        found.sort();
        tracing::debug!(directory = %input.display(), files = found.len(), "Expanded directory");
        files.extend(found);
    }

    Ok(files)
}

fn is_candidate(path: &Path, suffix: &str) -> bool {
    let supported = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    supported && !stem.starts_with('.') && !stem.ends_with(suffix) && !stem.ends_with("_report")
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("📊 Redaction Summary:");
    println!("  Files: {}", summary.files.len());
    println!("  Succeeded: {}", summary.files_succeeded());
    println!("  Failed: {}", summary.files_failed());
    if summary.files_skipped() > 0 {
        println!("  Skipped: {}", summary.files_skipped());
    }
    println!("  Redactions: {}", summary.total_redactions());
    println!("  Cells flagged: {}", summary.cells_flagged());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());

    let by_type = summary.redactions_by_type();
    if !by_type.is_empty() {
        println!();
        println!("  By entity type:");
        for (entity_type, count) in &by_type {
            println!("    {entity_type}: {count}");
        }
    }
    println!();

    for file in &summary.files {
        match &file.status {
            FileStatus::Completed => {
                println!("  ✅ {}", file.input.display());
                if let Some(output) = &file.output {
                    println!("     → {}", output.display());
                }
                if let Some(report) = &file.report {
                    println!("     → {}", report.display());
                }
                if file.cells_flagged > 0 {
                    println!("     ⚠️  {} cell(s) could not be evaluated", file.cells_flagged);
                }
            }
            FileStatus::Failed { stage, message, .. } => {
                println!("  ❌ {} ({stage})", file.input.display());
                println!("     {message}");
            }
            FileStatus::Skipped => {
                println!("  ⏭️  {} (not started)", file.input.display());
            }
        }
    }
    println!();

    if summary.interrupted {
        println!("⚠️  Run interrupted. Files not started were skipped.");
        tracing::info!("Redaction interrupted by user signal");
    } else if summary.is_successful() {
        println!("✅ Redaction completed successfully!");
    } else {
        println!("⚠️  Redaction completed with failures. Review the reports before sharing outputs.");
    }
}
