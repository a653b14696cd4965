//! Multi-file batch runner
//!
//! Files are processed by up to `pipeline.max_parallel_files` tokio tasks.
//! Each task owns its own audit recorder; the controller's components are
//! shared read-only. Outcomes are collected in input order. The per-file
//! timeout is enforced by the controller around loading and scanning.

use super::controller::{FileOutcome, FileStage, FileStatus, PipelineController};
use super::output::OutputPlanner;
use super::summary::RunSummary;
use crate::adapters::spreadsheet::accessor_for;
use crate::config::{OutputConfig, RedactorConfig};
use crate::domain::RedactorError;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::watch;

/// Runs a [`PipelineController`] over many files
pub struct BatchRunner {
    controller: PipelineController,
    output: OutputConfig,
    max_parallel_files: usize,
}

impl BatchRunner {
    pub fn new(controller: PipelineController, config: &RedactorConfig) -> Self {
        Self {
            controller,
            output: config.output.clone(),
            max_parallel_files: config.pipeline.max_parallel_files.max(1),
        }
    }

    /// Processes `inputs`, stopping before new files once `shutdown` flips
    ///
    /// One file's failure never affects the others.
    pub async fn run(&self, inputs: Vec<PathBuf>, shutdown: watch::Receiver<bool>) -> RunSummary {
        let started = Instant::now();
        let mut summary = RunSummary::new(self.controller.options().dry_run);

        tracing::info!(
            run_id = %summary.run_id,
            files = inputs.len(),
            max_parallel = self.max_parallel_files,
            "Starting redaction run"
        );

        // Output names are assigned up front so collisions resolve in input order
        let mut planner = OutputPlanner::new(&self.output);
        let jobs: Vec<_> = inputs
            .into_iter()
            .map(|input| {
                let extension = accessor_for(&input)
                    .map(|a| a.output_extension())
                    .unwrap_or("xlsx");
                let paths = planner.plan(&input, extension);
                (input, paths)
            })
            .collect();

        let outcomes: Vec<FileOutcome> = stream::iter(jobs)
            .map(|(input, paths)| {
                let controller = self.controller.clone();
                let shutdown = shutdown.clone();
                async move {
                    if *shutdown.borrow() {
                        tracing::info!(file = %input.display(), "Shutdown requested; file skipped");
                        return FileOutcome::skipped(&input);
                    }

                    let task_input = input.clone();
                    let handle = tokio::spawn(async move {
                        controller.process_file(&task_input, &paths).await
                    });

                    match handle.await {
                        Ok(outcome) => outcome,
                        Err(e) => FileOutcome::failed(
                            &input,
                            FileStage::ScanningRows,
                            &RedactorError::Io(format!("worker task failed: {e}")),
                        ),
                    }
                }
            })
            .buffered(self.max_parallel_files)
            .collect()
            .await;

        summary.interrupted = outcomes.iter().any(|o| o.status == FileStatus::Skipped);
        summary.files = outcomes;
        let summary = summary.with_duration(started.elapsed());
        summary.log_summary();
        summary
    }
}
