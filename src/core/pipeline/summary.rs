//! Run summary and reporting

use super::controller::{FileOutcome, FileStatus};
use crate::domain::EntityType;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

/// Aggregate of every file in one batch run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Identifier logged with the summary
    pub run_id: Uuid,

    pub started_at: DateTime<Utc>,

    /// Per-file outcomes in input order
    pub files: Vec<FileOutcome>,

    pub duration: Duration,

    /// Shutdown was requested before every file started
    pub interrupted: bool,

    pub dry_run: bool,
}

impl RunSummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            files: Vec::new(),
            duration: Duration::ZERO,
            interrupted: false,
            dry_run,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn files_succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.is_completed()).count()
    }

    pub fn files_failed(&self) -> usize {
        self.files.iter().filter(|f| f.is_failed()).count()
    }

    pub fn files_skipped(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.status == FileStatus::Skipped)
            .count()
    }

    pub fn total_redactions(&self) -> usize {
        self.files.iter().map(|f| f.redactions).sum()
    }

    pub fn cells_flagged(&self) -> usize {
        self.files.iter().map(|f| f.cells_flagged).sum()
    }

    /// Redactions per entity type across all files
    pub fn redactions_by_type(&self) -> BTreeMap<EntityType, usize> {
        let mut totals = BTreeMap::new();
        for file in &self.files {
            for (entity_type, count) in &file.redactions_by_type {
                *totals.entry(entity_type.clone()).or_insert(0) += count;
            }
        }
        totals
    }

    /// True when every file completed and no cell was left unevaluated
    pub fn is_successful(&self) -> bool {
        !self.interrupted && self.files_failed() == 0 && self.cells_flagged() == 0
    }

    /// Process exit code for this run
    ///
    /// `0` clean, `1` failed files or flagged cells, `130` interrupted.
    pub fn exit_code(&self) -> i32 {
        if self.interrupted {
            130
        } else if self.is_successful() {
            0
        } else {
            1
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            files_total = self.files.len(),
            files_succeeded = self.files_succeeded(),
            files_failed = self.files_failed(),
            files_skipped = self.files_skipped(),
            redactions = self.total_redactions(),
            cells_flagged = self.cells_flagged(),
            dry_run = self.dry_run,
            duration_secs = self.duration.as_secs(),
            "Redaction run completed"
        );

        for (entity_type, count) in self.redactions_by_type() {
            tracing::debug!(entity_type = %entity_type, count, "Redactions by type");
        }

        for file in &self.files {
            if let FileStatus::Failed {
                stage,
                kind,
                message,
            } = &file.status
            {
                tracing::warn!(
                    file = %file.input.display(),
                    stage = %stage,
                    error_kind = %kind,
                    message = %message,
                    "File failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::controller::FileStage;
    use crate::domain::RedactorError;
    use std::path::{Path, PathBuf};

    fn completed(name: &str, redactions: usize, flagged: usize) -> FileOutcome {
        let mut by_type = BTreeMap::new();
        if redactions > 0 {
            by_type.insert(EntityType::new("SSN").unwrap(), redactions);
        }
        FileOutcome {
            input: PathBuf::from(name),
            status: FileStatus::Completed,
            output: None,
            report: None,
            redactions,
            cells_flagged: flagged,
            redactions_by_type: by_type,
            duration: Duration::ZERO,
        }
    }

    #[test]
    fn test_clean_run_exits_zero() {
        let mut summary = RunSummary::new(false);
        summary.files.push(completed("a.xlsx", 3, 0));
        summary.files.push(completed("b.csv", 2, 0));
        assert!(summary.is_successful());
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(summary.total_redactions(), 5);
        assert_eq!(summary.redactions_by_type()[&EntityType::new("SSN").unwrap()], 5);
    }

    #[test]
    fn test_flagged_cells_make_run_partial() {
        let mut summary = RunSummary::new(false);
        summary.files.push(completed("a.xlsx", 3, 1));
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_failed_file_counts() {
        let mut summary = RunSummary::new(false);
        summary.files.push(completed("a.xlsx", 1, 0));
        summary.files.push(FileOutcome::failed(
            Path::new("b.xlsx"),
            FileStage::Loading,
            &RedactorError::file_access("b.xlsx", "corrupt"),
        ));
        assert_eq!(summary.files_succeeded(), 1);
        assert_eq!(summary.files_failed(), 1);
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_interrupted_run() {
        let mut summary = RunSummary::new(false);
        summary.files.push(FileOutcome::skipped(Path::new("a.xlsx")));
        summary.interrupted = true;
        assert_eq!(summary.files_skipped(), 1);
        assert_eq!(summary.exit_code(), 130);
    }
}
