//! Per-file pipeline controller
//!
//! Drives one workbook through `Loading → ClassifyingColumns → ScanningRows
//! → Finalizing`. A failure in any stage ends the file in `FileFailed`; a
//! failure inside one cell only flags that cell.

use crate::adapters::analyzer::EntityAnalyzer;
use crate::adapters::spreadsheet::{accessor_for, write_atomically, SpreadsheetAccessor};
use crate::config::RedactorConfig;
use crate::core::pipeline::output::OutputPaths;
use crate::domain::{
    CellValue, ColumnClassification, EntityType, RedactorError, Result, Sheet, Workbook,
};
use crate::redaction::audit::{write_report, AuditEvent, AuditRecorder, ReportContext};
use crate::redaction::normalize::normalize_text;
use crate::redaction::{
    CellScanner, ColumnClassifier, RecognizerRegistry, RedactedCell, RedactionApplier, RuleSet,
};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

static SCAN_NORMALLY: ColumnClassification = ColumnClassification::None;

/// Processing stage of one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStage {
    Loading,
    ClassifyingColumns,
    ScanningRows,
    Finalizing,
}

impl fmt::Display for FileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileStage::Loading => "loading",
            FileStage::ClassifyingColumns => "classifying_columns",
            FileStage::ScanningRows => "scanning_rows",
            FileStage::Finalizing => "finalizing",
        };
        f.write_str(s)
    }
}

/// Terminal state of one file
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    Completed,
    Failed {
        stage: FileStage,
        kind: &'static str,
        message: String,
    },
    /// Not started because shutdown was requested
    Skipped,
}

/// Result of processing one input file
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub status: FileStatus,
    /// Redacted workbook, absent in dry runs and on failure
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub redactions: usize,
    pub cells_flagged: usize,
    pub redactions_by_type: BTreeMap<EntityType, usize>,
    pub duration: Duration,
}

impl FileOutcome {
    fn empty(input: &Path, status: FileStatus) -> Self {
        Self {
            input: input.to_path_buf(),
            status,
            output: None,
            report: None,
            redactions: 0,
            cells_flagged: 0,
            redactions_by_type: BTreeMap::new(),
            duration: Duration::ZERO,
        }
    }

    /// Outcome for a file that failed in `stage`
    pub fn failed(input: &Path, stage: FileStage, error: &RedactorError) -> Self {
        Self::empty(
            input,
            FileStatus::Failed {
                stage,
                kind: error.kind(),
                message: error.to_string(),
            },
        )
    }

    pub fn skipped(input: &Path) -> Self {
        Self::empty(input, FileStatus::Skipped)
    }

    pub fn is_completed(&self) -> bool {
        self.status == FileStatus::Completed
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, FileStatus::Failed { .. })
    }

    fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Redacted content and audit trail for one workbook
#[derive(Debug, Clone)]
pub struct RunResult {
    pub workbook: Workbook,
    pub events: Vec<AuditEvent>,
    pub redactions: usize,
    pub cells_flagged: usize,
    pub redactions_by_type: BTreeMap<EntityType, usize>,
}

/// Options that vary per run rather than per component
#[derive(Debug, Clone, Copy)]
pub struct ProcessingOptions {
    pub normalize_text: bool,
    pub has_header_row: bool,
    pub dry_run: bool,
    pub replace_existing: bool,
    /// Bounds loading and scanning; writing is never interrupted
    pub file_timeout: Option<Duration>,
}

impl ProcessingOptions {
    pub fn from_config(config: &RedactorConfig) -> Self {
        Self {
            normalize_text: config.detection.normalize_text,
            has_header_row: config.pipeline.has_header_row,
            dry_run: config.application.dry_run,
            replace_existing: config.output.replace_existing,
            file_timeout: match config.pipeline.file_timeout_seconds {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}

/// Redacts workbooks with components shared read-only across files
#[derive(Clone)]
pub struct PipelineController {
    scanner: CellScanner,
    classifier: Arc<ColumnClassifier>,
    applier: Arc<RedactionApplier>,
    options: ProcessingOptions,
}

impl PipelineController {
    /// Builds every component from configuration, including the analyzer
    /// client when enabled
    ///
    /// # Errors
    ///
    /// Returns a configuration error when rules do not compile, the hash
    /// key is missing, or the analyzer is not available.
    pub async fn from_config(config: &RedactorConfig) -> Result<Self> {
        let rules = RuleSet::from_config(config)?;
        let registry = RecognizerRegistry::from_config(config, &rules).await?;
        Self::assemble(config, rules, registry)
    }

    /// Like [`from_config`](Self::from_config) with an explicit analyzer
    pub async fn with_analyzer(
        config: &RedactorConfig,
        analyzer: Option<Arc<dyn EntityAnalyzer>>,
    ) -> Result<Self> {
        let rules = RuleSet::from_config(config)?;
        let registry = RecognizerRegistry::build(config, &rules, analyzer).await?;
        Self::assemble(config, rules, registry)
    }

    fn assemble(
        config: &RedactorConfig,
        rules: RuleSet,
        registry: RecognizerRegistry,
    ) -> Result<Self> {
        let applier = RedactionApplier::new(&config.redaction, &config.audit)?;
        let classifier = ColumnClassifier::new(rules.alias_rules().to_vec());
        Ok(Self {
            scanner: CellScanner::new(Arc::new(registry), config.detection.confidence_threshold),
            classifier: Arc::new(classifier),
            applier: Arc::new(applier),
            options: ProcessingOptions::from_config(config),
        })
    }

    pub fn options(&self) -> ProcessingOptions {
        self.options
    }

    /// Processes one file end to end; never returns an error
    pub async fn process_file(&self, input: &Path, paths: &OutputPaths) -> FileOutcome {
        let started = Instant::now();
        let outcome = match self.run_file(input, paths).await {
            Ok(outcome) => outcome,
            Err((stage, error)) => {
                tracing::error!(
                    file = %input.display(),
                    stage = %stage,
                    error = %error,
                    "File failed"
                );
                FileOutcome::failed(input, stage, &error)
            }
        };
        outcome.with_duration(started.elapsed())
    }

    async fn run_file(
        &self,
        input: &Path,
        paths: &OutputPaths,
    ) -> std::result::Result<FileOutcome, (FileStage, RedactorError)> {
        let started = Instant::now();

        let accessor = accessor_for(input).map_err(|e| (FileStage::Loading, e))?;
        let result = match self.options.file_timeout {
            Some(limit) => tokio::time::timeout(limit, self.load_and_redact(&accessor, input))
                .await
                .map_err(|_| (FileStage::ScanningRows, RedactorError::Timeout(limit.as_secs())))?,
            None => self.load_and_redact(&accessor, input).await,
        }?;

        let output = if self.options.dry_run {
            tracing::info!(file = %input.display(), "Dry run; redacted workbook not written");
            None
        } else {
            write_workbook_blocking(
                accessor,
                result.workbook,
                paths.workbook.clone(),
                self.options.replace_existing,
            )
            .await
            .map_err(|e| (FileStage::Finalizing, e))?;
            Some(paths.workbook.clone())
        };

        let context = ReportContext {
            timestamp: chrono::Utc::now(),
            input_file: input.display().to_string(),
            output_file: output.as_ref().map(|p| p.display().to_string()),
        };
        write_atomically(&paths.report, self.options.replace_existing, |tmp| {
            write_report(&result.events, tmp, &context)
        })
        .map_err(|e| (FileStage::Finalizing, e))?;

        crate::log_file_complete!(
            input.display(),
            result.redactions,
            result.cells_flagged,
            started.elapsed()
        );

        Ok(FileOutcome {
            input: input.to_path_buf(),
            status: FileStatus::Completed,
            output,
            report: Some(paths.report.clone()),
            redactions: result.redactions,
            cells_flagged: result.cells_flagged,
            redactions_by_type: result.redactions_by_type,
            duration: Duration::ZERO,
        })
    }

    async fn load_and_redact(
        &self,
        accessor: &Arc<dyn SpreadsheetAccessor>,
        input: &Path,
    ) -> std::result::Result<RunResult, (FileStage, RedactorError)> {
        let workbook = read_blocking(accessor.clone(), input)
            .await
            .map_err(|e| (FileStage::Loading, e))?;
        crate::log_file_start!(input.display(), workbook.sheets.len());
        Ok(self.redact_workbook(workbook).await)
    }

    /// Redacts every sheet of `workbook` in order
    ///
    /// Cell failures are flagged in the returned events; the call itself
    /// cannot fail.
    pub async fn redact_workbook(&self, workbook: Workbook) -> RunResult {
        let mut recorder = AuditRecorder::new();
        let mut sheets = Vec::with_capacity(workbook.sheets.len());

        for sheet in workbook.sheets {
            sheets.push(self.redact_sheet(sheet, &mut recorder).await);
        }

        let redactions = recorder.redaction_count();
        let cells_flagged = recorder.flag_count();
        let redactions_by_type = recorder.counts_by_type();

        RunResult {
            workbook: Workbook::new(sheets),
            events: recorder.finish(),
            redactions,
            cells_flagged,
            redactions_by_type,
        }
    }

    async fn redact_sheet(&self, sheet: Sheet, recorder: &mut AuditRecorder) -> Sheet {
        tracing::debug!(sheet = %sheet.name, stage = %FileStage::ClassifyingColumns, "Classifying columns");
        let header = if self.options.has_header_row {
            sheet.header()
        } else {
            None
        };
        let classes = self.classifier.classify(header);
        let forced = classes.iter().filter(|c| c.forced_type().is_some()).count();
        tracing::debug!(
            sheet = %sheet.name,
            stage = %FileStage::ScanningRows,
            rows = sheet.rows.len(),
            forced_columns = forced,
            "Scanning rows"
        );

        let mut rows = Vec::with_capacity(sheet.rows.len());
        for (r, row) in sheet.rows.iter().enumerate() {
            let header_row = self.options.has_header_row && r == 0;
            let mut out = Vec::with_capacity(row.len());

            for (c, cell) in row.iter().enumerate() {
                let classification = if header_row {
                    &SCAN_NORMALLY
                } else {
                    classes.get(c).unwrap_or(&SCAN_NORMALLY)
                };
                out.push(
                    self.redact_cell(&sheet.name, r, c, cell, classification, recorder)
                        .await,
                );
            }
            rows.push(out);
        }

        Sheet::new(sheet.name, rows)
    }

    async fn redact_cell(
        &self,
        sheet: &str,
        row: usize,
        column: usize,
        cell: &CellValue,
        classification: &ColumnClassification,
        recorder: &mut AuditRecorder,
    ) -> CellValue {
        let Some(raw) = cell.as_text() else {
            return cell.clone();
        };
        let text = if self.options.normalize_text {
            normalize_text(&raw)
        } else {
            Cow::Borrowed(&*raw)
        };

        match self.scan_and_apply(&text, classification).await {
            Ok(Some(redacted)) => {
                recorder.record(sheet, row, column, redacted.replacements);
                CellValue::Text(redacted.text)
            }
            Ok(None) => match (cell, &text) {
                (CellValue::Text(_), Cow::Owned(repaired)) => CellValue::Text(repaired.clone()),
                _ => cell.clone(),
            },
            Err(e) => {
                crate::log_cell_failure!(sheet, row + 1, column + 1, e);
                recorder.flag(sheet, row, column, e.to_string());
                cell.clone()
            }
        }
    }

    async fn scan_and_apply(
        &self,
        text: &str,
        classification: &ColumnClassification,
    ) -> Result<Option<RedactedCell>> {
        let outcome = self
            .scanner
            .scan(text, classification)
            .await
            .map_err(|e| RedactorError::CellProcessing(e.to_string()))?;
        if outcome.is_clean() {
            return Ok(None);
        }
        self.applier.apply(text, &outcome.detections).map(Some)
    }
}

async fn read_blocking(accessor: Arc<dyn SpreadsheetAccessor>, input: &Path) -> Result<Workbook> {
    let path = input.to_path_buf();
    tokio::task::spawn_blocking(move || accessor.read(&path))
        .await
        .map_err(|e| RedactorError::file_access(input, format!("reader task failed: {e}")))?
}

async fn write_workbook_blocking(
    accessor: Arc<dyn SpreadsheetAccessor>,
    workbook: Workbook,
    target: PathBuf,
    replace_existing: bool,
) -> Result<()> {
    let display = target.clone();
    tokio::task::spawn_blocking(move || {
        write_atomically(&target, replace_existing, |tmp| accessor.write(&workbook, tmp))
    })
    .await
    .map_err(|e| RedactorError::write(&display, format!("writer task failed: {e}")))?
}
