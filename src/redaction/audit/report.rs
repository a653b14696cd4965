//! CSV audit report

use super::recorder::AuditEvent;
use crate::domain::{RedactorError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// File-level values repeated on every report row
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub timestamp: DateTime<Utc>,
    pub input_file: String,
    /// Empty in dry runs
    pub output_file: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    timestamp: &'a str,
    input_file: &'a str,
    output_file: &'a str,
    sheet: &'a str,
    row: usize,
    column: usize,
    entity_type: &'a str,
    confidence: String,
    source: &'a str,
    strategy: &'a str,
    redacted_value: &'a str,
    original_digest: &'a str,
    original_value: &'a str,
    status: &'a str,
    detail: &'a str,
}

/// Writes one CSV row per event to `path`
///
/// A header row is always written, so a file with no findings still
/// produces a valid, empty report.
///
/// # Errors
///
/// Returns `RedactorError::Write` if the file cannot be created or written.
pub fn write_report(events: &[AuditEvent], path: &Path, context: &ReportContext) -> Result<()> {
    let fail = |e: csv::Error| RedactorError::write(path, e.to_string());
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(fail)?;

    writer
        .write_record([
            "timestamp",
            "input_file",
            "output_file",
            "sheet",
            "row",
            "column",
            "entity_type",
            "confidence",
            "source",
            "strategy",
            "redacted_value",
            "original_digest",
            "original_value",
            "status",
            "detail",
        ])
        .map_err(fail)?;

    let timestamp = context.timestamp.to_rfc3339();
    let output_file = context.output_file.as_deref().unwrap_or("");

    for event in events {
        let row = match event {
            AuditEvent::Redaction(record) => ReportRow {
                timestamp: &timestamp,
                input_file: &context.input_file,
                output_file,
                sheet: &record.sheet,
                row: record.row,
                column: record.column,
                entity_type: record.entity_type.as_str(),
                confidence: format!("{:.2}", record.confidence),
                source: record.source.as_str(),
                strategy: record.strategy.as_str(),
                redacted_value: &record.redacted_value,
                original_digest: record.original_digest.as_deref().unwrap_or(""),
                original_value: record.original_value.as_deref().unwrap_or(""),
                status: "redacted",
                detail: "",
            },
            AuditEvent::Failure(flag) => ReportRow {
                timestamp: &timestamp,
                input_file: &context.input_file,
                output_file,
                sheet: &flag.sheet,
                row: flag.row,
                column: flag.column,
                entity_type: "",
                confidence: String::new(),
                source: "",
                strategy: "",
                redacted_value: "",
                original_digest: "",
                original_value: "",
                status: "failed",
                detail: &flag.reason,
            },
        };
        writer.serialize(&row).map_err(fail)?;
    }

    writer
        .flush()
        .map_err(|e| RedactorError::write(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DetectionSource, EntityType, RedactionStrategy};
    use crate::redaction::audit::{AuditRecord, CellFlag};
    use tempfile::TempDir;

    fn context() -> ReportContext {
        ReportContext {
            timestamp: Utc::now(),
            input_file: "patients.xlsx".to_string(),
            output_file: Some("patients_redacted.xlsx".to_string()),
        }
    }

    fn read_rows(path: &Path) -> Vec<csv::StringRecord> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_report_columns_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.csv");
        let events = vec![
            AuditEvent::Redaction(AuditRecord {
                sheet: "Visits".to_string(),
                row: 2,
                column: 3,
                entity_type: EntityType::new("SSN").unwrap(),
                confidence: 0.9,
                source: DetectionSource::Statistical,
                strategy: RedactionStrategy::Hash,
                redacted_value: "[SSN:0123456789abcdef]".to_string(),
                original_digest: Some("ab".repeat(32)),
                original_value: None,
            }),
            AuditEvent::Failure(CellFlag {
                sheet: "Visits".to_string(),
                row: 4,
                column: 1,
                reason: "analyzer returned 500".to_string(),
            }),
        ];

        write_report(&events, &path, &context()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 15);
        assert_eq!(&headers[5], "column");

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][6], "SSN");
        assert_eq!(&rows[0][7], "0.90");
        assert_eq!(&rows[0][8], "statistical");
        assert_eq!(&rows[0][11], "ab".repeat(32));
        assert_eq!(&rows[0][12], "");
        assert_eq!(&rows[0][13], "redacted");
        assert_eq!(&rows[1][13], "failed");
        assert_eq!(&rows[1][14], "analyzer returned 500");
    }

    #[test]
    fn test_empty_report_has_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.csv");
        write_report(&[], &path, &context()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("timestamp,input_file,output_file,"));
    }
}
