//! Append-only audit recorder

use crate::domain::{DetectionSource, EntityType, RedactionStrategy};
use crate::redaction::applier::Replacement;
use std::collections::BTreeMap;

/// One applied redaction
///
/// `row` and `column` are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub sheet: String,
    pub row: usize,
    pub column: usize,
    pub entity_type: EntityType,
    pub confidence: f64,
    pub source: DetectionSource,
    pub strategy: RedactionStrategy,
    pub redacted_value: String,
    pub original_digest: Option<String>,
    pub original_value: Option<String>,
}

/// A cell that could not be evaluated and was left unredacted
#[derive(Debug, Clone, PartialEq)]
pub struct CellFlag {
    pub sheet: String,
    pub row: usize,
    pub column: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuditEvent {
    Redaction(AuditRecord),
    Failure(CellFlag),
}

/// File-scoped recorder; events are never modified once appended
#[derive(Debug, Default)]
pub struct AuditRecorder {
    events: Vec<AuditEvent>,
    redactions: usize,
    flags: usize,
}

impl AuditRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one record per replacement, in the given order
    ///
    /// `row` and `column` are 0-based sheet indices.
    pub fn record(&mut self, sheet: &str, row: usize, column: usize, replacements: Vec<Replacement>) {
        for r in replacements {
            self.redactions += 1;
            self.events.push(AuditEvent::Redaction(AuditRecord {
                sheet: sheet.to_string(),
                row: row + 1,
                column: column + 1,
                confidence: r.detection.confidence,
                source: r.detection.source,
                entity_type: r.detection.entity_type,
                strategy: r.strategy,
                redacted_value: r.redacted_value,
                original_digest: r.original_digest,
                original_value: r.original_value,
            }));
        }
    }

    /// Flags a cell left unredacted after a processing error
    pub fn flag(&mut self, sheet: &str, row: usize, column: usize, reason: impl Into<String>) {
        self.flags += 1;
        self.events.push(AuditEvent::Failure(CellFlag {
            sheet: sheet.to_string(),
            row: row + 1,
            column: column + 1,
            reason: reason.into(),
        }));
    }

    pub fn redaction_count(&self) -> usize {
        self.redactions
    }

    pub fn flag_count(&self) -> usize {
        self.flags
    }

    /// Redaction counts per entity type
    pub fn counts_by_type(&self) -> BTreeMap<EntityType, usize> {
        let mut counts = BTreeMap::new();
        for event in &self.events {
            if let AuditEvent::Redaction(record) = event {
                *counts.entry(record.entity_type.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Consumes the recorder and returns every event in encounter order
    pub fn finish(self) -> Vec<AuditEvent> {
        self.events
    }
}
