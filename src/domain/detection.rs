//! Detections, column classifications and redaction strategies

use super::entity::EntityType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Which signal produced a detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    /// External statistical entity recognizer
    Statistical,
    /// Configured regular expression
    Pattern,
    /// Header alias forcing full-cell redaction
    ColumnRule,
}

impl DetectionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionSource::Statistical => "statistical",
            DetectionSource::Pattern => "pattern",
            DetectionSource::ColumnRule => "column_rule",
        }
    }
}

impl fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate PHI occurrence inside one cell's text
///
/// `start` and `end` are byte offsets into the cell text and always lie on
/// UTF-8 character boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub entity_type: EntityType,
    pub start: usize,
    pub end: usize,
    pub confidence: f64,
    pub source: DetectionSource,
}

impl Detection {
    pub fn new(
        entity_type: EntityType,
        span: Range<usize>,
        confidence: f64,
        source: DetectionSource,
    ) -> Self {
        Self {
            entity_type,
            start: span.start,
            end: span.end,
            confidence,
            source,
        }
    }

    /// Detection covering the whole cell, produced by a forced column
    pub fn full_cell(entity_type: EntityType, text: &str) -> Self {
        Self::new(entity_type, 0..text.len(), 1.0, DetectionSource::ColumnRule)
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Half-open interval intersection
    pub fn overlaps(&self, other: &Detection) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The matched substring, if the span is valid for `text`
    pub fn matched<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.span())
    }
}

/// Per-column decision computed from the header row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnClassification {
    /// Cells are scanned by the recognizer registry
    #[default]
    None,
    /// Every non-empty cell is replaced in full
    Forced(EntityType),
}

impl ColumnClassification {
    pub fn forced_type(&self) -> Option<&EntityType> {
        match self {
            ColumnClassification::Forced(t) => Some(t),
            ColumnClassification::None => None,
        }
    }
}

/// How matched text is masked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedactionStrategy {
    /// Replace with `[ENTITY_TYPE]`
    #[default]
    Replace,
    /// Replace with a keyed one-way digest
    Hash,
}

impl RedactionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedactionStrategy::Replace => "replace",
            RedactionStrategy::Hash => "hash",
        }
    }
}

impl fmt::Display for RedactionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
