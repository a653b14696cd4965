//! Per-cell detection decision
//!
//! Forced columns produce one full-cell detection without consulting the
//! registry. Every other cell goes through the registry, the confidence
//! threshold and overlap resolution.

use crate::domain::{ColumnClassification, Detection, Result};
use crate::redaction::recognizer::RecognizerRegistry;
use std::cmp::Ordering;
use std::ops::Range;
use std::sync::Arc;

/// Outcome of scanning one cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    /// Selected detections in left-to-right order
    pub detections: Vec<Detection>,
    /// Byte ranges left untouched, in order
    pub retained: Vec<Range<usize>>,
}

impl ScanOutcome {
    fn new(detections: Vec<Detection>, text_len: usize) -> Self {
        let mut retained = Vec::new();
        let mut cursor = 0;
        for d in &detections {
            if d.start > cursor {
                retained.push(cursor..d.start);
            }
            cursor = d.end;
        }
        if cursor < text_len {
            retained.push(cursor..text_len);
        }
        Self {
            detections,
            retained,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.detections.is_empty()
    }
}

/// Scans cell text with a shared registry and threshold
#[derive(Clone)]
pub struct CellScanner {
    registry: Arc<RecognizerRegistry>,
    threshold: f64,
}

impl CellScanner {
    pub fn new(registry: Arc<RecognizerRegistry>, threshold: f64) -> Self {
        Self {
            registry,
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Decides which spans of `text` to redact
    ///
    /// # Errors
    ///
    /// Propagates recognizer failures; the caller flags the cell.
    pub async fn scan(
        &self,
        text: &str,
        classification: &ColumnClassification,
    ) -> Result<ScanOutcome> {
        if let Some(entity_type) = classification.forced_type() {
            if text.is_empty() {
                return Ok(ScanOutcome::default());
            }
            let forced = Detection::full_cell(entity_type.clone(), text);
            return Ok(ScanOutcome::new(vec![forced], text.len()));
        }

        let candidates: Vec<Detection> = self
            .registry
            .analyze(text)
            .await?
            .into_iter()
            .filter(|d| d.confidence >= self.threshold)
            .filter(|d| !d.is_empty() && d.matched(text).is_some())
            .collect();

        Ok(ScanOutcome::new(resolve_overlaps(candidates), text.len()))
    }
}

/// Selects a non-overlapping subset of `detections`
///
/// Candidates are ranked by confidence (descending), span length
/// (descending) and entity type name (ascending), then accepted greedily
/// unless they intersect an accepted span. The result is ordered by start
/// offset.
pub fn resolve_overlaps(mut detections: Vec<Detection>) -> Vec<Detection> {
    detections.sort_by(priority);

    let mut selected: Vec<Detection> = Vec::with_capacity(detections.len());
    for candidate in detections {
        if selected.iter().all(|kept| !kept.overlaps(&candidate)) {
            selected.push(candidate);
        }
    }

    selected.sort_by_key(|d| (d.start, d.end));
    selected
}

fn priority(a: &Detection, b: &Detection) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| b.len().cmp(&a.len()))
        .then_with(|| a.entity_type.cmp(&b.entity_type))
        .then_with(|| a.start.cmp(&b.start))
}
