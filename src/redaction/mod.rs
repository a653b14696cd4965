//! PHI detection and redaction
//!
//! The pieces run in this order for every cell:
//!
//! 1. [`columns::ColumnClassifier`] tags each column once per sheet
//! 2. [`scanner::CellScanner`] selects detections, consulting the
//!    [`recognizer::RecognizerRegistry`] for non-forced columns
//! 3. [`applier::RedactionApplier`] masks the selected spans
//! 4. [`audit::AuditRecorder`] appends one record per masked span
//!
//! Everything here is shared read-only across files except the recorder,
//! which is created per file.

pub mod applier;
pub mod audit;
pub mod columns;
pub mod normalize;
pub mod recognizer;
pub mod rules;
pub mod scanner;

pub use applier::{RedactedCell, RedactionApplier, Replacement};
pub use audit::{AuditEvent, AuditRecord, AuditRecorder, CellFlag};
pub use columns::ColumnClassifier;
pub use normalize::normalize_text;
pub use recognizer::{Recognizer, RecognizerRegistry};
pub use rules::RuleSet;
pub use scanner::{resolve_overlaps, CellScanner, ScanOutcome};
