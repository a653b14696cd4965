//! Audit trail
//!
//! [`AuditRecorder`] collects events for one file in encounter order;
//! [`write_report`] materializes them as the per-file CSV report.

pub mod recorder;
pub mod report;

pub use recorder::{AuditEvent, AuditRecord, AuditRecorder, CellFlag};
pub use report::{write_report, ReportContext};
