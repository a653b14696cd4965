//! Domain models and types for the redactor.
//!
//! The domain layer provides:
//! - **Entity types** ([`EntityType`]) naming PHI categories
//! - **Detections** ([`Detection`]) and their [`DetectionSource`]
//! - **Column classifications** and [`RedactionStrategy`]
//! - **Tabular model** ([`Workbook`], [`Sheet`], [`CellValue`])
//! - **Error types** ([`RedactorError`], [`AnalyzerError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, RedactorError>`]:
//!
//! ```rust
//! use phi_redactor::domain::{EntityType, RedactorError, Result};
//!
//! fn parse(name: &str) -> Result<EntityType> {
//!     EntityType::new(name).map_err(RedactorError::Configuration)
//! }
//! # assert!(parse("ssn").is_ok());
//! ```

pub mod detection;
pub mod entity;
pub mod errors;
pub mod result;
pub mod workbook;

// Re-export commonly used types for convenience
pub use detection::{ColumnClassification, Detection, DetectionSource, RedactionStrategy};
pub use entity::EntityType;
pub use errors::{AnalyzerError, RedactorError};
pub use result::Result;
pub use workbook::{CellValue, Sheet, Workbook};
