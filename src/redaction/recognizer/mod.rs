//! Recognizers and their registry
//!
//! A recognizer turns cell text into candidate [`Detection`]s. The registry
//! runs every recognizer on every scanned cell and concatenates the results;
//! overlap resolution happens later in the scanner.

pub mod pattern;
pub mod registry;
pub mod statistical;

pub use pattern::PatternRecognizer;
pub use registry::RecognizerRegistry;
pub use statistical::StatisticalRecognizer;

use crate::domain::{Detection, Result};
use async_trait::async_trait;

/// Trait for detection sources consulted by the registry
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Returns candidate detections with byte offsets into `text`
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying capability fails for this text.
    async fn recognize(&self, text: &str) -> Result<Vec<Detection>>;
}
