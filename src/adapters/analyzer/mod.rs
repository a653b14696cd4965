//! Statistical entity-recognition capability
//!
//! The redactor treats the NLP model as a black box behind the
//! [`EntityAnalyzer`] trait. [`PresidioClient`] talks to a Presidio analyzer
//! service over HTTP; tests substitute scripted implementations.

pub mod models;
pub mod presidio;

pub use presidio::PresidioClient;

use crate::domain::AnalyzerError;
use async_trait::async_trait;

/// One span reported by the analyzer
///
/// Offsets are byte offsets into the analyzed text and lie on character
/// boundaries. `label` is the analyzer's own entity name (e.g. `US_SSN`).
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerFinding {
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub score: f64,
}

/// Trait for statistical entity-recognition backends
///
/// # Example
///
/// ```no_run
/// use phi_redactor::adapters::analyzer::{EntityAnalyzer, PresidioClient};
/// use phi_redactor::config::AnalyzerConfig;
///
/// # async fn example() -> phi_redactor::domain::Result<()> {
/// let client = PresidioClient::new(&AnalyzerConfig::default())?;
/// client.health_check().await?;
/// let findings = client
///     .analyze("Seen by Jane Roe", &["PERSON".to_string()])
///     .await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait EntityAnalyzer: Send + Sync {
    /// Returns spans for `text`, restricted to `labels` when non-empty
    async fn analyze(
        &self,
        text: &str,
        labels: &[String],
    ) -> Result<Vec<AnalyzerFinding>, AnalyzerError>;

    /// Fails when the backend or its model is not ready
    async fn health_check(&self) -> Result<(), AnalyzerError>;
}
