//! Recognizer registry
//!
//! Built once per run before any file is opened and shared read-only by
//! every file worker.

use super::{PatternRecognizer, Recognizer, StatisticalRecognizer};
use crate::adapters::analyzer::{EntityAnalyzer, PresidioClient};
use crate::config::RedactorConfig;
use crate::domain::{Detection, RedactorError, Result};
use crate::redaction::rules::RuleSet;
use std::sync::Arc;

/// Ordered collection of recognizers
pub struct RecognizerRegistry {
    recognizers: Vec<Box<dyn Recognizer>>,
}

impl RecognizerRegistry {
    /// Assembles a registry from already-constructed recognizers
    pub fn new(recognizers: Vec<Box<dyn Recognizer>>) -> Self {
        Self { recognizers }
    }

    /// Builds the registry from configuration, connecting to the analyzer
    /// service when `analyzer.enabled` is set
    ///
    /// # Errors
    ///
    /// Returns `RedactorError::Configuration` when the analyzer is enabled
    /// but not reachable or not ready.
    pub async fn from_config(config: &RedactorConfig, rules: &RuleSet) -> Result<Self> {
        let analyzer: Option<Arc<dyn EntityAnalyzer>> = if config.analyzer.enabled {
            Some(Arc::new(PresidioClient::new(&config.analyzer)?))
        } else {
            tracing::warn!("Statistical analyzer disabled; only pattern and column rules apply");
            None
        };
        Self::build(config, rules, analyzer).await
    }

    /// Builds the registry with an explicit analyzer backend
    ///
    /// The analyzer is health-checked here so a missing model aborts the
    /// run before the first file.
    pub async fn build(
        config: &RedactorConfig,
        rules: &RuleSet,
        analyzer: Option<Arc<dyn EntityAnalyzer>>,
    ) -> Result<Self> {
        let mut recognizers: Vec<Box<dyn Recognizer>> = Vec::new();

        if let Some(analyzer) = analyzer {
            analyzer.health_check().await.map_err(|e| {
                RedactorError::Configuration(format!("Statistical analyzer is not available: {e}"))
            })?;
            recognizers.push(Box::new(StatisticalRecognizer::new(
                analyzer,
                &config.analyzer,
                &config.detection,
            )));
        }

        for rule in rules.pattern_rules() {
            recognizers.push(Box::new(PatternRecognizer::new(rule.clone())));
        }

        tracing::info!(
            recognizers = recognizers.len(),
            "Recognizer registry ready"
        );
        Ok(Self::new(recognizers))
    }

    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.recognizers.iter().map(|r| r.name())
    }

    /// Runs every recognizer on `text` and concatenates their detections
    ///
    /// Overlapping detections are returned as-is.
    pub async fn analyze(&self, text: &str) -> Result<Vec<Detection>> {
        let mut detections = Vec::new();
        for recognizer in &self.recognizers {
            let found = recognizer.recognize(text).await?;
            tracing::trace!(
                recognizer = recognizer.name(),
                count = found.len(),
                "Recognizer finished"
            );
            detections.extend(found);
        }
        Ok(detections)
    }
}
