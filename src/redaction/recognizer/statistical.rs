//! Recognizer backed by the external statistical analyzer

use super::Recognizer;
use crate::adapters::analyzer::EntityAnalyzer;
use crate::config::{AnalyzerConfig, DetectionConfig};
use crate::domain::{Detection, DetectionSource, EntityType, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Characters that mark a span as a serialization artifact rather than text
const MARKUP_CHARS: &[char] = &['"', '{', '}', '[', ']', ':'];

/// Maps analyzer labels onto configured entity types
pub struct StatisticalRecognizer {
    analyzer: Arc<dyn EntityAnalyzer>,
    labels: BTreeMap<String, EntityType>,
    requested: Vec<String>,
    drop_markup_spans: bool,
}

impl StatisticalRecognizer {
    /// Keeps only labels whose entity type is enabled for this run
    pub fn new(
        analyzer: Arc<dyn EntityAnalyzer>,
        analyzer_config: &AnalyzerConfig,
        detection: &DetectionConfig,
    ) -> Self {
        let labels: BTreeMap<String, EntityType> = analyzer_config
            .labels
            .iter()
            .filter(|(_, entity_type)| detection.is_enabled(entity_type))
            .map(|(label, entity_type)| (label.clone(), entity_type.clone()))
            .collect();
        let requested = labels.keys().cloned().collect();

        Self {
            analyzer,
            labels,
            requested,
            drop_markup_spans: analyzer_config.drop_markup_spans,
        }
    }

    /// Analyzer labels sent with every request
    pub fn requested_labels(&self) -> &[String] {
        &self.requested
    }
}

#[async_trait]
impl Recognizer for StatisticalRecognizer {
    fn name(&self) -> &str {
        "statistical"
    }

    async fn recognize(&self, text: &str) -> Result<Vec<Detection>> {
        if self.requested.is_empty() || text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let findings = self.analyzer.analyze(text, &self.requested).await?;

        let detections = findings
            .into_iter()
            .filter_map(|finding| {
                let entity_type = self.labels.get(&finding.label)?;
                let matched = text.get(finding.start..finding.end)?;
                if self.drop_markup_spans && matched.contains(MARKUP_CHARS) {
                    tracing::trace!(label = %finding.label, "Dropping markup span");
                    return None;
                }
                Some(Detection::new(
                    entity_type.clone(),
                    finding.start..finding.end,
                    finding.score.clamp(0.0, 1.0),
                    DetectionSource::Statistical,
                ))
            })
            .collect();

        Ok(detections)
    }
}
