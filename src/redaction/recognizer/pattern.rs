//! Regular-expression recognizer

use super::Recognizer;
use crate::domain::{Detection, DetectionSource, Result};
use crate::redaction::rules::PatternRule;
use async_trait::async_trait;

/// Emits one detection per regex match with the rule's fixed confidence
pub struct PatternRecognizer {
    rule: PatternRule,
}

impl PatternRecognizer {
    pub fn new(rule: PatternRule) -> Self {
        Self { rule }
    }

    /// Synchronous core, also used by the `check-pattern` command
    pub fn find(&self, text: &str) -> Vec<Detection> {
        self.rule
            .regex
            .find_iter(text)
            .filter(|m| !m.as_str().is_empty())
            .map(|m| {
                Detection::new(
                    self.rule.entity_type.clone(),
                    m.range(),
                    self.rule.confidence,
                    DetectionSource::Pattern,
                )
            })
            .collect()
    }
}

#[async_trait]
impl Recognizer for PatternRecognizer {
    fn name(&self) -> &str {
        &self.rule.name
    }

    async fn recognize(&self, text: &str) -> Result<Vec<Detection>> {
        Ok(self.find(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityType;
    use regex::Regex;

    fn recognizer(pattern: &str) -> PatternRecognizer {
        PatternRecognizer::new(PatternRule {
            name: "mrn".to_string(),
            entity_type: EntityType::new("MRN").unwrap(),
            regex: Regex::new(pattern).unwrap(),
            confidence: 0.8,
        })
    }

    #[tokio::test]
    async fn test_every_match_is_reported() {
        let r = recognizer(r"\b[A-Z]{2}\d{6}\b");
        let found = r.recognize("AB123456 then CD654321").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].span(), 0..8);
        assert_eq!(found[1].span(), 14..22);
        assert!(found.iter().all(|d| d.confidence == 0.8));
        assert!(found.iter().all(|d| d.source == DetectionSource::Pattern));
    }

    #[test]
    fn test_empty_matches_skipped() {
        let r = recognizer(r"\d*");
        assert!(r.find("no digits").is_empty());
        assert_eq!(r.find("id 42").len(), 1);
    }
}
