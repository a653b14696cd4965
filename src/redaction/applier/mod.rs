//! Redaction applier
//!
//! Turns the selected detections of one cell into redacted text plus one
//! [`Replacement`] per detection for the audit trail.

pub mod hash;
pub mod tag;

pub use hash::KeyedHasher;

use crate::config::{AuditConfig, RedactionConfig};
use crate::domain::{Detection, RedactionStrategy, RedactorError, Result};

/// One applied redaction
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
    pub detection: Detection,
    pub strategy: RedactionStrategy,
    /// Text written in place of the span
    pub redacted_value: String,
    /// Full keyed digest, only for the hash strategy
    pub original_digest: Option<String>,
    /// Plaintext, only when recording is enabled and the strategy is replace
    pub original_value: Option<String>,
}

/// Redacted cell text with its replacements in document order
#[derive(Debug, Clone, PartialEq)]
pub struct RedactedCell {
    pub text: String,
    pub replacements: Vec<Replacement>,
}

/// Applies per-entity strategies to detected spans
#[derive(Debug, Clone)]
pub struct RedactionApplier {
    config: RedactionConfig,
    hasher: Option<KeyedHasher>,
    record_plaintext: bool,
}

impl RedactionApplier {
    /// # Errors
    ///
    /// Returns a configuration error if a hash strategy is configured
    /// without a usable key.
    pub fn new(config: &RedactionConfig, audit: &AuditConfig) -> Result<Self> {
        let hasher = if config.uses_hash() {
            let key = config.hash_key.as_ref().ok_or_else(|| {
                RedactorError::Configuration(
                    "redaction.hash_key is required when the hash strategy is used".to_string(),
                )
            })?;
            Some(KeyedHasher::new(key, config.hash_length)?)
        } else {
            None
        };

        Ok(Self {
            config: config.clone(),
            hasher,
            record_plaintext: audit.record_plaintext,
        })
    }

    /// Replaces every detection in `text`
    ///
    /// `detections` must be non-overlapping and sorted by start offset, as
    /// produced by the scanner. Text outside the spans is copied verbatim.
    ///
    /// # Errors
    ///
    /// Returns `RedactorError::CellProcessing` for spans that do not fit
    /// `text` or that overlap.
    pub fn apply(&self, text: &str, detections: &[Detection]) -> Result<RedactedCell> {
        let mut output = String::with_capacity(text.len());
        let mut replacements = Vec::with_capacity(detections.len());
        let mut cursor = 0;

        for detection in detections {
            if detection.start < cursor {
                return Err(RedactorError::CellProcessing(format!(
                    "overlapping spans at byte {}",
                    detection.start
                )));
            }
            let original = detection.matched(text).ok_or_else(|| {
                RedactorError::CellProcessing(format!(
                    "span {}..{} does not fit cell text of {} bytes",
                    detection.start,
                    detection.end,
                    text.len()
                ))
            })?;

            let replacement = self.replace(detection, original)?;
            output.push_str(&text[cursor..detection.start]);
            output.push_str(&replacement.redacted_value);
            cursor = detection.end;
            replacements.push(replacement);
        }
        output.push_str(&text[cursor..]);

        Ok(RedactedCell {
            text: output,
            replacements,
        })
    }

    fn replace(&self, detection: &Detection, original: &str) -> Result<Replacement> {
        let strategy = self.config.strategy_for(&detection.entity_type);
        let (redacted_value, original_digest) = match strategy {
            RedactionStrategy::Replace => (tag::tag(&detection.entity_type), None),
            RedactionStrategy::Hash => {
                let hasher = self.hasher.as_ref().ok_or_else(|| {
                    RedactorError::Configuration("hash strategy has no key".to_string())
                })?;
                let digest = hasher.digest(original);
                (hasher.token(&detection.entity_type, &digest), Some(digest))
            }
        };

        let original_value = (self.record_plaintext && strategy == RedactionStrategy::Replace)
            .then(|| original.to_string());

        Ok(Replacement {
            detection: detection.clone(),
            strategy,
            redacted_value,
            original_digest,
            original_value,
        })
    }
}
