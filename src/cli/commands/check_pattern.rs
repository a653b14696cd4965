//! Check-pattern command implementation
//!
//! Compiles a regular expression exactly as a `pattern` rule would and runs
//! it against sample text, so a rule can be tried before it goes into the
//! configuration file.

use crate::config::RuleConfig;
use crate::domain::EntityType;
use crate::redaction::recognizer::PatternRecognizer;
use crate::redaction::RuleSet;
use clap::Args;

/// Arguments for the check-pattern command
#[derive(Args, Debug)]
pub struct CheckPatternArgs {
    /// Regular expression to test
    #[arg(short, long)]
    pub regex: String,

    /// Entity type reported for matches
    #[arg(short, long, default_value = "CUSTOM")]
    pub entity_type: String,

    /// Sample text to scan
    pub sample: String,
}

impl CheckPatternArgs {
    /// Execute the check-pattern command
    ///
    /// Returns `0` when the pattern matches, `1` when it does not and `2`
    /// when the pattern or entity type is invalid.
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let entity_type = match EntityType::new(self.entity_type.as_str()) {
            Ok(t) => t,
            Err(e) => {
                println!("❌ Invalid entity type: {e}");
                return Ok(2);
            }
        };

        let rule = RuleConfig::Pattern {
            name: "check".to_string(),
            entity_type,
            regex: self.regex.clone(),
            confidence: 1.0,
        };
        let rules = match RuleSet::from_rules([&rule]) {
            Ok(r) => r,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        let mut matches = Vec::new();
        for pattern in rules.pattern_rules() {
            matches.extend(PatternRecognizer::new(pattern.clone()).find(&self.sample));
        }

        if matches.is_empty() {
            println!("⚠️  No matches");
            return Ok(1);
        }

        println!("✅ {} match(es)", matches.len());
        for detection in &matches {
            println!(
                "  [{}..{}] {:?} → {}",
                detection.start,
                detection.end,
                detection.matched(&self.sample).unwrap_or_default(),
                detection.entity_type.placeholder()
            );
        }
        Ok(0)
    }
}
