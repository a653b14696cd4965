//! Compiled header-alias and pattern rules
//!
//! User rules come first, followed by the embedded library in
//! `patterns/builtin_rules.toml` when enabled. Column classification uses the
//! first alias rule that matches, so order is significant.

use crate::config::{MatchMode, RedactorConfig, RuleConfig};
use crate::domain::{EntityType, RedactorError, Result};
use regex::Regex;
use serde::Deserialize;

const BUILTIN_RULES: &str = include_str!("../../patterns/builtin_rules.toml");

/// Header alias rule with aliases already normalized
#[derive(Debug, Clone)]
pub struct AliasRule {
    pub entity_type: EntityType,
    pub aliases: Vec<String>,
    pub match_mode: MatchMode,
}

impl AliasRule {
    /// Tests an already-normalized header
    pub fn matches(&self, normalized_header: &str) -> bool {
        if normalized_header.is_empty() {
            return false;
        }
        self.aliases.iter().any(|alias| match self.match_mode {
            MatchMode::Exact => normalized_header == alias,
            MatchMode::Contains => normalized_header.contains(alias.as_str()),
        })
    }
}

/// Compiled regex recognizer definition
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub name: String,
    pub entity_type: EntityType,
    pub regex: Regex,
    pub confidence: f64,
}

/// Ordered, compiled rules for one run
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    aliases: Vec<AliasRule>,
    patterns: Vec<PatternRule>,
}

#[derive(Deserialize)]
struct RuleLibrary {
    #[serde(default)]
    rules: Vec<RuleConfig>,
}

impl RuleSet {
    /// Builds the effective rule set for a configuration
    ///
    /// Built-in rules for entity types that are not enabled are skipped.
    pub fn from_config(config: &RedactorConfig) -> Result<Self> {
        let mut set = Self::default();
        for rule in &config.rules {
            set.push(rule)?;
        }

        if config.detection.include_builtin_rules {
            for rule in builtin_rules()? {
                if config.detection.is_enabled(rule.entity_type()) {
                    set.push(&rule)?;
                }
            }
        }

        tracing::debug!(
            alias_rules = set.aliases.len(),
            pattern_rules = set.patterns.len(),
            "Rule set compiled"
        );
        Ok(set)
    }

    /// Builds a rule set from explicit entries, in order
    pub fn from_rules<'a>(rules: impl IntoIterator<Item = &'a RuleConfig>) -> Result<Self> {
        let mut set = Self::default();
        for rule in rules {
            set.push(rule)?;
        }
        Ok(set)
    }

    fn push(&mut self, rule: &RuleConfig) -> Result<()> {
        match rule {
            RuleConfig::HeaderAliases {
                entity_type,
                aliases,
                match_mode,
            } => {
                let aliases: Vec<String> = aliases
                    .iter()
                    .map(|a| normalize_header(a))
                    .filter(|a| !a.is_empty())
                    .collect();
                if !aliases.is_empty() {
                    self.aliases.push(AliasRule {
                        entity_type: entity_type.clone(),
                        aliases,
                        match_mode: *match_mode,
                    });
                }
            }
            RuleConfig::Pattern {
                name,
                entity_type,
                regex,
                confidence,
            } => {
                let compiled = Regex::new(regex).map_err(|e| {
                    RedactorError::Configuration(format!(
                        "Invalid regex in pattern '{name}': {e}"
                    ))
                })?;
                self.patterns.push(PatternRule {
                    name: name.clone(),
                    entity_type: entity_type.clone(),
                    regex: compiled,
                    confidence: *confidence,
                });
            }
        }
        Ok(())
    }

    pub fn alias_rules(&self) -> &[AliasRule] {
        &self.aliases
    }

    pub fn pattern_rules(&self) -> &[PatternRule] {
        &self.patterns
    }
}

/// Parses the embedded rule library
pub fn builtin_rules() -> Result<Vec<RuleConfig>> {
    let library: RuleLibrary = toml::from_str(BUILTIN_RULES).map_err(|e| {
        RedactorError::Configuration(format!("Built-in rule library is invalid: {e}"))
    })?;
    Ok(library.rules)
}

/// Lower-cases and strips everything but letters and digits
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
