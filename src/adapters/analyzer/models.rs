//! Wire models for the Presidio analyzer REST API

use serde::{Deserialize, Serialize};

/// Body of `POST /analyze`
#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub text: &'a str,
    pub language: &'a str,
    #[serde(skip_serializing_if = "no_entities")]
    pub entities: &'a [String],
}

fn no_entities(entities: &&[String]) -> bool {
    entities.is_empty()
}

/// One element of the `POST /analyze` response array
///
/// `start` and `end` count Unicode scalar values, not bytes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RecognizerResult {
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
    pub score: f64,
}
