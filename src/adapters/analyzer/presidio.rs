//! Presidio analyzer HTTP client
//!
//! Talks to the Presidio analyzer REST service (`POST /analyze`,
//! `GET /health`). Presidio reports offsets in characters; they are
//! converted to byte offsets before leaving this module.

use super::models::{AnalyzeRequest, RecognizerResult};
use super::{AnalyzerFinding, EntityAnalyzer};
use crate::config::AnalyzerConfig;
use crate::domain::{AnalyzerError, RedactorError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;

const INITIAL_RETRY_DELAY_MS: u64 = 200;
const MAX_RETRY_DELAY_MS: u64 = 2_000;

/// Presidio analyzer client
pub struct PresidioClient {
    base_url: String,
    client: Client,
    language: String,
    max_retries: u32,
}

impl PresidioClient {
    /// Create a new client from analyzer configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &AnalyzerConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(10)))
            .build()
            .map_err(|e| {
                RedactorError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            client,
            language: config.language.clone(),
            max_retries: config.max_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Retry transient failures with exponential backoff
    async fn retry_request<F, T, Fut>(&self, operation: F) -> std::result::Result<T, AnalyzerError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<T, AnalyzerError>>,
    {
        let mut attempt: u32 = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if is_transient(&e) && attempt < self.max_retries => {
                    attempt += 1;
                    let delay_ms = INITIAL_RETRY_DELAY_MS
                        .checked_shl(attempt - 1)
                        .unwrap_or(MAX_RETRY_DELAY_MS)
                        .min(MAX_RETRY_DELAY_MS);

                    crate::log_retry_attempt!(attempt, self.max_retries, e);
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn post_analyze(
        &self,
        text: &str,
        labels: &[String],
    ) -> std::result::Result<Vec<RecognizerResult>, AnalyzerError> {
        let url = format!("{}/analyze", self.base_url);
        let body = AnalyzeRequest {
            text,
            language: &self.language,
            entities: labels,
        };

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(map_status(status, message));
        }

        resp.json::<Vec<RecognizerResult>>()
            .await
            .map_err(|e| AnalyzerError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl EntityAnalyzer for PresidioClient {
    async fn analyze(
        &self,
        text: &str,
        labels: &[String],
    ) -> std::result::Result<Vec<AnalyzerFinding>, AnalyzerError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let results = self
            .retry_request(|| self.post_analyze(text, labels))
            .await?;

        tracing::trace!(
            text_len = text.len(),
            findings = results.len(),
            "Analyzer response received"
        );

        to_byte_offsets(text, results)
    }

    async fn health_check(&self) -> std::result::Result<(), AnalyzerError> {
        let url = format!("{}/health", self.base_url);
        let (client, url) = (&self.client, url.as_str());

        let resp = self
            .retry_request(|| async move {
                client.get(url).send().await.map_err(map_transport_error)
            })
            .await?;

        let status = resp.status();
        if status.is_success() {
            tracing::info!(endpoint = %self.base_url, "Analyzer is ready");
            Ok(())
        } else {
            let message = resp.text().await.unwrap_or_default();
            Err(AnalyzerError::Unavailable(format!(
                "health check returned {status}: {message}"
            )))
        }
    }
}

fn is_transient(err: &AnalyzerError) -> bool {
    matches!(
        err,
        AnalyzerError::ConnectionFailed(_)
            | AnalyzerError::Timeout(_)
            | AnalyzerError::ServerError { .. }
    )
}

fn map_transport_error(err: reqwest::Error) -> AnalyzerError {
    if err.is_timeout() {
        AnalyzerError::Timeout(err.to_string())
    } else {
        AnalyzerError::ConnectionFailed(err.to_string())
    }
}

fn map_status(status: StatusCode, message: String) -> AnalyzerError {
    if status.is_server_error() {
        AnalyzerError::ServerError {
            status: status.as_u16(),
            message,
        }
    } else {
        AnalyzerError::ClientError {
            status: status.as_u16(),
            message,
        }
    }
}

/// Converts character offsets to byte offsets, rejecting impossible spans
fn to_byte_offsets(
    text: &str,
    results: Vec<RecognizerResult>,
) -> std::result::Result<Vec<AnalyzerFinding>, AnalyzerError> {
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = boundaries.len() - 1;

    results
        .into_iter()
        .map(|r| {
            if r.start >= r.end || r.end > char_len {
                return Err(AnalyzerError::InvalidSpan {
                    start: r.start,
                    end: r.end,
                    len: char_len,
                });
            }
            Ok(AnalyzerFinding {
                label: r.entity_type,
                start: boundaries[r.start],
                end: boundaries[r.end],
                score: r.score,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(start: usize, end: usize) -> RecognizerResult {
        RecognizerResult {
            entity_type: "PERSON".to_string(),
            start,
            end,
            score: 0.85,
        }
    }

    #[test]
    fn test_ascii_offsets_unchanged() {
        let findings = to_byte_offsets("Jane Roe visited", vec![result(0, 8)]).unwrap();
        assert_eq!(findings[0].start, 0);
        assert_eq!(findings[0].end, 8);
    }

    #[test]
    fn test_multibyte_offsets_converted() {
        // "José Núñez": 'é', 'ú', 'ñ' are two bytes each
        let text = "José Núñez";
        let findings = to_byte_offsets(text, vec![result(5, 10)]).unwrap();
        assert_eq!(&text[findings[0].start..findings[0].end], "Núñez");
    }

    #[test]
    fn test_out_of_range_span_rejected() {
        let err = to_byte_offsets("short", vec![result(2, 9)]).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidSpan { len: 5, .. }));
        assert!(to_byte_offsets("short", vec![result(3, 3)]).is_err());
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            map_status(StatusCode::BAD_GATEWAY, String::new()),
            AnalyzerError::ServerError { status: 502, .. }
        ));
        assert!(matches!(
            map_status(StatusCode::UNPROCESSABLE_ENTITY, String::new()),
            AnalyzerError::ClientError { status: 422, .. }
        ));
    }

    #[test]
    fn test_transient_classification() {
        assert!(is_transient(&AnalyzerError::Timeout("t".into())));
        assert!(!is_transient(&AnalyzerError::InvalidResponse("x".into())));
        assert!(!is_transient(&AnalyzerError::ClientError {
            status: 400,
            message: String::new()
        }));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = AnalyzerConfig {
            endpoint: "http://analyzer:3000/".to_string(),
            ..AnalyzerConfig::default()
        };
        let client = PresidioClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://analyzer:3000");
    }
}
