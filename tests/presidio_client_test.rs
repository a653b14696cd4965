//! Integration tests for the analyzer HTTP client against a mock server

use mockito::Matcher;
use phi_redactor::adapters::analyzer::{EntityAnalyzer, PresidioClient};
use phi_redactor::config::AnalyzerConfig;
use phi_redactor::domain::AnalyzerError;
use serde_json::json;

fn client_for(server: &mockito::ServerGuard, max_retries: u32) -> PresidioClient {
    let config = AnalyzerConfig {
        endpoint: server.url(),
        timeout_seconds: 5,
        max_retries,
        ..AnalyzerConfig::default()
    };
    PresidioClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_health_check_ok() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body("Presidio Analyzer service is up")
        .create_async()
        .await;

    let client = client_for(&server, 0);
    assert!(client.health_check().await.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_health_check_unavailable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(503)
        .with_body("model loading")
        .create_async()
        .await;

    let client = client_for(&server, 0);
    let err = client.health_check().await.unwrap_err();
    assert!(matches!(err, AnalyzerError::Unavailable(_)));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_analyze_sends_language_and_labels() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/analyze")
        .match_body(Matcher::PartialJson(json!({
            "text": "Jane Roe, SSN 123-45-6789",
            "language": "en",
            "entities": ["PERSON", "US_SSN"],
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"entity_type": "PERSON", "start": 0, "end": 8, "score": 0.85},
                {"entity_type": "US_SSN", "start": 14, "end": 25, "score": 0.5}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, 0);
    let findings = client
        .analyze(
            "Jane Roe, SSN 123-45-6789",
            &["PERSON".to_string(), "US_SSN".to_string()],
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0].label, "PERSON");
    assert_eq!((findings[0].start, findings[0].end), (0, 8));
    assert_eq!((findings[1].start, findings[1].end), (14, 25));
}

#[tokio::test]
async fn test_analyze_converts_character_offsets() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/analyze")
        .with_status(200)
        .with_body(json!([{"entity_type": "PERSON", "start": 5, "end": 9, "score": 0.9}]).to_string())
        .create_async()
        .await;

    let text = "Seen José Núñez today";
    let client = client_for(&server, 0);
    let findings = client.analyze(text, &[]).await.unwrap();
    assert_eq!(&text[findings[0].start..findings[0].end], "José");
}

#[tokio::test]
async fn test_analyze_retries_server_errors() {
    let mut server = mockito::Server::new_async().await;
    let failing = server
        .mock("POST", "/analyze")
        .with_status(502)
        .expect(3)
        .create_async()
        .await;

    let client = client_for(&server, 2);
    let err = client.analyze("Jane Roe", &[]).await.unwrap_err();
    assert!(matches!(err, AnalyzerError::ServerError { status: 502, .. }));
    failing.assert_async().await;
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/analyze")
        .with_status(422)
        .with_body("unknown language")
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, 3);
    let err = client.analyze("Jane Roe", &[]).await.unwrap_err();
    assert!(matches!(err, AnalyzerError::ClientError { status: 422, .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/analyze")
        .with_status(200)
        .with_body("{\"not\": \"an array\"}")
        .create_async()
        .await;

    let client = client_for(&server, 0);
    let err = client.analyze("Jane Roe", &[]).await.unwrap_err();
    assert!(matches!(err, AnalyzerError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_span_past_end_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/analyze")
        .with_status(200)
        .with_body(json!([{"entity_type": "PERSON", "start": 0, "end": 40, "score": 0.9}]).to_string())
        .create_async()
        .await;

    let client = client_for(&server, 0);
    let err = client.analyze("Jane Roe", &[]).await.unwrap_err();
    assert!(matches!(err, AnalyzerError::InvalidSpan { len: 8, .. }));
}
