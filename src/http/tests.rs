//! Tests for the HTTP client module

use super::*;
use crate::error::Error;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client() -> HttpClient {
    HttpClient::with_config(HttpClientConfig::builder().no_rate_limit().build()).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("cine-relay/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(5))
        .rate_limit(RateLimiterConfig::new(2, 4))
        .header("Accept-Language", "fr-FR")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(2, 4)));
    assert_eq!(
        config.default_headers.get("Accept-Language"),
        Some(&"fr-FR".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");

    let client = HttpClient::with_config(config).unwrap();
    assert!(client.has_rate_limiter());
}

#[test]
fn test_request_config_keeps_query_order() {
    let config = RequestConfig::new()
        .query("cinemaId", "123")
        .query("day", "0")
        .query("page", "1")
        .header("X-Request-Id", "abc123")
        .timeout(Duration::from_secs(10));

    let keys: Vec<&str> = config.query.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["cinemaId", "day", "page"]);
    assert_eq!(
        config.headers.get("X-Request-Id"),
        Some(&"abc123".to_string())
    );
    assert_eq!(config.timeout, Some(Duration::from_secs(10)));
}

#[tokio::test]
async fn test_get_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": 42
        })))
        .mount(&mock_server)
        .await;

    let client = test_client();
    let data: serde_json::Value = client
        .get_json_with_config(&format!("{}/api/data", mock_server.uri()), RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(data["value"], 42);
}

#[tokio::test]
async fn test_query_params_and_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("q", "dune"))
        .and(query_param("page", "2"))
        .and(header("X-Api-Key", "secret123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .header("X-Api-Key", "secret123")
        .no_rate_limit()
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let response = client
        .get_with_config(
            &format!("{}/api/search", mock_server.uri()),
            RequestConfig::new().query("q", "dune").query("page", "2"),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received[0].url.query(), Some("q=dune&page=2"));
}

#[tokio::test]
async fn test_non_success_status_is_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/broken"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client();
    let err = client
        .get_with_config(&format!("{}/api/broken", mock_server.uri()), RequestConfig::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client();
    let err = client
        .get_with_config(&format!("{}/api/missing", mock_server.uri()), RequestConfig::new())
        .await
        .unwrap_err();

    assert!(err.is_upstream());
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
        .mount(&mock_server)
        .await;

    let client = test_client();
    let err = client
        .get_json_with_config::<serde_json::Value>(
            &format!("{}/api/html", mock_server.uri()),
            RequestConfig::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"results": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client = test_client();
    let err = client
        .get_with_config(
            &format!("{}/api/slow", mock_server.uri()),
            RequestConfig::new().timeout(Duration::from_millis(50)),
        )
        .await
        .unwrap_err();

    match err {
        Error::Timeout { timeout_ms } => assert_eq!(timeout_ms, 50),
        other => panic!("Expected Timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = test_client();
    let err = client
        .get_with_config("http://127.0.0.1:1/unreachable", RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(_)));
    assert!(err.is_upstream());
}
