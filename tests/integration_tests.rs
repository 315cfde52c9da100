//! Integration tests using mock upstream servers
//!
//! Tests the full flow: inbound request → validation → page aggregation
//! against a mock upstream → projection → JSON response

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use cine_relay::cli::{build_router, AppState};
use cine_relay::config::load_config_from_str;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn relay_for(server: &MockServer) -> Router {
    let yaml = format!(
        r#"
upstreams:
  showtimes:
    base_url: {uri}/showtimes
    pagination:
      max_pages: 3
  cinemas:
    base_url: {uri}/theaters
    http:
      timeout_secs: 1
  movie_search:
    base_url: {uri}/search/movie
    params:
      language: fr-FR
"#,
        uri = server.uri()
    );
    let config = load_config_from_str(&yaml).unwrap();
    build_router(AppState::from_config(&config).unwrap())
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn showtime(title: &str, starts_at: &str) -> Value {
    json!({
        "movie": {"internalId": title.len(), "title": title},
        "showtimes": {"original": [{"startsAt": starts_at, "projection": ["DIGITAL"]}]}
    })
}

// ============================================================================
// Showtimes
// ============================================================================

#[tokio::test]
async fn test_showtimes_aggregates_all_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/showtimes"))
        .and(query_param("cinemaId", "P0671"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [showtime("Dune", "2024-03-01T14:00:00"), showtime("Wonka", "2024-03-01T16:00:00")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/showtimes"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [showtime("Perfect Days", "2024-03-01T18:00:00")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/showtimes"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = get(relay_for(&mock_server), "/api/showtimes?cinemaId=P0671").await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Dune", "Wonka", "Perfect Days"]);
    assert_eq!(body["results"][0]["sessions"][0]["time"], "14:00");

    let queries: Vec<String> = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.query().unwrap_or_default().to_string())
        .collect();
    assert_eq!(
        queries,
        vec![
            "cinemaId=P0671&day=0&page=1",
            "cinemaId=P0671&day=0&page=2",
            "cinemaId=P0671&day=0&page=3"
        ]
    );
}

#[tokio::test]
async fn test_showtimes_respects_page_bound() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/showtimes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [showtime("Forever", "2024-03-01T14:00:00")]
        })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let (status, body) = get(relay_for(&mock_server), "/api/showtimes?cinemaId=P1&day=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_showtimes_missing_cinema_is_bad_request() {
    let mock_server = MockServer::start().await;

    let (status, body) = get(relay_for(&mock_server), "/api/showtimes?day=1").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing required parameter: cinemaId"}));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_showtimes_invalid_day_is_bad_request() {
    let mock_server = MockServer::start().await;

    let (status, body) = get(relay_for(&mock_server), "/api/showtimes?cinemaId=P1&day=soon").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("day"));
}

#[tokio::test]
async fn test_upstream_failure_is_generic_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/showtimes"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [showtime("Dune", "2024-03-01T14:00:00")]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/showtimes"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway details"))
        .mount(&mock_server)
        .await;

    let (status, body) = get(relay_for(&mock_server), "/api/showtimes?cinemaId=P0671").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to fetch showtimes"}));
}

// ============================================================================
// Cinemas
// ============================================================================

#[tokio::test]
async fn test_cinemas_projection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/theaters"))
        .and(query_param("location", "ville-115755"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "internalId": "P0671",
                "name": "Le Grand Rex",
                "location": {"address": "1 bd Poissonnière", "zip": "75002", "city": "Paris"}
            }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/theaters"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let (status, body) = get(relay_for(&mock_server), "/api/cinemas?location=ville-115755").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"results": [{
            "id": "P0671",
            "name": "Le Grand Rex",
            "address": "1 bd Poissonnière",
            "postalCode": "75002",
            "city": "Paris"
        }]})
    );
}

#[tokio::test]
async fn test_upstream_timeout_is_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/theaters"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": []}))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let (status, body) = get(relay_for(&mock_server), "/api/cinemas?location=paris").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to fetch cinemas"}));
}

#[tokio::test]
async fn test_malformed_upstream_json_is_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/theaters"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
        .mount(&mock_server)
        .await;

    let (status, _) = get(relay_for(&mock_server), "/api/cinemas?location=paris").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Movie search (single page)
// ============================================================================

#[tokio::test]
async fn test_movie_search_fetches_requested_page_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", "dune"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "results": [{"id": 438631, "title": "Dune", "release_date": "2021-09-15"}],
            "total_pages": 4
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = get(relay_for(&mock_server), "/api/movies/search?query=dune&page=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["id"], "438631");
    assert_eq!(body["results"][0]["year"], 2021);
}

#[tokio::test]
async fn test_movie_search_requires_page() {
    let mock_server = MockServer::start().await;

    let (status, body) = get(relay_for(&mock_server), "/api/movies/search?query=dune").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing required parameter: page"}));
}

// ============================================================================
// Routing and CORS
// ============================================================================

#[tokio::test]
async fn test_health() {
    let mock_server = MockServer::start().await;

    let (status, body) = get(relay_for(&mock_server), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_unconfigured_endpoint_is_not_routed() {
    let mock_server = MockServer::start().await;

    let (status, _) = get(relay_for(&mock_server), "/api/movie-showtimes?movieId=1&location=x").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight() {
    let mock_server = MockServer::start().await;

    let response = relay_for(&mock_server)
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/showtimes")
                .header(header::ORIGIN, "https://ui.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("GET"));
    assert!(methods.contains("OPTIONS"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_plain_options_is_empty_ok() {
    let mock_server = MockServer::start().await;

    let response = relay_for(&mock_server)
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/cinemas")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_cross_origin_get_carries_allow_origin() {
    let mock_server = MockServer::start().await;

    let response = relay_for(&mock_server)
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "https://ui.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let mock_server = MockServer::start().await;

    for (cinema, title) in [("A1", "Alpha"), ("B2", "Beta")] {
        Mock::given(method("GET"))
            .and(path("/showtimes"))
            .and(query_param("cinemaId", cinema))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [showtime(title, "2024-03-01T14:00:00")]
            })))
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/showtimes"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&mock_server)
        .await;

    let router = relay_for(&mock_server);
    let ((status_a, body_a), (status_b, body_b)) = futures::join!(
        get(router.clone(), "/api/showtimes?cinemaId=A1"),
        get(router, "/api/showtimes?cinemaId=B2"),
    );

    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_b, StatusCode::OK);
    assert_eq!(body_a["results"][0]["title"], "Alpha");
    assert_eq!(body_b["results"][0]["title"], "Beta");
    assert_eq!(body_a["results"].as_array().unwrap().len(), 1);
    assert_eq!(body_b["results"].as_array().unwrap().len(), 1);
}

// ============================================================================
// Shipped configuration
// ============================================================================

#[test]
fn test_example_config_is_valid() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("cine-relay.example.yaml");
    let config = cine_relay::config::load_config(path).unwrap();

    assert_eq!(config.server.port, 8080);
    assert_eq!(config.upstreams.len(), 4);
    assert_eq!(config.upstreams["movie_search"].params["language"], "fr-FR");
}
