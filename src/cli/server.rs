//! HTTP server mode
//!
//! One GET route per configured upstream. Each route validates its query
//! string, aggregates the upstream, and answers `{"results": [...]}`.
//! Failures answer `{"error": "..."}` with 400 for bad parameters and 500
//! for anything that went wrong upstream.

use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::types::{JsonValue, StringMap};
use crate::upstream::{EndpointKind, UpstreamRegistry};

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    registry: Arc<UpstreamRegistry>,
}

impl AppState {
    /// Wrap a registry built at startup
    pub fn new(registry: UpstreamRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Build upstream clients from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(UpstreamRegistry::from_config(config)?))
    }
}

/// Successful relay response
#[derive(Debug, Serialize)]
struct ResultsResponse {
    results: Vec<JsonValue>,
}

/// Failed relay response
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl ErrorResponse {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// Build the router for every configured upstream
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    let mut router = Router::new().route("/health", get(health).options(preflight));

    for kind in state.registry.kinds() {
        router = router.route(
            kind.route(),
            get(
                move |State(state): State<AppState>, Query(params): Query<StringMap>| async move {
                    relay(kind, &state, &params).await
                },
            )
            .options(preflight),
        );
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
pub async fn serve(config: AppConfig) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let app = build_router(state.clone());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| Error::config(format!("Invalid listen address: {e}")))?;

    for kind in state.registry.kinds() {
        tracing::info!("Serving {} at GET {}", kind, kind.route());
    }
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to {addr}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Bare OPTIONS requests get an empty 200. Real preflights are answered by
/// the CORS layer before reaching this.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn relay(kind: EndpointKind, state: &AppState, params: &StringMap) -> Response {
    let Some(upstream) = state.registry.get(kind) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("{} is not configured", kind.label()))),
        )
            .into_response();
    };

    match upstream.query(params).await {
        Ok(results) => (StatusCode::OK, Json(ResultsResponse { results })).into_response(),
        Err(e) => error_response(kind, &e),
    }
}

fn error_response(kind: EndpointKind, err: &Error) -> Response {
    if err.is_validation() {
        warn!("Rejected {} request: {}", kind, err);
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(err.to_string()))).into_response();
    }

    error!("Failed to fetch {}: {}", kind.label(), err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(format!("Failed to fetch {}", kind.label()))),
    )
        .into_response()
}
