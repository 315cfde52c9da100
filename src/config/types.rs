//! Configuration types
//!
//! Declarative relay configuration for YAML parsing.

use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::{AggregatorConfig, StopCondition};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Top-level relay configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    /// Listener settings
    #[serde(default)]
    pub server: ServerDefinition,
    /// Upstreams keyed by endpoint name (`showtimes`, `cinemas`, ...)
    #[serde(default)]
    pub upstreams: BTreeMap<String, UpstreamDefinition>,
}

// ============================================================================
// Server Definition
// ============================================================================

/// Listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerDefinition {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerDefinition {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

// ============================================================================
// Upstream Definition
// ============================================================================

/// One upstream API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpstreamDefinition {
    /// URL the page parameter is appended to
    pub base_url: String,
    /// Static query parameters appended to every request (API keys, locale)
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpDefinition,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationDefinition,
}

impl UpstreamDefinition {
    /// HTTP client configuration for this upstream
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.http.timeout_secs));

        if let Some(rps) = self.http.rate_limit_rps {
            builder = builder.rate_limit(RateLimiterConfig::new(rps, rps));
        } else {
            builder = builder.no_rate_limit();
        }

        if let Some(ua) = &self.http.user_agent {
            builder = builder.user_agent(ua);
        }

        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpDefinition {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Rate limit (requests per second)
    #[serde(default)]
    pub rate_limit_rps: Option<u32>,
    /// User agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpDefinition {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            rate_limit_rps: None,
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    15
}

// ============================================================================
// Pagination Definition
// ============================================================================

/// Page-number pagination settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PaginationDefinition {
    /// Page parameter name
    #[serde(default = "default_page_param")]
    pub page_param: String,
    /// First page number
    #[serde(default = "default_start_page")]
    pub start_page: u32,
    /// Most pages fetched per aggregation
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Dotted path to the results array
    #[serde(default = "default_results_field")]
    pub results_field: String,
    /// Dotted path to a total-pages field, when the upstream has one
    #[serde(default)]
    pub total_pages_path: Option<String>,
}

impl Default for PaginationDefinition {
    fn default() -> Self {
        Self {
            page_param: default_page_param(),
            start_page: default_start_page(),
            max_pages: default_max_pages(),
            results_field: default_results_field(),
            total_pages_path: None,
        }
    }
}

impl PaginationDefinition {
    /// Aggregator settings
    pub fn aggregator_config(&self) -> AggregatorConfig {
        let stop_condition = match &self.total_pages_path {
            Some(path) => StopCondition::total_pages(path),
            None => StopCondition::EmptyPage,
        };

        AggregatorConfig::new()
            .with_page_param(&self.page_param)
            .with_start_page(self.start_page)
            .with_max_pages(self.max_pages)
            .with_results_field(&self.results_field)
            .with_stop_condition(stop_condition)
    }
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_start_page() -> u32 {
    1
}

fn default_max_pages() -> u32 {
    10
}

fn default_results_field() -> String {
    "results".to_string()
}
