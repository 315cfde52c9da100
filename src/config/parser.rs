//! YAML parser for relay configuration
//!
//! Parses and validates the configuration file.

use crate::config::types::{AppConfig, UpstreamDefinition};
use crate::error::{Error, Result};
use crate::upstream::EndpointKind;
use reqwest::header::{HeaderName, HeaderValue};
use std::fs;
use tracing::debug;
use std::path::Path;
use url::Url;

/// Load configuration from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    debug!("Loading config from {}", path.display());
    let content = fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load configuration from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<AppConfig> {
    let config: AppConfig = serde_yaml::from_str(yaml)?;

    validate_config(&config)?;
    Ok(config)
}

/// Validate a parsed configuration
fn validate_config(config: &AppConfig) -> Result<()> {
    if config.server.host.trim().is_empty() {
        return Err(Error::config("Server host cannot be empty"));
    }

    if config.upstreams.is_empty() {
        return Err(Error::config("At least one upstream must be configured"));
    }

    for (name, upstream) in &config.upstreams {
        if EndpointKind::from_name(name).is_none() {
            let known: Vec<&str> = EndpointKind::ALL.iter().map(|k| k.name()).collect();
            return Err(Error::config(format!(
                "Unknown upstream '{}'. Known upstreams: {}",
                name,
                known.join(", ")
            )));
        }
        validate_upstream(name, upstream)?;
    }

    Ok(())
}

/// Validate one upstream definition
fn validate_upstream(name: &str, upstream: &UpstreamDefinition) -> Result<()> {
    let url = Url::parse(&upstream.base_url).map_err(|e| {
        Error::config(format!(
            "Upstream '{}' has invalid base_url '{}': {}",
            name, upstream.base_url, e
        ))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::config(format!(
            "Upstream '{}' base_url must be http or https",
            name
        )));
    }

    let pagination = &upstream.pagination;
    if pagination.max_pages == 0 {
        return Err(Error::config(format!(
            "Upstream '{name}' max_pages must be at least 1"
        )));
    }

    if pagination.start_page == 0 {
        return Err(Error::config(format!(
            "Upstream '{name}' start_page must be at least 1"
        )));
    }

    if pagination.page_param.is_empty() {
        return Err(Error::config(format!(
            "Upstream '{name}' page_param cannot be empty"
        )));
    }

    if upstream.params.contains_key(&pagination.page_param) {
        return Err(Error::config(format!(
            "Upstream '{}' static params cannot set the page parameter '{}'",
            name, pagination.page_param
        )));
    }

    for (key, value) in &upstream.headers {
        HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            Error::config(format!("Upstream '{name}' has invalid header name '{key}': {e}"))
        })?;
        HeaderValue::from_str(value).map_err(|e| {
            Error::config(format!(
                "Upstream '{name}' has invalid value for header '{key}': {e}"
            ))
        })?;
    }

    if upstream.http.timeout_secs == 0 {
        return Err(Error::config(format!(
            "Upstream '{name}' timeout_secs must be at least 1"
        )));
    }

    Ok(())
}
