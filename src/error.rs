//! Error types for cine-relay
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Errors fall into two kinds that the HTTP layer cares about:
//! validation errors (bad inbound parameters, reported as 400) and
//! upstream errors (anything that went wrong talking to a third-party API,
//! reported as 500). Everything else is configuration or I/O plumbing.

use thiserror::Error;

/// The main error type for cine-relay
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Validation Errors
    // ============================================================================
    #[error("Missing required parameter: {param}")]
    MissingParam { param: String },

    #[error("Invalid value for parameter '{param}': {message}")]
    InvalidParam { param: String, message: String },

    // ============================================================================
    // Upstream Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Failed to decode upstream response: {message}")]
    Decode { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing parameter error
    pub fn missing_param(param: impl Into<String>) -> Self {
        Self::MissingParam {
            param: param.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_param(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParam {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Whether the caller sent bad parameters
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::MissingParam { .. } | Error::InvalidParam { .. })
    }

    /// Whether the failure came from talking to an upstream API
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::Http(_)
                | Error::HttpStatus { .. }
                | Error::Timeout { .. }
                | Error::Decode { .. }
                | Error::InvalidUrl(_)
        )
    }
}

/// Result type alias for cine-relay
pub type Result<T> = std::result::Result<T, Error>;
