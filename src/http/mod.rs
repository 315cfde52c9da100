//! HTTP client module
//!
//! Outbound HTTP for talking to upstream APIs.
//!
//! # Features
//!
//! - **Timeouts**: every request is bounded, timeouts become upstream errors
//! - **Rate Limiting**: token bucket rate limiter using governor
//! - **No Retries**: a failed page fails the whole aggregation

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
