//! # cine-relay
//!
//! A small HTTP relay between a cinema-showtime browser UI and the
//! third-party JSON APIs it reads from.
//!
//! ## Features
//!
//! - **Page Aggregation**: follow `?page=N` until an empty page or a page bound
//! - **Typed Projections**: reshape loosely-typed upstream records into the
//!   subset the browser needs
//! - **Relay Server**: one validated GET route per configured upstream, with CORS
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cine_relay::http::HttpClient;
//! use cine_relay::pagination::{AggregatorConfig, PageAggregator};
//!
//! #[tokio::main]
//! async fn main() -> cine_relay::Result<()> {
//!     let aggregator = PageAggregator::new(HttpClient::new()?, AggregatorConfig::default());
//!     let params = vec![("cinemaId".to_string(), "P0671".to_string())];
//!     let results = aggregator
//!         .fetch_all_pages("https://ticketing.example/_/showtimes", &params)
//!         .await?;
//!     println!("{} records", results.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! browser ──GET /api/showtimes?cinemaId=..──▶ cli::server
//!                                               │ validate (upstream::endpoints)
//!                                               ▼
//!                                     upstream::Upstream
//!                                               │ fetch_all_pages
//!                                               ▼
//!                                  pagination::PageAggregator ──▶ http::HttpClient ──▶ upstream API
//!                                               │
//!                                               ▼ project (upstream::projection)
//!                                       {"results": [...]}
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and JSON helpers
pub mod types;

/// Outbound HTTP client with timeouts and rate limiting
pub mod http;

/// Page-number aggregation
pub mod pagination;

/// Endpoint catalogue, validation and projections
pub mod upstream;

/// YAML configuration
pub mod config;

/// Command-line interface and HTTP server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use pagination::{AggregatorConfig, PageAggregator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
