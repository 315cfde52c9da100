//! Configuration module
//!
//! The relay is configured from one YAML file:
//!
//! ```yaml
//! server:
//!   port: 8080
//! upstreams:
//!   showtimes:
//!     base_url: https://ticketing.example/_/showtimes
//!     http:
//!       timeout_secs: 10
//!       rate_limit_rps: 5
//!     pagination:
//!       max_pages: 10
//! ```

mod parser;
mod types;

pub use parser::{load_config, load_config_from_str};
pub use types::{
    AppConfig, HttpDefinition, PaginationDefinition, ServerDefinition, UpstreamDefinition,
};
