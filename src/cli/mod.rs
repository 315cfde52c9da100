//! CLI module
//!
//! Command-line interface for the relay.
//!
//! # Commands
//!
//! - `serve` - Start the HTTP server
//! - `fetch` - Run one endpoint from the terminal
//! - `validate` - Check a configuration file
//! - `endpoints` - List configured endpoints

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
pub use server::{build_router, serve, AppState};
