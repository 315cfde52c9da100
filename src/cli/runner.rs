//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, AppConfig};
use crate::error::{Error, Result};
use crate::types::StringMap;
use crate::upstream::{EndpointKind, UpstreamRegistry};
use serde_json::{json, Value};
use std::time::Instant;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Serve { host, port } => {
                let mut config = self.load_config()?;
                if let Some(host) = host {
                    config.server.host.clone_from(host);
                }
                if let Some(port) = port {
                    config.server.port = *port;
                }
                crate::cli::serve(config).await
            }
            Commands::Fetch { endpoint, params } => self.fetch(endpoint, params).await,
            Commands::Validate => self.validate(),
            Commands::Endpoints => self.endpoints(),
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<AppConfig> {
        load_config(&self.cli.config)
    }

    /// Run one endpoint and print its results
    async fn fetch(&self, endpoint: &str, params: &[(String, String)]) -> Result<()> {
        let kind = EndpointKind::from_name(endpoint)
            .ok_or_else(|| Error::config(format!("Unknown endpoint '{endpoint}'")))?;

        let config = self.load_config()?;
        let registry = UpstreamRegistry::from_config(&config)?;
        let upstream = registry.get(kind).ok_or_else(|| {
            Error::config(format!(
                "Endpoint '{endpoint}' has no upstream in {}",
                self.cli.config.display()
            ))
        })?;

        let raw: StringMap = params.iter().cloned().collect();
        let start = Instant::now();
        let results = upstream.query(&raw).await?;

        if self.cli.verbose {
            eprintln!(
                "Fetched {} {} in {:.2}s",
                results.len(),
                kind.label(),
                start.elapsed().as_secs_f64()
            );
        }

        self.output(&json!({ "results": results }))
    }

    /// Validate the configuration file
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;
        let names: Vec<&str> = config.upstreams.keys().map(String::as_str).collect();

        self.output(&json!({
            "status": "VALID",
            "config": self.cli.config.display().to_string(),
            "listen": format!("{}:{}", config.server.host, config.server.port),
            "upstreams": names
        }))
    }

    /// List configured endpoints
    fn endpoints(&self) -> Result<()> {
        let config = self.load_config()?;

        let endpoints: Vec<Value> = EndpointKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let upstream = config.upstreams.get(kind.name())?;
                let params: Vec<Value> = kind
                    .params()
                    .iter()
                    .map(|p| {
                        json!({
                            "name": p.name,
                            "required": p.is_required(),
                            "default": p.default
                        })
                    })
                    .collect();
                Some(json!({
                    "name": kind.name(),
                    "route": kind.route(),
                    "upstream": upstream.base_url,
                    "params": params
                }))
            })
            .collect();

        self.output(&json!({ "endpoints": endpoints }))
    }

    /// Print a JSON document in the selected format
    fn output(&self, value: &Value) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}
