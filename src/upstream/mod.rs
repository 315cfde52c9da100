//! Upstream module
//!
//! Binds each inbound endpoint to a configured upstream API: parameter
//! validation, page aggregation, and typed projection of the records.
//!
//! Upstream clients are built once from configuration and shared by every
//! request through [`UpstreamRegistry`].

mod cinemas;
mod endpoints;
mod movies;
mod projection;
mod showtimes;

pub use cinemas::{Cinema, UpstreamCinema, UpstreamLocation};
pub use endpoints::{
    validate_query, EndpointKind, Paging, ParamKind, ParamSpec, ValidatedQuery, MAX_DAY_OFFSET,
};
pub use movies::{MovieSummary, UpstreamMovieResult};
pub use projection::{project_all, Projection, UpstreamRecord};
pub use showtimes::{
    MovieShowtimes, Session, UpstreamGenre, UpstreamMovie, UpstreamPoster, UpstreamSession,
    UpstreamShowtimeRecord,
};

use crate::config::{AppConfig, UpstreamDefinition};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::PageAggregator;
use crate::types::{JsonValue, QueryParams, StringMap};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// One configured upstream serving one endpoint
#[derive(Debug)]
pub struct Upstream {
    kind: EndpointKind,
    base_url: String,
    static_params: QueryParams,
    aggregator: PageAggregator<HttpClient>,
}

impl Upstream {
    /// Build an upstream and its HTTP client from configuration
    pub fn new(kind: EndpointKind, definition: &UpstreamDefinition) -> Result<Self> {
        let client = HttpClient::with_config(definition.http_client_config())?;
        let aggregator = PageAggregator::new(client, definition.pagination.aggregator_config());

        Ok(Self {
            kind,
            base_url: definition.base_url.clone(),
            static_params: definition
                .params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            aggregator,
        })
    }

    /// Endpoint served by this upstream
    pub fn kind(&self) -> EndpointKind {
        self.kind
    }

    /// Upstream base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate an inbound query, fetch from the upstream, and project the
    /// records.
    pub async fn query(&self, raw: &StringMap) -> Result<Vec<JsonValue>> {
        let validated = validate_query(self.kind, raw)?;

        let mut params = validated.params;
        params.extend(self.static_params.iter().cloned());

        let records = match (self.kind.paging(), validated.page) {
            (Paging::Single, Some(page)) => {
                self.aggregator
                    .fetch_page(&self.base_url, &params, page)
                    .await?
                    .results
            }
            (Paging::Single, None) => return Err(Error::missing_param("page")),
            (Paging::All, _) => self.aggregator.fetch_all_pages(&self.base_url, &params).await?,
        };

        debug!("{}: {} upstream records", self.kind, records.len());
        Ok(self.kind.projection().apply(records))
    }
}

/// Every configured upstream, keyed by endpoint
#[derive(Debug, Default)]
pub struct UpstreamRegistry {
    upstreams: BTreeMap<EndpointKind, Arc<Upstream>>,
}

impl UpstreamRegistry {
    /// Build one upstream per configured endpoint
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut upstreams = BTreeMap::new();
        for (name, definition) in &config.upstreams {
            let kind = EndpointKind::from_name(name)
                .ok_or_else(|| Error::config(format!("Unknown upstream '{name}'")))?;
            upstreams.insert(kind, Arc::new(Upstream::new(kind, definition)?));
        }
        Ok(Self { upstreams })
    }

    /// Upstream for an endpoint, if configured
    pub fn get(&self, kind: EndpointKind) -> Option<Arc<Upstream>> {
        self.upstreams.get(&kind).cloned()
    }

    /// Configured endpoints, in catalogue order
    pub fn kinds(&self) -> Vec<EndpointKind> {
        self.upstreams.keys().copied().collect()
    }

    /// Check if nothing is configured
    pub fn is_empty(&self) -> bool {
        self.upstreams.is_empty()
    }
}
