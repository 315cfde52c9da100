//! Page aggregation loop
//!
//! Requests page after page from one upstream and concatenates the
//! `results` of each, strictly in page order. Pages are fetched one at a
//! time because whether to ask for page N+1 depends on page N.

use super::types::{check_stop, AggregatorConfig, PageRequest, PageResponse, PaginationState};
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::types::JsonValue;
use async_trait::async_trait;
use tracing::{debug, info};

/// Something that can answer a page request with a JSON body
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page and return its parsed body
    async fn fetch(&self, request: &PageRequest) -> Result<JsonValue>;
}

#[async_trait]
impl PageSource for HttpClient {
    async fn fetch(&self, request: &PageRequest) -> Result<JsonValue> {
        let mut config = RequestConfig::new();
        config.query = request.query();
        self.get_json_with_config(&request.base_url, config).await
    }
}

/// Aggregates every page of a paginated upstream into one result set
#[derive(Debug)]
pub struct PageAggregator<S = HttpClient> {
    source: S,
    config: AggregatorConfig,
}

impl<S: PageSource> PageAggregator<S> {
    /// Create an aggregator over a page source
    pub fn new(source: S, config: AggregatorConfig) -> Self {
        Self { source, config }
    }

    /// Aggregation settings
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Underlying page source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch a single page
    pub async fn fetch_page(
        &self,
        base_url: &str,
        params: &[(String, String)],
        page: u32,
    ) -> Result<PageResponse> {
        let request = PageRequest::new(base_url, params, &self.config.page_param, page);
        let body = self.source.fetch(&request).await?;
        PageResponse::from_body(&body, &self.config)
    }

    /// Fetch pages until one is empty, the upstream reports the last page,
    /// or `max_pages` requests have been made.
    ///
    /// Any failing page fails the whole call; nothing fetched so far is
    /// returned.
    pub async fn fetch_all_pages(
        &self,
        base_url: &str,
        params: &[(String, String)],
    ) -> Result<Vec<JsonValue>> {
        let mut state = PaginationState::starting_at(self.config.start_page.max(1));
        let mut accumulated = Vec::new();

        loop {
            let page = self.fetch_page(base_url, params, state.page).await?;
            state.record_page(page.results.len());
            debug!(
                "{} page {}: {} records",
                base_url,
                state.page,
                page.results.len()
            );

            let stop = check_stop(&self.config, &page, &state);
            accumulated.extend(page.results);

            if let Some(reason) = stop {
                info!(
                    "Aggregated {} records from {} page(s) of {} ({})",
                    accumulated.len(),
                    state.pages_fetched,
                    base_url,
                    reason
                );
                return Ok(accumulated);
            }

            state.next_page();
        }
    }
}
