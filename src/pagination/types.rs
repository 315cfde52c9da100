//! Pagination types
//!
//! Requests, parsed pages, and the knobs that decide when an aggregation stops.

use crate::error::{Error, Result};
use crate::types::{json_path, JsonValue, QueryParams};
use url::Url;

/// One page request. Built fresh for every iteration and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Upstream URL without the page parameter
    pub base_url: String,
    /// Extra query parameters, sent in order before the page parameter
    pub params: QueryParams,
    /// Name of the page query parameter
    pub page_param: String,
    /// Page number
    pub page: u32,
}

impl PageRequest {
    /// Create a page request
    pub fn new(
        base_url: impl Into<String>,
        params: &[(String, String)],
        page_param: impl Into<String>,
        page: u32,
    ) -> Self {
        let page_param = page_param.into();
        // The page parameter is owned by the aggregator.
        let params = params
            .iter()
            .filter(|(key, _)| *key != page_param)
            .cloned()
            .collect();

        Self {
            base_url: base_url.into(),
            params,
            page_param,
            page,
        }
    }

    /// Query parameters as sent: extra params, then the page number
    pub fn query(&self) -> QueryParams {
        let mut query = self.params.clone();
        query.push((self.page_param.clone(), self.page.to_string()));
        query
    }

    /// Full URL of this request, keeping any query the base URL already had
    pub fn url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in self.query() {
                pairs.append_pair(&key, &value);
            }
        }
        Ok(url)
    }
}

/// One parsed upstream page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResponse {
    /// Records on this page, in upstream order
    pub results: Vec<JsonValue>,
    /// Total page count, when the upstream reports one and it is configured
    pub total_pages: Option<u32>,
}

impl PageResponse {
    /// Parse a page body.
    ///
    /// A missing or `null` results field is an empty page. Any other
    /// non-array value means the upstream changed shape under us.
    pub fn from_body(body: &JsonValue, config: &AggregatorConfig) -> Result<Self> {
        let results = match json_path(body, &config.results_field) {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::Array(items)) => items.clone(),
            Some(other) => {
                return Err(Error::decode(format!(
                    "field '{}' is not an array (found {})",
                    config.results_field,
                    json_kind(other)
                )))
            }
        };

        let total_pages = match &config.stop_condition {
            StopCondition::TotalPages { path } => json_path(body, path).and_then(as_page_count),
            StopCondition::EmptyPage => None,
        };

        Ok(Self {
            results,
            total_pages,
        })
    }

    /// Check if the page has no records
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Extra stop conditions on top of "empty page" and "max pages"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StopCondition {
    /// Stop only on an empty page (or the page bound)
    #[default]
    EmptyPage,

    /// Also stop once the page number reaches a total-pages field
    TotalPages {
        /// Dotted path to the total pages field
        path: String,
    },
}

impl StopCondition {
    /// Create a total pages stop condition
    pub fn total_pages(path: impl Into<String>) -> Self {
        Self::TotalPages { path: path.into() }
    }
}

/// Why an aggregation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last page had no records
    EmptyPage,
    /// The configured page bound was reached
    MaxPages,
    /// The upstream said this was the last page
    LastPage,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::EmptyPage => "empty page",
            Self::MaxPages => "page limit reached",
            Self::LastPage => "last page reported by upstream",
        };
        f.write_str(reason)
    }
}

/// Aggregation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Query parameter name for the page number
    pub page_param: String,
    /// First page number. Zero behaves like one.
    pub start_page: u32,
    /// Hard bound on requests per aggregation. Zero behaves like one.
    pub max_pages: u32,
    /// Dotted path to the results array in each page body
    pub results_field: String,
    /// Additional stop condition
    pub stop_condition: StopCondition,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            page_param: "page".to_string(),
            start_page: 1,
            max_pages: 10,
            results_field: "results".to_string(),
            stop_condition: StopCondition::EmptyPage,
        }
    }
}

impl AggregatorConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page parameter name
    #[must_use]
    pub fn with_page_param(mut self, param: impl Into<String>) -> Self {
        self.page_param = param.into();
        self
    }

    /// Set the first page number
    #[must_use]
    pub fn with_start_page(mut self, page: u32) -> Self {
        self.start_page = page;
        self
    }

    /// Set the page bound
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the results field path
    #[must_use]
    pub fn with_results_field(mut self, field: impl Into<String>) -> Self {
        self.results_field = field.into();
        self
    }

    /// Set the extra stop condition
    #[must_use]
    pub fn with_stop_condition(mut self, condition: StopCondition) -> Self {
        self.stop_condition = condition;
        self
    }
}

/// Tracks progress during one aggregation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Page number of the next request
    pub page: u32,
    /// Pages fetched so far
    pub pages_fetched: u32,
    /// Records fetched so far
    pub records_fetched: usize,
}

impl PaginationState {
    /// Create state starting at a page
    pub fn starting_at(page: u32) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }

    /// Record a fetched page
    pub fn record_page(&mut self, records: usize) {
        self.pages_fetched += 1;
        self.records_fetched += records;
    }

    /// Increment page number. Saturates at `u32::MAX`; [`check_stop`]
    /// ends the aggregation before that page would be requested twice.
    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }
}

/// Decide whether to stop after the page just recorded in `state`
pub fn check_stop(
    config: &AggregatorConfig,
    page: &PageResponse,
    state: &PaginationState,
) -> Option<StopReason> {
    if page.is_empty() {
        return Some(StopReason::EmptyPage);
    }
    if state.pages_fetched >= config.max_pages.max(1) || state.page == u32::MAX {
        return Some(StopReason::MaxPages);
    }
    if let Some(total) = page.total_pages {
        if state.page >= total {
            return Some(StopReason::LastPage);
        }
    }
    None
}

fn as_page_count(value: &JsonValue) -> Option<u32> {
    match value {
        JsonValue::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
