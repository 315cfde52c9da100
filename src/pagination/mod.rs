//! Pagination module
//!
//! Page-number aggregation over upstream JSON APIs.
//!
//! # Overview
//!
//! A [`PageAggregator`] issues `GET <base_url>?<params>&page=N` for
//! N = 1, 2, 3, … and concatenates the `results` array of every page.
//! It stops on the first empty page, when the upstream reports the last
//! page (if configured), or after `max_pages` requests. Any failed page
//! fails the whole aggregation.

mod aggregator;
mod types;

pub use aggregator::{PageAggregator, PageSource};
pub use types::{
    check_stop, AggregatorConfig, PageRequest, PageResponse, PaginationState, StopCondition,
    StopReason,
};
