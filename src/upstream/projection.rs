//! Typed projections
//!
//! Upstream records are loosely typed and carry far more than the browser
//! needs. Each projection deserializes a record into an upstream-shaped
//! struct and keeps only the client-facing subset.

use super::cinemas::UpstreamCinema;
use super::movies::UpstreamMovieResult;
use super::showtimes::UpstreamShowtimeRecord;
use crate::types::JsonValue;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// An upstream record that can be reduced to its client-facing form
pub trait UpstreamRecord: DeserializeOwned {
    /// Client-facing shape
    type Projected: Serialize;

    /// Keep the useful subset. `None` drops the record.
    fn project(self) -> Option<Self::Projected>;
}

/// Which projection an endpoint applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Movies with their sessions
    Showtimes,
    /// Cinema listings
    Cinemas,
    /// Movie metadata search results
    Movies,
}

impl Projection {
    /// Project every record, preserving order
    pub fn apply(self, records: Vec<JsonValue>) -> Vec<JsonValue> {
        match self {
            Self::Showtimes => project_all::<UpstreamShowtimeRecord>(records),
            Self::Cinemas => project_all::<UpstreamCinema>(records),
            Self::Movies => project_all::<UpstreamMovieResult>(records),
        }
    }
}

/// Project records of one shape. Records that do not fit are logged and skipped.
pub fn project_all<R: UpstreamRecord>(records: Vec<JsonValue>) -> Vec<JsonValue> {
    let total = records.len();
    let projected: Vec<JsonValue> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let record: R = match serde_json::from_value(record) {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping upstream record {index}: {e}");
                    return None;
                }
            };
            let projected = record.project()?;
            serde_json::to_value(projected)
                .map_err(|e| warn!("Skipping upstream record {index}: {e}"))
                .ok()
        })
        .collect();

    if projected.len() < total {
        warn!("Dropped {} of {} upstream records", total - projected.len(), total);
    }
    projected
}

/// Deserialize `null` as the type's default. Upstreams send `null` for
/// empty lists and objects.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
