//! Movie metadata search records

use super::projection::UpstreamRecord;
use crate::types::{scalar_to_string, JsonValue};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Search result as the metadata API sends it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamMovieResult {
    /// Metadata API movie id
    #[serde(default)]
    pub id: Option<JsonValue>,
    /// Localized title
    #[serde(default)]
    pub title: Option<String>,
    /// `YYYY-MM-DD`, or empty when unknown
    #[serde(default)]
    pub release_date: Option<String>,
    /// Poster image path relative to the image CDN
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Synopsis
    #[serde(default)]
    pub overview: Option<String>,
    /// Average user rating out of 10
    #[serde(default)]
    pub vote_average: Option<f64>,
}

/// Client-facing movie summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    /// Movie id as a string
    pub id: String,
    /// Localized title
    pub title: Option<String>,
    /// Release date, absent when unknown
    pub release_date: Option<String>,
    /// Release year
    pub year: Option<i32>,
    /// Poster image path
    pub poster_path: Option<String>,
    /// Synopsis
    pub overview: Option<String>,
    /// Average user rating out of 10
    pub rating: Option<f64>,
}

impl UpstreamRecord for UpstreamMovieResult {
    type Projected = MovieSummary;

    fn project(self) -> Option<MovieSummary> {
        let id = self.id.as_ref().and_then(scalar_to_string)?;
        // The metadata API sends "" for unknown release dates.
        let release_date = self.release_date.filter(|d| !d.is_empty());
        let year = release_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(|d| d.year());

        Some(MovieSummary {
            id,
            title: self.title,
            release_date,
            year,
            poster_path: self.poster_path,
            overview: self.overview,
            rating: self.vote_average,
        })
    }
}
