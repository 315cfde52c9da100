//! Showtime records
//!
//! The ticketing API returns one record per movie, with that movie's
//! sessions grouped by diffusion version (original, dubbed, ...).

use super::projection::{null_as_default, UpstreamRecord};
use crate::types::{scalar_to_string, JsonValue};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Showtime record as the ticketing API sends it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamShowtimeRecord {
    /// Movie being screened; records without one are skipped
    #[serde(default)]
    pub movie: Option<UpstreamMovie>,
    /// Sessions keyed by diffusion version
    #[serde(default, deserialize_with = "null_as_default")]
    pub showtimes: BTreeMap<String, Option<Vec<UpstreamSession>>>,
}

/// Movie block of a showtime record
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamMovie {
    /// Ticketing-site movie id
    #[serde(default)]
    pub internal_id: Option<JsonValue>,
    /// Display title
    #[serde(default)]
    pub title: Option<String>,
    /// Runtime as sent, passed through unchanged
    #[serde(default)]
    pub runtime: Option<JsonValue>,
    /// Poster image
    #[serde(default)]
    pub poster: Option<UpstreamPoster>,
    /// Genre tags
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<UpstreamGenre>,
}

/// Poster reference
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamPoster {
    /// Image URL
    #[serde(default)]
    pub url: Option<String>,
}

/// Genre tag
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamGenre {
    /// Localized genre label
    #[serde(default)]
    pub translate: Option<String>,
}

/// One upstream screening
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamSession {
    /// Local ISO date-time or RFC 3339 timestamp
    #[serde(default)]
    pub starts_at: Option<String>,
    /// Projection formats (`DIGITAL`, `IMAX`, ...)
    #[serde(default, deserialize_with = "null_as_default")]
    pub projection: Vec<String>,
}

/// A movie and its sessions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieShowtimes {
    /// Ticketing-site movie id
    pub movie_id: Option<String>,
    /// Display title
    pub title: Option<String>,
    /// Runtime as sent upstream
    pub runtime: Option<JsonValue>,
    /// Poster image URL
    pub poster_url: Option<String>,
    /// Genre labels
    pub genres: Vec<String>,
    /// Screenings in chronological order
    pub sessions: Vec<Session>,
}

/// One screening
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Start time as sent upstream
    pub starts_at: String,
    /// `HH:MM`, when the start time parses
    pub time: Option<String>,
    /// Diffusion version (original, dubbed, ...)
    pub version: String,
    /// Projection formats
    pub formats: Vec<String>,
}

impl UpstreamRecord for UpstreamShowtimeRecord {
    type Projected = MovieShowtimes;

    fn project(self) -> Option<MovieShowtimes> {
        let movie = self.movie?;

        let mut sessions: Vec<Session> = self
            .showtimes
            .into_iter()
            .flat_map(|(version, sessions)| {
                sessions
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(move |session| {
                        let starts_at = session.starts_at?;
                        Some(Session {
                            time: clock_time(&starts_at),
                            starts_at,
                            version: version.clone(),
                            formats: session.projection,
                        })
                    })
            })
            .collect();
        sessions.sort_by(|a, b| {
            session_order(&a.starts_at).cmp(&session_order(&b.starts_at))
        });

        Some(MovieShowtimes {
            movie_id: movie.internal_id.as_ref().and_then(scalar_to_string),
            title: movie.title,
            runtime: movie.runtime,
            poster_url: movie.poster.and_then(|p| p.url),
            genres: movie.genres.into_iter().filter_map(|g| g.translate).collect(),
            sessions,
        })
    }
}

/// Chronological sort key. Offset timestamps compare by their UTC instant,
/// local ones by wall clock. Unparsable values go last, in text order.
fn session_order(starts_at: &str) -> (bool, Option<NaiveDateTime>, &str) {
    let instant = NaiveDateTime::parse_from_str(starts_at, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(starts_at)
                .ok()
                .map(|dt| dt.naive_utc())
        });
    (instant.is_none(), instant, starts_at)
}

/// `HH:MM` from a local ISO date-time, or an RFC 3339 timestamp in its own offset
fn clock_time(starts_at: &str) -> Option<String> {
    if let Ok(local) = NaiveDateTime::parse_from_str(starts_at, "%Y-%m-%dT%H:%M:%S") {
        return Some(local.format("%H:%M").to_string());
    }
    DateTime::parse_from_rfc3339(starts_at)
        .ok()
        .map(|dt| dt.format("%H:%M").to_string())
}

#[cfg(test)]
mod clock_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clock_time_formats() {
        assert_eq!(clock_time("2024-05-01T14:05:00"), Some("14:05".to_string()));
        assert_eq!(
            clock_time("2024-05-01T21:30:00+02:00"),
            Some("21:30".to_string())
        );
        assert_eq!(clock_time("tomorrow"), None);
    }

    #[test]
    fn test_sessions_sorted_by_instant_across_offsets() {
        let record: UpstreamShowtimeRecord = serde_json::from_value(json!({
            "movie": {"internalId": 1, "title": "Dune"},
            "showtimes": {
                "original": [
                    {"startsAt": "2024-05-01T20:00:00+00:00"},
                    {"startsAt": "sometime"}
                ],
                "dubbed": [{"startsAt": "2024-05-01T21:30:00+02:00"}]
            }
        }))
        .unwrap();

        let starts: Vec<String> = record
            .project()
            .unwrap()
            .sessions
            .into_iter()
            .map(|s| s.starts_at)
            .collect();
        assert_eq!(
            starts,
            vec![
                "2024-05-01T21:30:00+02:00",
                "2024-05-01T20:00:00+00:00",
                "sometime"
            ]
        );
    }
}
