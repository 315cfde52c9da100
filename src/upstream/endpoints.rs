//! Endpoint catalogue
//!
//! The fixed set of inbound endpoints, the parameters each accepts, and how
//! inbound query strings are validated before anything goes upstream.

use super::projection::Projection;
use crate::error::{Error, Result};
use crate::types::{QueryParams, StringMap};

/// Largest day offset accepted for showtime lookups
pub const MAX_DAY_OFFSET: i64 = 31;

/// Inbound endpoints, each bound to one configured upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EndpointKind {
    /// Showtimes of one cinema on one day
    Showtimes,
    /// Cinemas around a location
    Cinemas,
    /// Showtimes of one movie around a location on one day
    MovieShowtimes,
    /// One page of movie metadata search results
    MovieSearch,
}

/// How an endpoint pages through its upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// Aggregate every page
    All,
    /// Fetch only the page the caller asked for
    Single,
}

/// Kind of value a parameter carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Any non-blank string
    Text,
    /// Integer number of days from today, 0..=31
    DayOffset,
    /// Integer page number, at least 1
    PageNumber,
}

/// One inbound query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name, identical inbound and upstream
    pub name: &'static str,
    /// Value kind
    pub kind: ParamKind,
    /// Value used when the parameter is absent. `None` makes it required.
    pub default: Option<&'static str>,
}

impl ParamSpec {
    const fn required(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            default: None,
        }
    }

    const fn optional(name: &'static str, kind: ParamKind, default: &'static str) -> Self {
        Self {
            name,
            kind,
            default: Some(default),
        }
    }

    /// Whether the caller must supply this parameter
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

const SHOWTIMES_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("cinemaId", ParamKind::Text),
    ParamSpec::optional("day", ParamKind::DayOffset, "0"),
];

const CINEMAS_PARAMS: &[ParamSpec] = &[ParamSpec::required("location", ParamKind::Text)];

const MOVIE_SHOWTIMES_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("movieId", ParamKind::Text),
    ParamSpec::required("location", ParamKind::Text),
    ParamSpec::optional("day", ParamKind::DayOffset, "0"),
];

const MOVIE_SEARCH_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("query", ParamKind::Text),
    ParamSpec::required("page", ParamKind::PageNumber),
];

impl EndpointKind {
    /// Every endpoint
    pub const ALL: [EndpointKind; 4] = [
        EndpointKind::Showtimes,
        EndpointKind::Cinemas,
        EndpointKind::MovieShowtimes,
        EndpointKind::MovieSearch,
    ];

    /// Key used in the configuration file
    pub fn name(self) -> &'static str {
        match self {
            Self::Showtimes => "showtimes",
            Self::Cinemas => "cinemas",
            Self::MovieShowtimes => "movie_showtimes",
            Self::MovieSearch => "movie_search",
        }
    }

    /// Look up an endpoint by its configuration key
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Inbound route
    pub fn route(self) -> &'static str {
        match self {
            Self::Showtimes => "/api/showtimes",
            Self::Cinemas => "/api/cinemas",
            Self::MovieShowtimes => "/api/movie-showtimes",
            Self::MovieSearch => "/api/movies/search",
        }
    }

    /// Human-readable name used in client-facing error messages
    pub fn label(self) -> &'static str {
        match self {
            Self::Showtimes => "showtimes",
            Self::Cinemas => "cinemas",
            Self::MovieShowtimes => "movie showtimes",
            Self::MovieSearch => "movies",
        }
    }

    /// Accepted parameters
    pub fn params(self) -> &'static [ParamSpec] {
        match self {
            Self::Showtimes => SHOWTIMES_PARAMS,
            Self::Cinemas => CINEMAS_PARAMS,
            Self::MovieShowtimes => MOVIE_SHOWTIMES_PARAMS,
            Self::MovieSearch => MOVIE_SEARCH_PARAMS,
        }
    }

    /// Paging mode
    pub fn paging(self) -> Paging {
        match self {
            Self::MovieSearch => Paging::Single,
            _ => Paging::All,
        }
    }

    /// Record projection applied to upstream results
    pub fn projection(self) -> Projection {
        match self {
            Self::Showtimes | Self::MovieShowtimes => Projection::Showtimes,
            Self::Cinemas => Projection::Cinemas,
            Self::MovieSearch => Projection::Movies,
        }
    }
}

impl std::fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Inbound parameters after validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedQuery {
    /// Parameters forwarded upstream, in declaration order
    pub params: QueryParams,
    /// Requested page, for single-page endpoints
    pub page: Option<u32>,
}

/// Validate an inbound query string against an endpoint's parameters.
///
/// Unknown parameters are ignored. Blank values count as missing.
pub fn validate_query(kind: EndpointKind, raw: &StringMap) -> Result<ValidatedQuery> {
    let mut validated = ValidatedQuery::default();

    for spec in kind.params() {
        let supplied = raw
            .get(spec.name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty());

        let value = match (supplied, spec.default) {
            (Some(value), _) => value,
            (None, Some(default)) => default,
            (None, None) => return Err(Error::missing_param(spec.name)),
        };

        match spec.kind {
            ParamKind::Text => validated
                .params
                .push((spec.name.to_string(), value.to_string())),
            ParamKind::DayOffset => {
                let day = parse_day_offset(spec.name, value)?;
                validated
                    .params
                    .push((spec.name.to_string(), day.to_string()));
            }
            ParamKind::PageNumber => validated.page = Some(parse_page_number(spec.name, value)?),
        }
    }

    Ok(validated)
}

fn parse_day_offset(name: &str, value: &str) -> Result<i64> {
    match value.parse::<i64>() {
        Ok(day) if (0..=MAX_DAY_OFFSET).contains(&day) => Ok(day),
        _ => Err(Error::invalid_param(
            name,
            format!("expected a day offset between 0 and {MAX_DAY_OFFSET}, got '{value}'"),
        )),
    }
}

fn parse_page_number(name: &str, value: &str) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(Error::invalid_param(
            name,
            format!("expected a page number of at least 1, got '{value}'"),
        )),
    }
}
