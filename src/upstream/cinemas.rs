//! Cinema records

use super::projection::UpstreamRecord;
use crate::types::{scalar_to_string, JsonValue};
use serde::{Deserialize, Serialize};

/// Cinema record as the ticketing API sends it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamCinema {
    /// Ticketing-site cinema code, preferred over `id`
    #[serde(default)]
    pub internal_id: Option<JsonValue>,
    /// Fallback identifier
    #[serde(default)]
    pub id: Option<JsonValue>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Postal address
    #[serde(default)]
    pub location: Option<UpstreamLocation>,
}

/// Address block of an upstream cinema
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamLocation {
    /// Street address
    #[serde(default)]
    pub address: Option<String>,
    /// Postal code, sometimes sent as a number
    #[serde(default)]
    pub zip: Option<JsonValue>,
    /// City name
    #[serde(default)]
    pub city: Option<String>,
}

/// Client-facing cinema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cinema {
    /// Cinema identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Street address
    pub address: Option<String>,
    /// Postal code
    pub postal_code: Option<String>,
    /// City name
    pub city: Option<String>,
}

impl UpstreamRecord for UpstreamCinema {
    type Projected = Cinema;

    fn project(self) -> Option<Cinema> {
        let id = self
            .internal_id
            .as_ref()
            .and_then(scalar_to_string)
            .or_else(|| self.id.as_ref().and_then(scalar_to_string))?;
        let name = self.name.filter(|n| !n.trim().is_empty())?;
        let location = self.location.unwrap_or_default();

        Some(Cinema {
            id,
            name,
            address: location.address,
            postal_code: location.zip.as_ref().and_then(scalar_to_string),
            city: location.city,
        })
    }
}
