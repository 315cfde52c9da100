//! Common types used throughout cine-relay
//!
//! Shared type aliases and small helpers for poking at loosely-typed
//! upstream JSON.

use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

/// Ordered query parameters. Order is preserved on the wire.
pub type QueryParams = Vec<(String, String)>;

// ============================================================================
// JSON Helpers
// ============================================================================

/// Follow a dotted path (`data.results`, optionally prefixed with `$.`)
/// through nested JSON objects.
pub fn json_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        match current {
            JsonValue::Object(map) => current = map.get(part)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Render a scalar JSON value as a string. Upstreams are inconsistent about
/// whether ids and counts are numbers or strings.
pub fn scalar_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
