//! Core types for the lookup subsystem.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::cache::CacheError;

/// One geocoding result as returned by Nominatim's `/search?format=json`.
///
/// Field names and types are the provider's contract and are passed through
/// unchanged. Fields the provider omits or sends as `null` decode to their
/// zero value; extra fields it sends are dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub place_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub licence: String,
    #[serde(deserialize_with = "null_as_default")]
    pub osm_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub osm_id: i64,
    /// South, north, west, east bounds as decimal strings.
    #[serde(deserialize_with = "null_as_default")]
    pub boundingbox: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub lat: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lon: String,
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub class: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub place_type: String,
    /// Relative ranking; no fixed range.
    #[serde(deserialize_with = "null_as_default")]
    pub importance: f64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Records for one query plus where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    pub records: Vec<LocationRecord>,
    pub from_cache: bool,
}

/// Every way a lookup can fail. None of these are retried.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("cache store unavailable: {0}")]
    CacheUnavailable(#[source] CacheError),

    #[error("cached entry for '{key}' is corrupt: {source}")]
    CacheCorrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("upstream geocoder unreachable: {0}")]
    UpstreamUnreachable(#[source] reqwest::Error),

    #[error("upstream geocoder answered HTTP {0}")]
    UpstreamStatus(u16),

    #[error("upstream geocoder sent a malformed body: {0}")]
    UpstreamMalformed(#[source] serde_json::Error),

    #[error("failed to write cache entry: {0}")]
    CacheWriteFailed(#[source] CacheError),
}

/// Encode records into the byte form stored in the cache.
pub fn encode_records(records: &[LocationRecord]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(records)
}

/// Decode records previously written by [`encode_records`].
pub fn decode_records(bytes: &[u8]) -> Result<Vec<LocationRecord>, serde_json::Error> {
    serde_json::from_slice(bytes)
}
