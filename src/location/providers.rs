//! Upstream geocoding provider: OpenStreetMap Nominatim.

use async_trait::async_trait;
use reqwest::Client;

use super::types::{decode_records, LocationRecord, LookupError};

pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Nominatim's usage policy requires an identifying agent.
const USER_AGENT: &str = concat!("geocache/", env!("CARGO_PKG_VERSION"), " (caching geocoding proxy)");

/// Anything that turns a free-text place query into location records.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<LocationRecord>, LookupError>;
}

/// HTTP client for a Nominatim-compatible `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    endpoint: String,
}

impl NominatimClient {
    /// Build a client for `endpoint`. Fails only if the TLS backend cannot
    /// be initialised.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn search(&self, query: &str) -> Result<Vec<LocationRecord>, LookupError> {
        // `query` percent-encodes the city, so spaces and '&' survive intact.
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json")])
            .send()
            .await
            .map_err(LookupError::UpstreamUnreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::UpstreamStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(LookupError::UpstreamUnreachable)?;

        decode_records(&body).map_err(LookupError::UpstreamMalformed)
    }
}
