//! Lookup service: cache-aside over a [`CacheStore`] and a [`Geocoder`].
//!
//! Hit:  cache → decode → done
//! Miss: upstream → decode → write cache → done
//!
//! Every failure is terminal. A broken cache never falls back to upstream, and
//! concurrent misses for the same city each go upstream (last write wins).

use std::sync::Arc;
use std::time::Duration;

use super::cache::{CacheError, CacheStore, CACHE_TTL};
use super::providers::Geocoder;
use super::types::{decode_records, encode_records, LookupError, LookupResult};

pub struct LookupService {
    store: Arc<dyn CacheStore>,
    geocoder: Arc<dyn Geocoder>,
    ttl: Duration,
}

impl LookupService {
    pub fn new(store: Arc<dyn CacheStore>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            store,
            geocoder,
            ttl: CACHE_TTL,
        }
    }

    /// Look up `city` exactly as given; the cache key is not normalized.
    pub async fn lookup(&self, city: &str) -> Result<LookupResult, LookupError> {
        let cached = self
            .store
            .get(city)
            .await
            .map_err(LookupError::CacheUnavailable)?;

        if let Some(bytes) = cached {
            let records = decode_records(&bytes).map_err(|source| LookupError::CacheCorrupt {
                key: city.to_string(),
                source,
            })?;
            tracing::debug!(city = %city, count = records.len(), "cache hit");
            return Ok(LookupResult {
                records,
                from_cache: true,
            });
        }

        let records = self.geocoder.search(city).await?;
        tracing::debug!(city = %city, count = records.len(), "fetched from upstream");

        let bytes = encode_records(&records)
            .map_err(|e| LookupError::CacheWriteFailed(CacheError::Encode(e)))?;
        self.store
            .set(city, bytes, self.ttl)
            .await
            .map_err(LookupError::CacheWriteFailed)?;

        Ok(LookupResult {
            records,
            from_cache: false,
        })
    }
}
