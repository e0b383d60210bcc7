//! Geocoding lookups for the proxy.
//!
//! Wraps an upstream Nominatim search in a short-lived cache. The cache is a
//! pluggable [`CacheStore`]: Redis in production, or a passthrough that always
//! misses.

pub mod cache;
pub mod providers;
pub mod resolver;
pub mod types;

pub use cache::{CacheError, CacheStore, CachingStore, PassthroughStore, CACHE_TTL};
pub use providers::{Geocoder, NominatimClient, NOMINATIM_SEARCH_URL};
pub use resolver::LookupService;
pub use types::{LocationRecord, LookupError, LookupResult};
