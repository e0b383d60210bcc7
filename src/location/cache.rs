//! Cache stores behind the lookup service.
//!
//! `CachingStore` keeps entries in Redis and lets Redis expire them.
//! `PassthroughStore` never holds anything, so every lookup goes upstream.

use async_trait::async_trait;
use redis::aio::{ConnectionLike, ConnectionManager};
use redis::AsyncCommands;
use std::time::Duration;
use thiserror::Error;

/// How long an entry lives before the store forgets it.
pub const CACHE_TTL: Duration = Duration::from_secs(15);

/// Store-level failures. A missing key is not an error.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("encoding entry: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0}")]
    Backend(String),
}

/// Key/value store with per-key expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// `Ok(None)` when the key does not exist or has expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    /// Short label for startup logs.
    fn name(&self) -> &'static str;
}

// ─── Redis ───────────────────────────────────────────────────────

/// Redis-backed store. The connection is cloned per command; with the default
/// `ConnectionManager` every clone multiplexes onto one reconnecting socket,
/// so one instance serves every request.
#[derive(Clone)]
pub struct CachingStore<C = ConnectionManager> {
    conn: C,
}

impl CachingStore {
    /// Open a connection to `url` (e.g. `redis://:secret@host:6379/0`).
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

impl<C> CachingStore<C>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    /// Wrap an already established connection.
    pub fn with_connection(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> CacheStore for CachingStore<C>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // Redis rejects a zero expiry.
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

// ─── Passthrough ─────────────────────────────────────────────────

/// Store that is always empty. Writes succeed and are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughStore;

#[async_trait]
impl CacheStore for PassthroughStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }
}
