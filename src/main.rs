use clap::Parser;
use geocache::config::{CacheBackend, Config};
use geocache::location::{CacheStore, CachingStore, LookupService, NominatimClient, PassthroughStore};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    // ── Cache store ─────────────────────────────────────────────

    let backend = config.cache_backend().unwrap_or_else(|e| {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(1);
    });

    let store: Arc<dyn CacheStore> = match backend {
        CacheBackend::Redis(url) => match CachingStore::connect(&url).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!(error = %e, "cannot connect to redis");
                std::process::exit(1);
            }
        },
        CacheBackend::Passthrough => Arc::new(PassthroughStore),
    };

    // ── Lookup service ──────────────────────────────────────────

    let geocoder = match NominatimClient::new(config.upstream_url.clone()) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "cannot build upstream HTTP client");
            std::process::exit(1);
        }
    };
    tracing::info!(
        cache = store.name(),
        upstream = %geocoder.endpoint(),
        "starting geocache"
    );
    let lookup = LookupService::new(store, Arc::new(geocoder));

    // ── Serve ───────────────────────────────────────────────────

    if let Err(e) = geocache::server::start(&config.host, config.port, lookup).await {
        tracing::error!(host = %config.host, port = config.port, error = %e, "server error");
        std::process::exit(1);
    }

    tracing::info!("server stopped, cache connection released");
}
