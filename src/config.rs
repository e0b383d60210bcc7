//! Process configuration, read once at startup from flags or environment.

use clap::Parser;
use thiserror::Error;

use crate::location::NOMINATIM_SEARCH_URL;

/// Caching geocoding proxy for Nominatim city searches.
///
/// Serves `GET /api?city=<name>` and caches each answer in Redis for 15 seconds.
///
/// Examples:
///   REDIS_URL=redis://:secret@cache:6379/0 PORT=8080 geocache
///   LOCAL=true REDIS_URL=localhost geocache
///   geocache --no-cache --port 3000
#[derive(Parser, Debug, Clone)]
#[command(name = "geocache", version, about, long_about = None)]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind. A leading ':' is accepted (":8080").
    #[arg(long, env = "PORT", default_value = "8080", value_parser = parse_port)]
    pub port: u16,

    /// Redis connection URL, or a bare host name with --local.
    #[arg(long, env = "REDIS_URL")]
    pub redis_url: Option<String>,

    /// Local development: connect to <REDIS_URL>:6379 without a password.
    #[arg(long, env = "LOCAL", value_parser = parse_switch)]
    pub local: bool,

    /// Disable caching; every request goes upstream.
    #[arg(long, env = "NO_CACHE", value_parser = parse_switch)]
    pub no_cache: bool,

    /// Nominatim-compatible search endpoint.
    #[arg(long, env = "NOMINATIM_URL", default_value = NOMINATIM_SEARCH_URL)]
    pub upstream_url: String,
}

/// Which cache store to build at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    Redis(String),
    Passthrough,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("REDIS_URL is not set; pass --redis-url or use --no-cache")]
    MissingRedisUrl,
}

impl Config {
    pub fn cache_backend(&self) -> Result<CacheBackend, ConfigError> {
        if self.no_cache {
            return Ok(CacheBackend::Passthrough);
        }

        if self.local {
            let host = self
                .redis_url
                .as_deref()
                .filter(|h| !h.is_empty())
                .unwrap_or("localhost");
            return Ok(CacheBackend::Redis(format!("redis://{}:6379/0", host)));
        }

        match self.redis_url.as_deref() {
            Some(url) if !url.is_empty() => Ok(CacheBackend::Redis(url.to_string())),
            _ => Err(ConfigError::MissingRedisUrl),
        }
    }
}

fn parse_port(s: &str) -> Result<u16, String> {
    let digits = s.trim().trim_start_matches(':');
    digits
        .parse()
        .map_err(|_| format!("Invalid port '{}'. Use a number such as 8080 or :8080.", s))
}

/// Only "true" switches a flag on from the environment; anything else is off.
fn parse_switch(s: &str) -> Result<bool, String> {
    Ok(s.trim().eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches};

    fn config(args: &[&str]) -> Config {
        let mut argv = vec!["geocache"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_port_forms() {
        assert_eq!(parse_port("8080"), Ok(8080));
        assert_eq!(parse_port(":8080"), Ok(8080));
        assert!(parse_port("http").is_err());
        assert!(parse_port("70000").is_err());
    }

    #[test]
    fn test_parse_switch_never_fails() {
        assert_eq!(parse_switch("true"), Ok(true));
        assert_eq!(parse_switch("TRUE"), Ok(true));
        for off in ["false", "1", "yes", "on", ""] {
            assert_eq!(parse_switch(off), Ok(false), "{:?}", off);
        }
    }

    #[test]
    fn test_local_env_value_other_than_true_is_off() {
        // A variable only this test touches, so parallel tests are unaffected.
        std::env::set_var("GEOCACHE_TEST_LOCAL_SWITCH", "1");
        let cmd = Config::command().mut_arg("local", |a| a.env("GEOCACHE_TEST_LOCAL_SWITCH"));
        let matches = cmd.try_get_matches_from(["geocache"]).unwrap();
        let cfg = Config::from_arg_matches(&matches).unwrap();
        assert!(!cfg.local);

        std::env::set_var("GEOCACHE_TEST_LOCAL_SWITCH", "true");
        let cmd = Config::command().mut_arg("local", |a| a.env("GEOCACHE_TEST_LOCAL_SWITCH"));
        let matches = cmd.try_get_matches_from(["geocache"]).unwrap();
        assert!(Config::from_arg_matches(&matches).unwrap().local);
        std::env::remove_var("GEOCACHE_TEST_LOCAL_SWITCH");
    }

    #[test]
    fn test_local_flag_without_value() {
        assert!(config(&["--local"]).local);
    }

    #[test]
    fn test_explicit_flags() {
        let cfg = config(&[
            "--host", "127.0.0.1",
            "--port", ":9000",
            "--upstream-url", "http://localhost:7070/search",
        ]);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.upstream_url, "http://localhost:7070/search");
    }

    #[test]
    fn test_backend_no_cache_wins() {
        let cfg = config(&["--no-cache", "--redis-url", "redis://cache:6379"]);
        assert_eq!(cfg.cache_backend().unwrap(), CacheBackend::Passthrough);
    }

    #[test]
    fn test_backend_from_url() {
        let mut cfg = config(&["--redis-url", "redis://:pw@cache:6380/2"]);
        cfg.local = false;
        cfg.no_cache = false;
        assert_eq!(
            cfg.cache_backend().unwrap(),
            CacheBackend::Redis("redis://:pw@cache:6380/2".into())
        );
    }

    #[test]
    fn test_backend_local_host() {
        let mut cfg = config(&["--local", "--redis-url", "redis-dev"]);
        cfg.no_cache = false;
        assert_eq!(
            cfg.cache_backend().unwrap(),
            CacheBackend::Redis("redis://redis-dev:6379/0".into())
        );

        cfg.redis_url = None;
        assert_eq!(
            cfg.cache_backend().unwrap(),
            CacheBackend::Redis("redis://localhost:6379/0".into())
        );
    }

    #[test]
    fn test_backend_missing_url() {
        let mut cfg = config(&[]);
        cfg.redis_url = None;
        cfg.local = false;
        cfg.no_cache = false;
        assert!(matches!(cfg.cache_backend(), Err(ConfigError::MissingRedisUrl)));
    }
}
