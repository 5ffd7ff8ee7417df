//! # Server Configuration
//!
//! Defaults suit a local run; every field can be overridden from the
//! environment. Malformed overrides are logged and ignored.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};
use warden_shield::FilterConfig;

/// Complete server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// HTTP listener.
    pub http: HttpConfig,
    /// Backing store.
    pub store: StoreConfig,
    /// Filter sizing.
    pub filter: FilterConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
        }
    }
}

impl HttpConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Backing store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of `user_N` keys to seed on startup.
    pub seed_count: usize,
    /// Per-lookup timeout in milliseconds.
    pub lookup_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_count: 1_000_000,
            lookup_timeout_ms: 5_000,
        }
    }
}

impl StoreConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

impl ServerConfig {
    /// Load configuration from `WARDEN_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// The expected item count follows the seed count unless set explicitly.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        override_from(&lookup, "WARDEN_HOST", &mut config.http.host);
        override_from(&lookup, "WARDEN_PORT", &mut config.http.port);
        override_from(&lookup, "WARDEN_SEED_COUNT", &mut config.store.seed_count);
        override_from(
            &lookup,
            "WARDEN_LOOKUP_TIMEOUT_MS",
            &mut config.store.lookup_timeout_ms,
        );

        config.filter.expected_items = config.store.seed_count;
        override_from(
            &lookup,
            "WARDEN_EXPECTED_ITEMS",
            &mut config.filter.expected_items,
        );
        override_from(&lookup, "WARDEN_TARGET_FPR", &mut config.filter.target_fpr);

        config
    }
}

fn override_from<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => {
            info!(key, value = ?value, "Loaded override from environment");
            *target = value;
        }
        Err(_) => warn!(key, raw = %raw, "Ignoring malformed override"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));

        assert_eq!(config.http.port, 8080);
        assert_eq!(config.store.seed_count, 1_000_000);
        assert_eq!(config.filter.expected_items, 1_000_000);
        assert_eq!(config.filter.target_fpr, 0.01);
        assert_eq!(config.store.lookup_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_overrides_applied() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("WARDEN_HOST", "127.0.0.1"),
            ("WARDEN_PORT", "9090"),
            ("WARDEN_SEED_COUNT", "5000"),
            ("WARDEN_TARGET_FPR", "0.001"),
            ("WARDEN_LOOKUP_TIMEOUT_MS", "250"),
        ]));

        assert_eq!(config.http.addr(), "127.0.0.1:9090".parse().unwrap());
        assert_eq!(config.store.seed_count, 5000);
        assert_eq!(config.filter.expected_items, 5000);
        assert_eq!(config.filter.target_fpr, 0.001);
        assert_eq!(config.store.lookup_timeout_ms, 250);
    }

    #[test]
    fn test_expected_items_can_differ_from_seed() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("WARDEN_SEED_COUNT", "1000"),
            ("WARDEN_EXPECTED_ITEMS", "2000"),
        ]));

        assert_eq!(config.filter.expected_items, 2000);
    }

    #[test]
    fn test_malformed_override_ignored() {
        let config = ServerConfig::from_lookup(lookup(&[("WARDEN_PORT", "not-a-port")]));
        assert_eq!(config.http.port, 8080);
    }

    #[test]
    fn test_invalid_fpr_is_loaded_but_fails_validation() {
        let config = ServerConfig::from_lookup(lookup(&[("WARDEN_TARGET_FPR", "1.5")]));
        assert!(config.filter.validate().is_err());
    }
}
