//! Configuration Module
//!
//! Loads cache and quota settings from environment variables and resolves
//! auth-tier numbers (quota size, default TTL) into plain configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheStore, TtlPolicy, DEFAULT_MAX_SIZE};
use crate::clock::SharedClock;
use crate::error::{GuardError, Result};
use crate::limiter::{QuotaGroup, PER_HOUR, PER_MINUTE};

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(3600);

// == Auth Mode ==
/// Credential tier of the upstream caller.
///
/// Only the numbers derived from the tier reach the cache and limiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// No credentials
    #[default]
    Anonymous,
    /// Application credentials only
    App,
    /// Application and user credentials
    Full,
}

impl AuthMode {
    /// Requests allowed per minute for this tier.
    pub fn rate_limit(&self) -> usize {
        match self {
            AuthMode::Anonymous => 10,
            AuthMode::App => 60,
            AuthMode::Full => 100,
        }
    }

    /// Default cache TTL for this tier.
    pub fn cache_ttl(&self) -> Duration {
        match self {
            AuthMode::Anonymous => 5 * MINUTE,
            AuthMode::App => 10 * MINUTE,
            AuthMode::Full => 15 * MINUTE,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, AuthMode::Anonymous)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Anonymous => "anonymous",
            AuthMode::App => "app",
            AuthMode::Full => "full",
        }
    }
}

impl FromStr for AuthMode {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "anonymous" | "none" => Ok(AuthMode::Anonymous),
            "app" | "app-only" => Ok(AuthMode::App),
            "full" | "user" => Ok(AuthMode::Full),
            other => Err(GuardError::InvalidRequest(format!(
                "Unknown auth mode '{}'",
                other
            ))),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Byte budget of the response cache
    pub cache_max_bytes: usize,
    /// TTL for keys matching no rule
    pub default_ttl: Duration,
    /// Background sweep interval; zero disables the sweep
    pub sweep_interval: Duration,
    /// HTTP server port
    pub server_port: u16,
    /// Credential tier
    pub auth_mode: AuthMode,
    /// Requests allowed per minute
    pub per_minute_limit: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `AUTH_MODE` - `anonymous`, `app` or `full` (default: anonymous)
    /// - `CACHE_MAX_BYTES` - Cache byte budget (default: 50 MB)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: per auth mode)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds, 0 disables (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `RATE_LIMIT_PER_MINUTE` - Per-minute quota (default: per auth mode)
    pub fn from_env() -> Self {
        let auth_mode: AuthMode = env::var("AUTH_MODE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        Self {
            cache_max_bytes: parse_env("CACHE_MAX_BYTES").unwrap_or(DEFAULT_MAX_SIZE),
            default_ttl: parse_env("CACHE_DEFAULT_TTL")
                .map(Duration::from_secs)
                .unwrap_or_else(|| auth_mode.cache_ttl()),
            sweep_interval: Duration::from_secs(parse_env("SWEEP_INTERVAL").unwrap_or(60)),
            server_port: parse_env("SERVER_PORT").unwrap_or(3000),
            auth_mode,
            per_minute_limit: parse_env("RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|| auth_mode.rate_limit()),
        }
    }

    /// Creates the default configuration for an auth tier.
    pub fn for_auth_mode(auth_mode: AuthMode) -> Self {
        Self {
            default_ttl: auth_mode.cache_ttl(),
            auth_mode,
            per_minute_limit: auth_mode.rate_limit(),
            ..Self::default()
        }
    }

    // == Builders ==
    /// Builds the TTL policy: the standard rule table over this default TTL.
    pub fn ttl_policy(&self) -> Result<TtlPolicy> {
        TtlPolicy::standard(self.default_ttl)
    }

    /// Builds an empty cache store with this configuration.
    pub fn cache_store<V>(&self, clock: SharedClock) -> Result<CacheStore<V>>
    where
        V: Clone + serde::Serialize,
    {
        Ok(CacheStore::new(self.cache_max_bytes, self.ttl_policy()?, clock))
    }

    /// Builds the per-minute and per-hour quota group.
    ///
    /// The hourly quota is sixty times the per-minute one, saturating at
    /// `usize::MAX`.
    pub fn quota_group(&self, clock: SharedClock) -> QuotaGroup {
        QuotaGroup::new(clock)
            .with_limiter(PER_MINUTE, self.per_minute_limit, MINUTE)
            .with_limiter(PER_HOUR, self.per_minute_limit.saturating_mul(60), HOUR)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_max_bytes: DEFAULT_MAX_SIZE,
            default_ttl: AuthMode::Anonymous.cache_ttl(),
            sweep_interval: MINUTE,
            server_port: 3000,
            auth_mode: AuthMode::Anonymous,
            per_minute_limit: AuthMode::Anonymous.rate_limit(),
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_max_bytes, 50 * 1024 * 1024);
        assert_eq!(config.default_ttl, Duration::from_secs(300));
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.auth_mode, AuthMode::Anonymous);
        assert_eq!(config.per_minute_limit, 10);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("AUTH_MODE");
        env::remove_var("CACHE_MAX_BYTES");
        env::remove_var("CACHE_DEFAULT_TTL");
        env::remove_var("SWEEP_INTERVAL");
        env::remove_var("SERVER_PORT");
        env::remove_var("RATE_LIMIT_PER_MINUTE");

        let config = Config::from_env();
        assert_eq!(config.cache_max_bytes, DEFAULT_MAX_SIZE);
        assert_eq!(config.default_ttl, Duration::from_secs(300));
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.per_minute_limit, 10);
    }

    #[test]
    fn test_elevated_tiers_get_more_quota_and_longer_ttl() {
        let anonymous = Config::for_auth_mode(AuthMode::Anonymous);
        let app = Config::for_auth_mode(AuthMode::App);
        let full = Config::for_auth_mode(AuthMode::Full);

        assert!(anonymous.per_minute_limit < app.per_minute_limit);
        assert!(app.per_minute_limit < full.per_minute_limit);
        assert!(anonymous.default_ttl < app.default_ttl);
        assert!(app.default_ttl < full.default_ttl);
        assert!(!AuthMode::Anonymous.is_authenticated());
        assert!(AuthMode::Full.is_authenticated());
    }

    #[test]
    fn test_auth_mode_parsing() {
        assert_eq!("APP".parse::<AuthMode>().unwrap(), AuthMode::App);
        assert_eq!(" full ".parse::<AuthMode>().unwrap(), AuthMode::Full);
        assert_eq!("".parse::<AuthMode>().unwrap(), AuthMode::Anonymous);
        assert!("root".parse::<AuthMode>().is_err());
        assert_eq!(AuthMode::App.as_str(), "app");
    }

    #[test]
    fn test_quota_group_from_config() {
        let clock = ManualClock::new(0);
        let config = Config::for_auth_mode(AuthMode::App);
        let mut group = config.quota_group(clock.shared());

        assert_eq!(group.names(), vec![PER_MINUTE, PER_HOUR]);
        let stats = group.stats();
        assert_eq!(stats[PER_MINUTE].limit, 60);
        assert_eq!(stats[PER_HOUR].limit, 3600);
        assert_eq!(stats[PER_HOUR].window, 3600);
    }

    #[test]
    fn test_huge_per_minute_limit_saturates_hourly() {
        let clock = ManualClock::new(0);
        let config = Config {
            per_minute_limit: usize::MAX,
            ..Config::default()
        };
        let mut group = config.quota_group(clock.shared());

        let stats = group.stats();
        assert_eq!(stats[PER_MINUTE].limit, usize::MAX);
        assert_eq!(stats[PER_HOUR].limit, usize::MAX);
        assert!(group.try_proceed());
    }

    #[test]
    fn test_cache_store_from_config() {
        let clock = ManualClock::new(0);
        let config = Config::for_auth_mode(AuthMode::Full);
        let store: CacheStore<String> = config.cache_store(clock.shared()).unwrap();

        assert_eq!(store.max_size(), DEFAULT_MAX_SIZE);
        assert_eq!(store.policy().resolve("misc"), Duration::from_secs(900));
        assert_eq!(store.policy().resolve("subreddit:rust:new"), Duration::from_secs(120));
    }
}
