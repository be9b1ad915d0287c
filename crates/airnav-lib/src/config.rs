//! Runtime configuration for the pathfinding service.
//!
//! # Environment Variables
//!
//! - `AIRNAV_CACHE_TTL_SECS`: graph cache lifetime in seconds (default: 300)
//! - `AIRNAV_REPOSITORY_TIMEOUT_MS`: bound on each repository call in
//!   milliseconds (default: 10000, `0` disables the bound)

use std::time::Duration;

use crate::cache::DEFAULT_CACHE_TTL;
use crate::error::{Error, Result};

pub const CACHE_TTL_ENV: &str = "AIRNAV_CACHE_TTL_SECS";
pub const REPOSITORY_TIMEOUT_ENV: &str = "AIRNAV_REPOSITORY_TIMEOUT_MS";

/// Default bound on a single repository call.
pub const DEFAULT_REPOSITORY_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunables for [`crate::service::PathfindingService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathfindingConfig {
    pub cache_ttl: Duration,
    /// `None` lets repository calls run unbounded.
    pub repository_timeout: Option<Duration>,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            repository_timeout: Some(DEFAULT_REPOSITORY_TIMEOUT),
        }
    }
}

impl PathfindingConfig {
    /// Create configuration from environment variables, falling back to the
    /// defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup(CACHE_TTL_ENV) {
            config.cache_ttl = Duration::from_secs(parse_u64(CACHE_TTL_ENV, &value)?);
        }

        if let Some(value) = lookup(REPOSITORY_TIMEOUT_ENV) {
            config.repository_timeout = match parse_u64(REPOSITORY_TIMEOUT_ENV, &value)? {
                0 => None,
                millis => Some(Duration::from_millis(millis)),
            };
        }

        Ok(config)
    }
}

fn parse_u64(key: &'static str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| Error::InvalidConfig {
        key,
        value: value.to_string(),
    })
}
