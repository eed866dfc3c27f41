//! Engine configuration from environment variables.
//!
//! Every variable has a default, so `EngineConfig::from_env()` succeeds on
//! an empty environment:
//!
//! - `RATING_POLICY`: `cooldown` (default) or `one_time`
//! - `RATING_COOLDOWN_HOURS`: positive integer, default `24`
//! - `SCORE_CACHE_CAPACITY`: max cached product scores, default `10000`;
//!   `0` disables the cache
//! - `SCORE_CACHE_TTL_SECONDS`: positive integer, default `60`

use std::env;
use std::time::Duration;

use crate::ratings::RatingPolicy;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable is set to a value that cannot be used.
    #[error("invalid environment variable {name}: {reason}")]
    InvalidEnvVar {
        /// Variable name.
        name: String,
        /// What was wrong with the value.
        reason: String,
    },
}

/// Runtime settings for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Re-rating policy applied to rating submissions.
    pub rating_policy: RatingPolicy,
    /// Product-score cache settings; `None` disables caching.
    pub cache: Option<CacheConfig>,
}

/// Sizing for the product-score cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of cached product scores.
    pub capacity: u64,
    /// How long a cached score stays valid without writes.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            ttl: Duration::from_secs(60),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rating_policy: RatingPolicy::default(),
            cache: Some(CacheConfig::default()),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the environment.
    ///
    /// Reads a `.env` file first if one exists, matching how the engine is
    /// run in development.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] when a set variable fails to
    /// parse. Unset variables fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let rating_policy = parse_policy(
            &get_env_or_default("RATING_POLICY", "cooldown"),
            &get_env_or_default("RATING_COOLDOWN_HOURS", "24"),
        )?;
        let cache = parse_cache(
            &get_env_or_default("SCORE_CACHE_CAPACITY", "10000"),
            &get_env_or_default("SCORE_CACHE_TTL_SECONDS", "60"),
        )?;

        Ok(Self {
            rating_policy,
            cache,
        })
    }
}

/// Get an environment variable, falling back to a default.
fn get_env_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_owned())
}

fn parse_policy(policy: &str, cooldown_hours: &str) -> Result<RatingPolicy, ConfigError> {
    match policy {
        "one_time" => Ok(RatingPolicy::OneTime),
        "cooldown" => {
            let hours: i64 =
                cooldown_hours
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnvVar {
                        name: "RATING_COOLDOWN_HOURS".to_owned(),
                        reason: format!("expected an integer, got {cooldown_hours:?}"),
                    })?;
            if hours <= 0 {
                return Err(ConfigError::InvalidEnvVar {
                    name: "RATING_COOLDOWN_HOURS".to_owned(),
                    reason: format!("must be positive, got {hours}"),
                });
            }
            Ok(RatingPolicy::Cooldown {
                window: chrono::Duration::hours(hours),
            })
        }
        other => Err(ConfigError::InvalidEnvVar {
            name: "RATING_POLICY".to_owned(),
            reason: format!("expected \"one_time\" or \"cooldown\", got {other:?}"),
        }),
    }
}

fn parse_cache(capacity: &str, ttl_seconds: &str) -> Result<Option<CacheConfig>, ConfigError> {
    let capacity: u64 = capacity.parse().map_err(|_| ConfigError::InvalidEnvVar {
        name: "SCORE_CACHE_CAPACITY".to_owned(),
        reason: format!("expected an integer, got {capacity:?}"),
    })?;

    if capacity == 0 {
        return Ok(None);
    }

    let ttl_seconds: u64 = ttl_seconds.parse().map_err(|_| ConfigError::InvalidEnvVar {
        name: "SCORE_CACHE_TTL_SECONDS".to_owned(),
        reason: format!("expected an integer, got {ttl_seconds:?}"),
    })?;
    if ttl_seconds == 0 {
        return Err(ConfigError::InvalidEnvVar {
            name: "SCORE_CACHE_TTL_SECONDS".to_owned(),
            reason: "must be positive".to_owned(),
        });
    }

    Ok(Some(CacheConfig {
        capacity,
        ttl: Duration::from_secs(ttl_seconds),
    }))
}
