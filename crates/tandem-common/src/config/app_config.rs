//! Application configuration structs
//!
//! Loads configuration from environment variables (with optional `.env`).

use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub presence: PresenceConfig,
    pub nudge: NudgeConfig,
    pub reveal: RevealConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// Presence staleness policy
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceConfig {
    /// A presence record whose `last_seen` is older than this counts as
    /// offline even if its online flag is still set.
    #[serde(default = "default_presence_ttl")]
    pub ttl_seconds: u64,
}

/// Nudge delivery settings
#[derive(Debug, Clone, Deserialize)]
pub struct NudgeConfig {
    /// How long the nudge stays visible before auto-dismissing
    #[serde(default = "default_nudge_visible_ms")]
    pub visible_ms: u64,
}

/// Which memories form the daily-reveal candidate pool.
///
/// The observed behavior draws from already-revealed memories, which is
/// almost certainly inverted from the intent; both options are kept behind
/// this switch instead of silently correcting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RevealPoolPolicy {
    /// Draw from memories with `revealed_at` already set (observed behavior)
    #[default]
    Revealed,
    /// Draw from memories never revealed before
    Unrevealed,
}

/// Daily reveal settings
#[derive(Debug, Clone, Deserialize)]
pub struct RevealConfig {
    #[serde(default)]
    pub policy: RevealPoolPolicy,
}

// Default value functions
fn default_app_name() -> String {
    "tandem".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_presence_ttl() -> u64 {
    300 // 5 minutes, refreshed by heartbeat
}

fn default_nudge_visible_ms() -> u64 {
    3000
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
            redis: RedisConfig {
                url: env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL"))?,
                max_connections: env::var("REDIS_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_redis_max_connections),
            },
            presence: PresenceConfig {
                ttl_seconds: env::var("PRESENCE_TTL_SECONDS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_presence_ttl),
            },
            nudge: NudgeConfig {
                visible_ms: env::var("NUDGE_VISIBLE_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_nudge_visible_ms),
            },
            reveal: RevealConfig {
                policy: env::var("REVEAL_POLICY")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "revealed" => Some(RevealPoolPolicy::Revealed),
                        "unrevealed" => Some(RevealPoolPolicy::Unrevealed),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
