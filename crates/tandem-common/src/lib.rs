//! # tandem-common
//!
//! Shared utilities: environment-based configuration and tracing setup.

pub mod config;
pub mod telemetry;

pub use config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, Environment, NudgeConfig, PresenceConfig,
    RedisConfig, RevealConfig, RevealPoolPolicy,
};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig};
