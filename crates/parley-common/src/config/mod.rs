//! Configuration loading and structures

mod app_config;

pub use app_config::{AppConfig, AppSettings, ConfigError, Environment, LimitsConfig, ServerConfig};
