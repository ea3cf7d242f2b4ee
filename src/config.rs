//! Application configuration.
//!
//! Loaded once at startup from an optional TOML file (path taken from
//! `SHORTMAP_CONFIG`, default `shortmap.toml`), then overridden by
//! environment variables. Every field has a default so a bare process
//! starts with sensible settings.

use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub cleanup: CleanupConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Base used when composing user-facing short URLs. Knowledge of the
    /// public address belongs here, at the boundary, not in the core.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    #[serde(default = "default_cleanup_enabled")]
    pub enabled: bool,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_public_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_storage_backend() -> String {
    "sqlite".to_string()
}

fn default_database_url() -> String {
    "shortmap.db".to_string()
}

fn default_cleanup_enabled() -> bool {
    true
}

fn default_sweep_interval_secs() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "plain".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            public_url: default_public_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            database_url: default_database_url(),
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: default_cleanup_enabled(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = env::var("SHORTMAP_CONFIG").unwrap_or_else(|_| "shortmap.toml".to_string());

        let mut config = if Path::new(&path).exists() {
            let raw = fs::read_to_string(&path)?;
            toml::from_str(&raw)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid SERVER_PORT value: {}", port),
            }
        }
        if let Ok(public_url) = env::var("PUBLIC_URL") {
            self.server.public_url = public_url.trim_end_matches('/').to_string();
        }
        if let Ok(backend) = env::var("STORAGE_BACKEND") {
            self.storage.backend = backend;
        }
        if let Ok(database_url) = env::var("DATABASE_URL") {
            self.storage.database_url = database_url;
        }
        if let Ok(interval) = env::var("SWEEP_INTERVAL_SECS") {
            match interval.parse() {
                Ok(secs) => self.cleanup.sweep_interval_secs = secs,
                Err(_) => warn!("Ignoring invalid SWEEP_INTERVAL_SECS value: {}", interval),
            }
        }
        if let Ok(level) = env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Install the loaded configuration. Later calls are ignored, which keeps
/// test setup idempotent.
pub fn init_config(config: Config) {
    let _ = CONFIG.set(config);
}

/// Process-wide configuration; defaults if `init_config` was never called.
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.backend, "sqlite");
        assert!(config.cleanup.enabled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000

            [storage]
            backend = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.cleanup.sweep_interval_secs, 3600);
    }
}
