//! Application configuration
//!
//! Configuration is layered, lowest to highest priority:
//! 1. Built-in defaults
//! 2. JSON config file (`footfall.json` in the working directory, or the
//!    path given via `--config`/`FOOTFALL_CONFIG`)
//! 3. CLI arguments (which include env var fallbacks via clap)

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{
    CONFIG_FILE_NAME, DEFAULT_CACHE_TTL_SECS, DEFAULT_FLUSH_INTERVAL_SECS, DEFAULT_HOST,
    DEFAULT_PORT,
};

/// Counter store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process store, for development and tests. Counts do not survive
    /// a restart.
    #[default]
    Memory,
    /// Redis-compatible store (Redis, Valkey, Dragonfly)
    Redis,
}

/// Server configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Counter store configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Store backend type
    pub backend: StoreBackend,
    /// Redis URL (redis backend)
    pub redis_url: Option<String>,
}

/// Counter behavior configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct CounterConfig {
    /// Read-cache TTL in seconds
    pub cache_ttl_secs: u64,
    /// Write-buffer flush interval in seconds
    pub flush_interval_secs: u64,
}

impl CounterConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs)
    }
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub counter: CounterConfig,
}

// =============================================================================
// File config (all fields optional, merged under CLI/env)
// =============================================================================

/// Server section of the JSON config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Store section of the JSON config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreFileConfig {
    pub backend: Option<StoreBackend>,
    pub redis_url: Option<String>,
}

/// Counter section of the JSON config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CounterFileConfig {
    pub cache_ttl_secs: Option<u64>,
    pub flush_interval_secs: Option<u64>,
}

/// Root of the JSON config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub store: Option<StoreFileConfig>,
    pub counter: Option<CounterFileConfig>,
}

impl FileConfig {
    /// Load and parse a JSON config file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path.display(), e))
    }
}

impl AppConfig {
    /// Load configuration from all sources
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        // 1. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        let file_config = match overlay_path {
            Some(path) => {
                let config = FileConfig::load_from_file(&path)?;
                tracing::debug!(path = %path.display(), "Config file loaded");
                config
            }
            None => FileConfig::default(),
        };

        // 2. Extract file config sections with defaults
        let file_server = file_config.server.unwrap_or_default();
        let file_store = file_config.store.unwrap_or_default();
        let file_counter = file_config.counter.unwrap_or_default();

        // 3. Layer: defaults -> file config -> CLI/env overrides
        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let store_backend = cli
            .store_backend
            .or(file_store.backend)
            .unwrap_or_default();

        let redis_url = cli.redis_url.clone().or(file_store.redis_url);

        let cache_ttl_secs = cli
            .cache_ttl_secs
            .or(file_counter.cache_ttl_secs)
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);

        let flush_interval_secs = cli
            .flush_interval_secs
            .or(file_counter.flush_interval_secs)
            .unwrap_or(DEFAULT_FLUSH_INTERVAL_SECS);

        if cache_ttl_secs == 0 {
            anyhow::bail!("cache_ttl_secs must be greater than zero");
        }
        if flush_interval_secs == 0 {
            anyhow::bail!("flush_interval_secs must be greater than zero");
        }

        Ok(Self {
            server: ServerConfig { host, port },
            store: StoreConfig {
                backend: store_backend,
                redis_url,
            },
            counter: CounterConfig {
                cache_ttl_secs,
                flush_interval_secs,
            },
        })
    }
}

/// Check whether a host string binds all interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::load(&CliConfig::default()).unwrap();
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.counter.cache_ttl_secs, DEFAULT_CACHE_TTL_SECS);
        assert_eq!(
            config.counter.flush_interval_secs,
            DEFAULT_FLUSH_INTERVAL_SECS
        );
    }

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = CliConfig {
            host: Some("0.0.0.0".to_string()),
            port: Some(8080),
            store_backend: Some(StoreBackend::Redis),
            redis_url: Some("redis://localhost:6379/0".to_string()),
            cache_ttl_secs: Some(2),
            flush_interval_secs: Some(10),
            ..Default::default()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.backend, StoreBackend::Redis);
        assert_eq!(
            config.store.redis_url.as_deref(),
            Some("redis://localhost:6379/0")
        );
        assert_eq!(config.counter.cache_ttl_secs, 2);
        assert_eq!(config.counter.flush_interval_secs, 10);
    }

    #[test]
    fn test_zero_intervals_rejected() {
        let cli = CliConfig {
            cache_ttl_secs: Some(0),
            ..Default::default()
        };
        assert!(AppConfig::load(&cli).is_err());

        let cli = CliConfig {
            flush_interval_secs: Some(0),
            ..Default::default()
        };
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn test_missing_config_file_errors() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/footfall.json")),
            ..Default::default()
        };
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn test_file_config_parse() {
        let json = r#"{
            "server": {"port": 9000},
            "store": {"backend": "redis", "redis_url": "redis://cache:6379"},
            "counter": {"cache_ttl_secs": 3}
        }"#;
        let file: FileConfig = serde_json::from_str(json).unwrap();
        let server = file.server.unwrap();
        assert_eq!(server.port, Some(9000));
        assert_eq!(server.host, None);
        let store = file.store.unwrap();
        assert_eq!(store.backend, Some(StoreBackend::Redis));
        assert_eq!(file.counter.unwrap().cache_ttl_secs, Some(3));
    }

    #[test]
    fn test_counter_config_durations() {
        let counter = CounterConfig {
            cache_ttl_secs: 5,
            flush_interval_secs: 30,
        };
        assert_eq!(counter.cache_ttl(), Duration::from_secs(5));
        assert_eq!(counter.flush_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(!is_all_interfaces("127.0.0.1"));
        assert!(!is_all_interfaces("localhost"));
    }
}
