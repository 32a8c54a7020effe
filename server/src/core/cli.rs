use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::config::StoreBackend;
use super::constants::{
    ENV_CACHE_TTL_SECS, ENV_CONFIG, ENV_FLUSH_INTERVAL_SECS, ENV_HOST, ENV_PORT, ENV_REDIS_URL,
    ENV_STORE_BACKEND,
};

#[derive(Parser)]
#[command(name = "footfall")]
#[command(version, about = "Visit counter service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    // Counter store options
    /// Counter store backend (memory or redis)
    #[arg(long, global = true, env = ENV_STORE_BACKEND, value_parser = parse_store_backend)]
    pub store_backend: Option<StoreBackend>,

    /// Redis-compatible store URL (redis://host:port/db, rediss:// for TLS)
    #[arg(long, global = true, env = ENV_REDIS_URL)]
    pub redis_url: Option<String>,

    // Counter behavior options
    /// Read-cache TTL in seconds
    #[arg(long, global = true, env = ENV_CACHE_TTL_SECS)]
    pub cache_ttl_secs: Option<u64>,

    /// Write-buffer flush interval in seconds
    #[arg(long, global = true, env = ENV_FLUSH_INTERVAL_SECS)]
    pub flush_interval_secs: Option<u64>,
}

/// Parse store backend from CLI/env string
fn parse_store_backend(s: &str) -> Result<StoreBackend, String> {
    match s.to_lowercase().as_str() {
        "memory" => Ok(StoreBackend::Memory),
        "redis" => Ok(StoreBackend::Redis),
        _ => Err(format!(
            "Invalid store backend '{}'. Valid options: memory, redis",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub store_backend: Option<StoreBackend>,
    pub redis_url: Option<String>,
    pub cache_ttl_secs: Option<u64>,
    pub flush_interval_secs: Option<u64>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        config: cli.config,
        store_backend: cli.store_backend,
        redis_url: cli.redis_url,
        cache_ttl_secs: cli.cache_ttl_secs,
        flush_interval_secs: cli.flush_interval_secs,
    };
    (config, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_store_backend() {
        assert!(matches!(
            parse_store_backend("memory"),
            Ok(StoreBackend::Memory)
        ));
        assert!(matches!(
            parse_store_backend("Redis"),
            Ok(StoreBackend::Redis)
        ));
        assert!(parse_store_backend("cassandra").is_err());
    }
}
