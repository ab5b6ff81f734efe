//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which backing store implementation to open at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub cache_capacity: usize,
    /// HTTP server port
    pub server_port: u16,
    /// SQLite database file (`:memory:` for an in-process database)
    pub database_path: PathBuf,
    /// Backing store implementation
    pub store_backend: StoreBackend,
    /// Upper bound on a single backing store call, in milliseconds
    pub store_timeout_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 200)
    /// - `SERVER_PORT` - HTTP server port (default: 8090)
    /// - `DATABASE_PATH` - SQLite database file (default: kv_store.db)
    /// - `STORE_BACKEND` - `sqlite` or `memory` (default: sqlite)
    /// - `STORE_TIMEOUT_MS` - Backing store call timeout (default: 2000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.cache_capacity),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            database_path: env::var("DATABASE_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            store_backend: parse_var("STORE_BACKEND").unwrap_or(defaults.store_backend),
            store_timeout_ms: parse_var("STORE_TIMEOUT_MS").unwrap_or(defaults.store_timeout_ms),
        }
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: 200,
            server_port: 8090,
            database_path: PathBuf::from("kv_store.db"),
            store_backend: StoreBackend::Sqlite,
            store_timeout_ms: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_capacity, 200);
        assert_eq!(config.server_port, 8090);
        assert_eq!(config.database_path, PathBuf::from("kv_store.db"));
        assert_eq!(config.store_backend, StoreBackend::Sqlite);
        assert_eq!(config.store_timeout(), Duration::from_millis(2000));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("SERVER_PORT");
        env::remove_var("DATABASE_PATH");
        env::remove_var("STORE_BACKEND");
        env::remove_var("STORE_TIMEOUT_MS");

        let config = Config::from_env();
        assert_eq!(config.cache_capacity, 200);
        assert_eq!(config.server_port, 8090);
        assert_eq!(config.store_backend, StoreBackend::Sqlite);
        assert_eq!(config.store_timeout_ms, 2000);
    }

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("SQLite".parse::<StoreBackend>(), Ok(StoreBackend::Sqlite));
        assert_eq!("memory".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("redis".parse::<StoreBackend>().is_err());
    }
}
