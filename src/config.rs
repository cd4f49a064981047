//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use tracing::warn;

use crate::client::Driver;
use crate::repository::DEFAULT_CHUNK_SIZE;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend adapter serving the lists
    pub driver: Driver,
    /// Default number of elements per chunk
    pub chunk_size: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LIST_DRIVER` - `local`, `memcached` or `redis` (default: redis)
    /// - `CHUNK_SIZE` - Elements per chunk (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let driver = match env::var("LIST_DRIVER") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{}, falling back to {}", e, Driver::default());
                Driver::default()
            }),
            Err(_) => Driver::default(),
        };

        Self {
            driver,
            chunk_size: env::var("CHUNK_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_CHUNK_SIZE),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            driver: Driver::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}
