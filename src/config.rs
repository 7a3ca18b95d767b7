//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::cache::CacheSettings;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL in seconds applied to cached video records
    pub cache_ttl: u64,
    /// Background cleanup interval in seconds
    pub cleanup_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Directory downloaded files are written to
    pub download_dir: PathBuf,
    /// yt-dlp executable
    pub ytdlp_path: PathBuf,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Logs `.env` failures other than a missing file. Returns whether a
/// file was loaded.
fn check_env_file<T>(result: dotenvy::Result<T>) -> bool {
    match result {
        Ok(_) => true,
        Err(err) if err.not_found() => false,
        Err(err) => {
            warn!("Ignoring unreadable .env file: {}", err);
            false
        }
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_SECONDS` - TTL for cached records, 0 for none (default: 3600)
    /// - `CACHE_CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `DOWNLOAD_DIR` - Where downloads land (default: OS temp dir)
    /// - `YTDLP_PATH` - yt-dlp executable (default: `yt-dlp`)
    pub fn from_env() -> Self {
        check_env_file(dotenvy::dotenv());
        let defaults = Self::default();

        Self {
            cache_ttl: env_or("CACHE_TTL_SECONDS", defaults.cache_ttl),
            cleanup_interval: env_or("CACHE_CLEANUP_INTERVAL", defaults.cleanup_interval),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            download_dir: env::var_os("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
            ytdlp_path: env::var_os("YTDLP_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.ytdlp_path),
        }
    }

    /// Cache layer view of this configuration.
    ///
    /// A TTL of 0 means records never expire. A cleanup interval of 0
    /// disables the cleanup thread; reads still evict lazily.
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            default_ttl: (self.cache_ttl > 0).then_some(self.cache_ttl),
            sweep_interval: (self.cleanup_interval > 0)
                .then(|| Duration::from_secs(self.cleanup_interval)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl: 3600,
            cleanup_interval: 60,
            server_port: 8000,
            download_dir: env::temp_dir(),
            ytdlp_path: PathBuf::from("yt-dlp"),
        }
    }
}
