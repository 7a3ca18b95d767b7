//! Cache Module
//!
//! Pluggable TTL cache: a strategy contract, an in-memory backend with a
//! background cleanup thread, a manager façade and a named registry.

mod entry;
mod manager;
mod registry;
mod stats;
mod store;
mod strategy;


use std::time::Duration;

// Re-export public types
pub use entry::{current_timestamp_ms, StoredEntry};
pub use manager::CacheManager;
pub use registry::{global, init_global, Registry, DEFAULT_CACHE_NAME};
pub use stats::CacheStats;
pub use store::{InMemoryStore, DEFAULT_SWEEP_INTERVAL};
pub use strategy::{CacheStrategy, StrategyKind};

// == Cache Settings ==
/// Process-wide cache configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// TTL in seconds for writes that don't choose one; None = never expire
    pub default_ttl: Option<u64>,
    /// Interval between cleanup passes; None = no cleanup thread
    pub sweep_interval: Option<Duration>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            default_ttl: Some(3600),
            sweep_interval: Some(DEFAULT_SWEEP_INTERVAL),
        }
    }
}
