//! Cache Strategy Module
//!
//! The capability set every backing store implements, and the identifiers
//! used to pick one.

use std::fmt;
use std::str::FromStr;

use crate::cache::CacheStats;
use crate::error::CacheError;

// == Strategy Contract ==
/// Operations a cache backend must support.
///
/// All methods take `&self`; implementations synchronize internally and
/// must be safe to call from any number of threads at once.
pub trait CacheStrategy<V>: Send + Sync {
    /// Returns the live value for `key`. An expired entry is purged and
    /// reported as absent.
    fn get(&self, key: &str) -> Option<V>;

    /// Like [`CacheStrategy::get`], plus the remaining TTL read from the
    /// same entry.
    fn get_with_ttl(&self, key: &str) -> Option<(V, Option<u64>)>;

    /// Inserts or replaces `key`. `Some(ttl)` sets an expiry `ttl` seconds
    /// from now; `None` makes the entry non-expiring.
    fn set(&self, key: String, value: V, ttl: Option<u64>);

    /// Removes `key`, returning whether it was present.
    fn delete(&self, key: &str) -> bool;

    /// Removes every entry.
    fn clear(&self);

    /// Same expiry semantics as [`CacheStrategy::get`], without cloning the value.
    fn exists(&self, key: &str) -> bool;

    /// Whole seconds until `key` expires. None if missing or non-expiring.
    fn get_ttl(&self, key: &str) -> Option<u64>;

    /// Number of live entries.
    fn size(&self) -> usize;

    fn keys(&self) -> Vec<String>;

    fn values(&self) -> Vec<V>;

    fn items(&self) -> Vec<(String, V)>;

    /// Read and expiry counters.
    fn stats(&self) -> CacheStats;

    /// Runs one expiry pass now and returns how many entries it removed.
    fn sweep_expired(&self) -> usize;
}

// == Strategy Kind ==
/// Supported backends, resolved from their string identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Process-local map with per-key TTL and a background sweeper
    InMemory,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::InMemory => "in-memory",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-memory" => Ok(StrategyKind::InMemory),
            other => Err(CacheError::Configuration(other.to_string())),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
