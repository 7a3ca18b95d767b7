//! Cache Manager Module
//!
//! Façade that binds one strategy instance and forwards the cache contract
//! to it, so callers never name a concrete store type.

use std::fmt;

use crate::cache::{CacheSettings, CacheStats, CacheStrategy, InMemoryStore, StrategyKind};
use crate::error::Result;

// == Cache Manager ==
pub struct CacheManager<V> {
    kind: StrategyKind,
    strategy: Box<dyn CacheStrategy<V>>,
    default_ttl: Option<u64>,
}

impl<V> CacheManager<V>
where
    V: Clone + Send + 'static,
{
    // == Constructors ==
    /// Builds a manager from a strategy identifier such as `"in-memory"`.
    ///
    /// Unknown identifiers fail here with [`CacheError::Configuration`],
    /// never on first use.
    ///
    /// [`CacheError::Configuration`]: crate::error::CacheError::Configuration
    pub fn new(strategy: &str, settings: &CacheSettings) -> Result<Self> {
        let kind = strategy.parse::<StrategyKind>()?;
        Ok(Self::with_kind(kind, settings))
    }

    pub fn with_kind(kind: StrategyKind, settings: &CacheSettings) -> Self {
        let strategy: Box<dyn CacheStrategy<V>> = match kind {
            StrategyKind::InMemory => match settings.sweep_interval {
                Some(interval) => Box::new(InMemoryStore::new(interval)),
                None => Box::new(InMemoryStore::without_cleanup()),
            },
        };

        Self {
            kind,
            strategy,
            default_ttl: settings.default_ttl,
        }
    }

    /// Wraps an already-built backend.
    pub fn from_strategy(
        kind: StrategyKind,
        strategy: Box<dyn CacheStrategy<V>>,
        default_ttl: Option<u64>,
    ) -> Self {
        Self {
            kind,
            strategy,
            default_ttl,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// TTL applied by [`CacheManager::set_with_default_ttl`].
    pub fn default_ttl(&self) -> Option<u64> {
        self.default_ttl
    }

    // == Forwarded Operations ==
    pub fn get(&self, key: &str) -> Option<V> {
        self.strategy.get(key)
    }

    pub fn get_with_ttl(&self, key: &str) -> Option<(V, Option<u64>)> {
        self.strategy.get_with_ttl(key)
    }

    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<u64>) {
        self.strategy.set(key.into(), value, ttl);
    }

    /// Writes `value` with the process-wide default TTL.
    pub fn set_with_default_ttl(&self, key: impl Into<String>, value: V) {
        self.strategy.set(key.into(), value, self.default_ttl);
    }

    pub fn delete(&self, key: &str) -> bool {
        self.strategy.delete(key)
    }

    pub fn clear(&self) {
        self.strategy.clear();
    }

    pub fn exists(&self, key: &str) -> bool {
        self.strategy.exists(key)
    }

    pub fn get_ttl(&self, key: &str) -> Option<u64> {
        self.strategy.get_ttl(key)
    }

    pub fn size(&self) -> usize {
        self.strategy.size()
    }

    pub fn keys(&self) -> Vec<String> {
        self.strategy.keys()
    }

    pub fn values(&self) -> Vec<V> {
        self.strategy.values()
    }

    pub fn items(&self) -> Vec<(String, V)> {
        self.strategy.items()
    }

    pub fn stats(&self) -> CacheStats {
        self.strategy.stats()
    }

    pub fn sweep_expired(&self) -> usize {
        self.strategy.sweep_expired()
    }
}

impl<V> fmt::Debug for CacheManager<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManager")
            .field("kind", &self.kind)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}
