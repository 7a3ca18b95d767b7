//! Cache Registry Module
//!
//! Named collection of cache managers with one designated default, plus
//! the process-wide instance the HTTP layer goes through.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheManager, CacheSettings, StrategyKind};
use crate::error::{CacheError, Result};
use crate::models::VideoRecord;

/// Name of the cache every registry starts with
pub const DEFAULT_CACHE_NAME: &str = "default";

// == Registry State ==
#[derive(Debug)]
struct RegistryState<V> {
    instances: HashMap<String, Arc<CacheManager<V>>>,
    default_name: String,
}

impl<V> RegistryState<V> {
    fn not_found(&self, name: &str) -> CacheError {
        let mut available: Vec<String> = self.instances.keys().cloned().collect();
        available.sort();
        CacheError::NotFound {
            name: name.to_string(),
            available,
        }
    }
}

// == Registry ==
/// Thread-safe map of cache name to manager.
///
/// The lock here guards only the name mapping and the default pointer;
/// each manager synchronizes its own contents.
#[derive(Debug)]
pub struct Registry<V> {
    state: RwLock<RegistryState<V>>,
    settings: CacheSettings,
}

impl<V> Registry<V>
where
    V: Clone + Send + 'static,
{
    // == Constructors ==
    /// Creates a registry holding one in-memory cache named `"default"`.
    pub fn new(settings: CacheSettings) -> Self {
        let registry = Self::empty(settings);
        let manager = CacheManager::with_kind(StrategyKind::InMemory, &registry.settings);
        registry
            .state
            .write()
            .instances
            .insert(DEFAULT_CACHE_NAME.to_string(), Arc::new(manager));
        registry
    }

    /// Creates a registry with no caches. The default pointer still names
    /// `"default"`, so `get_default` fails until that name is created.
    pub fn empty(settings: CacheSettings) -> Self {
        Self {
            state: RwLock::new(RegistryState {
                instances: HashMap::new(),
                default_name: DEFAULT_CACHE_NAME.to_string(),
            }),
            settings,
        }
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    // == Create ==
    /// Builds and registers a manager for `strategy` under `name`.
    ///
    /// Fails with `DuplicateName` if the name is taken and with
    /// `Configuration` if the strategy identifier is unknown.
    pub fn create(&self, name: &str, strategy: &str) -> Result<Arc<CacheManager<V>>> {
        let mut state = self.state.write();
        if state.instances.contains_key(name) {
            return Err(CacheError::DuplicateName(name.to_string()));
        }

        let manager = Arc::new(CacheManager::new(strategy, &self.settings)?);
        state.instances.insert(name.to_string(), manager.clone());
        info!("Cache '{}' created with strategy {}", name, strategy);
        Ok(manager)
    }

    // == Lookup ==
    pub fn get(&self, name: &str) -> Result<Arc<CacheManager<V>>> {
        let state = self.state.read();
        state
            .instances
            .get(name)
            .cloned()
            .ok_or_else(|| state.not_found(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.state.read().instances.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn list_caches(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.read().instances.keys().cloned().collect();
        names.sort();
        names
    }

    // == Delete ==
    /// Clears the named cache and unregisters it. Returns whether it existed.
    pub fn delete(&self, name: &str) -> bool {
        let mut state = self.state.write();
        match state.instances.remove(name) {
            Some(manager) => {
                manager.clear();
                info!("Cache '{}' deleted", name);
                true
            }
            None => false,
        }
    }

    /// Clears every cache, then empties the registry.
    pub fn clear_all(&self) {
        let mut state = self.state.write();
        for manager in state.instances.values() {
            manager.clear();
        }
        let count = state.instances.len();
        state.instances.clear();
        info!("Cache registry torn down ({} caches)", count);
    }

    // == Default ==
    pub fn set_default(&self, name: &str) -> Result<()> {
        let mut state = self.state.write();
        if !state.instances.contains_key(name) {
            return Err(state.not_found(name));
        }
        debug!("Default cache switched from '{}' to '{}'", state.default_name, name);
        state.default_name = name.to_string();
        Ok(())
    }

    pub fn default_name(&self) -> String {
        self.state.read().default_name.clone()
    }

    pub fn get_default(&self) -> Result<Arc<CacheManager<V>>> {
        let state = self.state.read();
        state
            .instances
            .get(&state.default_name)
            .cloned()
            .ok_or_else(|| state.not_found(&state.default_name))
    }
}

// == Process-Wide Registry ==
static GLOBAL_REGISTRY: OnceLock<Arc<Registry<VideoRecord>>> = OnceLock::new();

/// Initializes the process-wide registry.
///
/// This is the only construction point. Only the first call's settings
/// take effect; a later call with different settings is logged and gets
/// the existing instance.
pub fn init_global(settings: CacheSettings) -> Arc<Registry<VideoRecord>> {
    let registry = GLOBAL_REGISTRY.get_or_init(|| {
        info!("Initializing global cache registry");
        Arc::new(Registry::new(settings.clone()))
    });

    if registry.settings() != &settings {
        warn!(
            "Global cache registry already initialized with {:?}; ignoring {:?}",
            registry.settings(),
            settings
        );
    }
    registry.clone()
}

/// Returns the process-wide registry, or `None` before [`init_global`].
pub fn global() -> Option<Arc<Registry<VideoRecord>>> {
    GLOBAL_REGISTRY.get().cloned()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn registry() -> Registry<Value> {
        Registry::new(CacheSettings {
            default_ttl: None,
            sweep_interval: None,
        })
    }

    #[test]
    fn test_starts_with_default_cache() {
        let registry = registry();

        assert_eq!(registry.list_caches(), vec!["default".to_string()]);
        assert_eq!(registry.default_name(), "default");
        assert!(registry.get_default().is_ok());
    }

    #[test]
    fn test_create_duplicate_name() {
        let registry = registry();

        let first = registry.create("x", "in-memory").unwrap();
        let second = registry.create("x", "in-memory");

        assert_eq!(second.unwrap_err(), CacheError::DuplicateName("x".to_string()));
        first.set("k", json!(1), None);
        assert_eq!(first.get("k"), Some(json!(1)));
        assert!(Arc::ptr_eq(&first, &registry.get("x").unwrap()));
    }

    #[test]
    fn test_create_unknown_strategy_registers_nothing() {
        let registry = registry();

        let result = registry.create("bad", "simple-dict");

        assert!(matches!(result, Err(CacheError::Configuration(_))));
        assert!(!registry.exists("bad"));
    }

    #[test]
    fn test_get_missing_lists_available() {
        let registry = registry();
        registry.create("alt", "in-memory").unwrap();

        match registry.get("missing") {
            Err(CacheError::NotFound { name, available }) => {
                assert_eq!(name, "missing");
                assert_eq!(available, vec!["alt".to_string(), "default".to_string()]);
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_set_default_switches_instance() {
        let registry = registry();
        registry.create("alt", "in-memory").unwrap();

        registry.set_default("alt").unwrap();

        let default = registry.get_default().unwrap();
        assert!(Arc::ptr_eq(&default, &registry.get("alt").unwrap()));
        assert!(!Arc::ptr_eq(&default, &registry.get("default").unwrap()));
    }

    #[test]
    fn test_set_default_unknown_name() {
        let registry = registry();

        assert!(matches!(
            registry.set_default("nope"),
            Err(CacheError::NotFound { .. })
        ));
        assert_eq!(registry.default_name(), "default");
    }

    #[test]
    fn test_delete_clears_contents() {
        let registry = registry();
        let alt = registry.create("alt", "in-memory").unwrap();
        alt.set("k", json!("v"), None);

        assert!(registry.delete("alt"));
        assert!(!registry.delete("alt"));

        // Outstanding handles see an emptied cache
        assert_eq!(alt.size(), 0);
        assert!(!registry.exists("alt"));
    }

    #[test]
    fn test_clear_all() {
        let registry = registry();
        let default = registry.get_default().unwrap();
        default.set("k", json!("v"), None);
        registry.create("alt", "in-memory").unwrap();

        registry.clear_all();

        assert!(registry.list_caches().is_empty());
        assert_eq!(default.size(), 0);
        assert!(matches!(
            registry.get_default(),
            Err(CacheError::NotFound { available, .. }) if available.is_empty()
        ));

        registry.create("default", "in-memory").unwrap();
        assert!(registry.get_default().is_ok());
    }

    #[test]
    fn test_global_registry_keeps_first_settings() {
        let first = CacheSettings {
            default_ttl: Some(5),
            sweep_interval: None,
        };

        let a = init_global(first.clone());
        let b = init_global(CacheSettings::default());

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.settings(), &first);
        assert!(a.exists(DEFAULT_CACHE_NAME));

        let looked_up = global().expect("initialized above");
        assert!(Arc::ptr_eq(&a, &looked_up));
        assert_eq!(looked_up.settings().default_ttl, Some(5));
    }
}
