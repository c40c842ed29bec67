//! Constructor cache shared by inflaters.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use super::types::CachedConstructor;

static GLOBAL_CACHE: LazyLock<Arc<ConstructorCache>> =
    LazyLock::new(|| Arc::new(ConstructorCache::new()));

/// Memoized constructors keyed by fully-qualified type name.
///
/// A name, once resolved, is never re-resolved through this cache. Concurrent
/// first use is idempotent: resolution happens outside the lock and the first
/// inserted entry wins, since every resolution of a name yields an equivalent
/// constructor.
#[derive(Debug, Default)]
pub struct ConstructorCache {
    entries: RwLock<HashMap<String, CachedConstructor>>,
}

impl ConstructorCache {
    /// Create a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by default.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_CACHE)
    }

    pub fn get(&self, name: &str) -> Option<CachedConstructor> {
        self.entries.read().get(name).cloned()
    }

    /// Insert a resolved constructor unless the name is already cached.
    ///
    /// Returns the entry that ends up in the cache.
    pub fn insert(&self, name: &str, entry: CachedConstructor) -> CachedConstructor {
        self.entries
            .write()
            .entry(name.to_string())
            .or_insert(entry)
            .clone()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every cached constructor.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
