//! Explicit per-profile cache of parsed tables.
//!
//! A cached table is immutable and shared through [`Arc`]. Reloading builds
//! the replacement first and swaps it in only on success, so a reader holding
//! the previous table never sees a partially rebuilt one and a failed reload
//! leaves the previous table in place.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::dataset::PowerTable;
use crate::error::CatalogError;

/// Parsed tables keyed by profile id.
#[derive(Debug, Clone, Default)]
pub struct ProfileCache {
    tables: HashMap<String, Arc<PowerTable>>,
}

impl ProfileCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached table for `profile`, if any.
    pub fn get(&self, profile: &str) -> Option<Arc<PowerTable>> {
        self.tables.get(profile).cloned()
    }

    /// Returns true if `profile` has a cached table.
    pub fn contains(&self, profile: &str) -> bool {
        self.tables.contains_key(profile)
    }

    /// Cached table for `profile`, loading it with `load` on a miss.
    ///
    /// A failed load caches nothing.
    pub fn get_or_load<F>(&mut self, profile: &str, load: F) -> Result<Arc<PowerTable>, CatalogError>
    where
        F: FnOnce() -> Result<PowerTable, CatalogError>,
    {
        if let Some(table) = self.tables.get(profile) {
            debug!(profile, "profile cache hit");
            return Ok(Arc::clone(table));
        }
        debug!(profile, "profile cache miss");
        self.reload(profile, load)
    }

    /// Rebuild `profile`'s table with `load` and replace the cached one.
    ///
    /// On failure the previous table, if any, stays cached.
    pub fn reload<F>(&mut self, profile: &str, load: F) -> Result<Arc<PowerTable>, CatalogError>
    where
        F: FnOnce() -> Result<PowerTable, CatalogError>,
    {
        let table = Arc::new(load()?);
        self.tables.insert(profile.to_string(), Arc::clone(&table));
        debug!(profile, records = table.len(), "profile table cached");
        Ok(table)
    }

    /// Cache `table` for `profile`, returning the table it replaced.
    pub fn insert(&mut self, profile: &str, table: PowerTable) -> Option<Arc<PowerTable>> {
        self.tables.insert(profile.to_string(), Arc::new(table))
    }

    /// Drop `profile`'s cached table. Returns true if one was cached.
    pub fn invalidate(&mut self, profile: &str) -> bool {
        self.tables.remove(profile).is_some()
    }

    /// Drop every cached table.
    pub fn clear(&mut self) {
        self.tables.clear();
    }

    /// Number of cached profiles.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Cached profile ids, sorted.
    pub fn profiles(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::long_format::LongRecord;

    fn table(power: f64) -> PowerTable {
        PowerTable::new(vec![LongRecord::new(180.0, 710.0, power)])
    }

    #[test]
    fn loads_once() {
        let mut cache = ProfileCache::new();
        let mut calls = 0;
        let a = cache
            .get_or_load("C", || {
                calls += 1;
                Ok(table(1.2))
            })
            .unwrap();
        let b = cache
            .get_or_load("C", || {
                calls += 1;
                Ok(table(9.9))
            })
            .unwrap();
        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.get(180.0, 710.0), Some(1.2));
    }

    #[test]
    fn failed_load_caches_nothing() {
        let mut cache = ProfileCache::new();
        let err = cache
            .get_or_load("C", || Err(CatalogError::Io("gone".to_string())))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
        assert!(!cache.contains("C"));
    }

    #[test]
    fn reload_replaces_atomically() {
        let mut cache = ProfileCache::new();
        let old = cache.get_or_load("C", || Ok(table(1.2))).unwrap();
        let new = cache.reload("C", || Ok(table(1.5))).unwrap();
        // The previous snapshot is untouched.
        assert_eq!(old.get(180.0, 710.0), Some(1.2));
        assert_eq!(new.get(180.0, 710.0), Some(1.5));
        assert_eq!(cache.get("C").unwrap().get(180.0, 710.0), Some(1.5));
    }

    #[test]
    fn failed_reload_keeps_previous() {
        let mut cache = ProfileCache::new();
        cache.insert("C", table(1.2));
        let result = cache.reload("C", || {
            Err(CatalogError::TableNotFound {
                profile: "C".to_string(),
                start_marker: "a".to_string(),
                end_marker: "b".to_string(),
            })
        });
        assert!(result.is_err());
        assert_eq!(cache.get("C").unwrap().get(180.0, 710.0), Some(1.2));
    }

    #[test]
    fn invalidate_and_clear() {
        let mut cache = ProfileCache::new();
        cache.insert("C", table(1.2));
        cache.insert("B", table(0.8));
        assert_eq!(cache.profiles(), vec!["B", "C"]);
        assert!(cache.invalidate("C"));
        assert!(!cache.invalidate("C"));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
