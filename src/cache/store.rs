//! Cache storage: one entry per site, holding the full variable mapping.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lru::LruCache;
use metrics::counter;
use tracing::{debug, warn};

use crate::domain::{SiteId, SiteVarMap};

use super::config::CacheConfig;
use super::keys::cache_key;

type Entries = LruCache<SiteId, Arc<SiteVarMap>>;

/// In-process read-through cache of per-site variable mappings.
///
/// Entries are replaced wholesale: populate-on-miss, delete-on-invalidate.
/// No client mutates a cached mapping in place, so concurrent readers only
/// ever observe a complete mapping or a miss.
///
/// When disabled via configuration, every accessor is a no-op: `get` always
/// misses, `set` stores nothing, invalidations do nothing. Callers observe
/// this as "cache never consulted."
pub struct SiteVarCache {
    enabled: bool,
    entries: RwLock<Entries>,
}

impl SiteVarCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            enabled: config.is_enabled(),
            entries: RwLock::new(LruCache::new(config.site_limit_non_zero())),
        }
    }

    // Entries are only ever replaced or removed whole, so a mapping written
    // by a thread that later panicked is still a complete mapping; recovery
    // from poisoning is safe here.
    fn entries_read(&self, op: &'static str) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(|poisoned| {
            warn!(op, "Recovered from poisoned sitevar cache lock");
            poisoned.into_inner()
        })
    }

    fn entries_write(&self, op: &'static str) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(|poisoned| {
            warn!(op, "Recovered from poisoned sitevar cache lock");
            poisoned.into_inner()
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Look up the cached mapping for a site.
    pub fn get(&self, site: SiteId) -> Option<Arc<SiteVarMap>> {
        if !self.enabled {
            return None;
        }
        // LruCache::get updates recency and therefore needs the write lock.
        let hit = self.entries_write("get").get(&site).cloned();
        match &hit {
            Some(_) => counter!("sitevars_cache_hit_total").increment(1),
            None => counter!("sitevars_cache_miss_total").increment(1),
        }
        hit
    }

    /// Store the full mapping for a site, replacing any previous entry.
    pub fn set(&self, site: SiteId, vars: Arc<SiteVarMap>) {
        if !self.enabled {
            return;
        }
        debug!(key = %cache_key(site), entries = vars.len(), "Populated sitevar cache");
        self.entries_write("set").put(site, vars);
    }

    /// Drop the entry for one site. The next read misses and repopulates.
    /// Returns whether an entry was actually removed.
    pub fn invalidate(&self, site: SiteId) -> bool {
        if !self.enabled {
            return false;
        }
        let dropped = self.entries_write("invalidate").pop(&site).is_some();
        if dropped {
            counter!("sitevars_cache_invalidation_total").increment(1);
            debug!(key = %cache_key(site), "Invalidated sitevar cache entry");
        }
        dropped
    }

    /// Drop every cached mapping.
    pub fn invalidate_all(&self) {
        if !self.enabled {
            return;
        }
        let mut entries = self.entries_write("invalidate_all");
        let dropped = entries.len();
        entries.clear();
        if dropped > 0 {
            counter!("sitevars_cache_invalidation_total").increment(dropped as u64);
            debug!(dropped, "Invalidated all sitevar cache entries");
        }
    }

    /// Whether an entry is currently cached for the site. Test/diagnostic
    /// accessor; does not touch recency or counters.
    pub fn contains(&self, site: SiteId) -> bool {
        self.enabled && self.entries_read("contains").contains(&site)
    }

    /// Number of cached site mappings.
    pub fn len(&self) -> usize {
        self.entries_read("len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_cache() -> SiteVarCache {
        SiteVarCache::new(&CacheConfig::default())
    }

    fn disabled_cache() -> SiteVarCache {
        SiteVarCache::new(&CacheConfig {
            enabled: false,
            ..Default::default()
        })
    }

    fn mapping(pairs: &[(&str, &str)]) -> Arc<SiteVarMap> {
        Arc::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn populate_then_hit() {
        let cache = enabled_cache();
        let site = SiteId(1);
        assert!(cache.get(site).is_none());

        cache.set(site, mapping(&[("theme", "dark")]));
        let hit = cache.get(site).expect("entry cached");
        assert_eq!(hit.get("theme").map(String::as_str), Some("dark"));
    }

    #[test]
    fn invalidate_drops_only_that_site() {
        let cache = enabled_cache();
        cache.set(SiteId(1), mapping(&[("a", "1")]));
        cache.set(SiteId(2), mapping(&[("b", "2")]));

        cache.invalidate(SiteId(1));
        assert!(cache.get(SiteId(1)).is_none());
        assert!(cache.get(SiteId(2)).is_some());
    }

    #[test]
    fn invalidate_reports_whether_an_entry_was_dropped() {
        let cache = enabled_cache();
        let site = SiteId(3);

        assert!(!cache.invalidate(site));
        cache.set(site, mapping(&[("a", "1")]));
        assert!(cache.invalidate(site));
        assert!(!cache.invalidate(site));
    }

    #[test]
    fn invalidate_all_clears_everything() {
        let cache = enabled_cache();
        cache.set(SiteId(1), mapping(&[("a", "1")]));
        cache.set(SiteId(2), mapping(&[("b", "2")]));

        cache.invalidate_all();
        assert!(cache.is_empty());
    }

    #[test]
    fn entries_are_replaced_wholesale() {
        let cache = enabled_cache();
        let site = SiteId(7);
        cache.set(site, mapping(&[("a", "1"), ("b", "2")]));
        cache.set(site, mapping(&[("a", "changed")]));

        let hit = cache.get(site).expect("entry cached");
        assert_eq!(hit.len(), 1);
        assert_eq!(hit.get("a").map(String::as_str), Some("changed"));
    }

    #[test]
    fn disabled_cache_is_never_consulted() {
        let cache = disabled_cache();
        let site = SiteId(1);

        cache.set(site, mapping(&[("theme", "dark")]));
        assert!(cache.get(site).is_none());
        assert!(!cache.contains(site));
        assert!(cache.is_empty());

        // No-ops, observable as nothing rather than as errors.
        cache.invalidate(site);
        cache.invalidate_all();
    }

    #[test]
    fn site_limit_evicts_least_recently_used() {
        let cache = SiteVarCache::new(&CacheConfig {
            enabled: true,
            site_limit: 2,
        });
        cache.set(SiteId(1), mapping(&[("a", "1")]));
        cache.set(SiteId(2), mapping(&[("b", "2")]));
        cache.set(SiteId(3), mapping(&[("c", "3")]));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(SiteId(1)).is_none());
        assert!(cache.get(SiteId(3)).is_some());
    }
}
