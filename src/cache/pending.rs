//! Commit-deferred invalidation queue.
//!
//! Writes stage the site ids they touch *before* issuing the store write,
//! then apply the staged invalidations only once the write transaction has
//! committed. Dropping the queue without calling [`committed`] discards the
//! staged work, so a rollback or an error return leaves the cache untouched.
//!
//! [`committed`]: PendingInvalidations::committed

use tracing::debug;

use crate::domain::SiteId;

use super::store::SiteVarCache;

/// Invalidations staged during a write transaction.
///
/// Consuming `committed` guarantees each staged site is invalidated exactly
/// once per committed write; the `Drop` path is the rollback path and runs
/// nothing.
#[derive(Debug, Default)]
pub struct PendingInvalidations {
    staged: Vec<SiteId>,
}

impl PendingInvalidations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an invalidation for one site. Staging the same site twice
    /// within one transaction collapses to a single invalidation.
    pub fn stage(&mut self, site: SiteId) {
        if !self.staged.contains(&site) {
            self.staged.push(site);
        }
    }

    pub fn staged(&self) -> &[SiteId] {
        &self.staged
    }

    /// The enclosing transaction committed: apply every staged invalidation.
    pub fn committed(self, cache: &SiteVarCache) {
        for site in &self.staged {
            cache.invalidate(*site);
        }
        if !self.staged.is_empty() {
            debug!(sites = self.staged.len(), "Applied post-commit cache invalidations");
        }
    }
}
