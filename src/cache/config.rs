//! Cache configuration.

use std::num::NonZeroUsize;

use serde::Deserialize;

const DEFAULT_SITE_LIMIT: usize = 512;

/// Cache configuration from `sitevars.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Consult the cache at all. When false every lookup goes straight to
    /// the store and invalidations are no-ops.
    pub enabled: bool,
    /// Maximum number of sites whose mappings are retained at once.
    pub site_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            site_limit: DEFAULT_SITE_LIMIT,
        }
    }
}

impl CacheConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the site limit as NonZeroUsize, clamping to 1 if zero.
    pub fn site_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.site_limit).unwrap_or(NonZeroUsize::MIN)
    }
}
