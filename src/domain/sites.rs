//! Site scope: the tenant/domain partition under which variables live.

use std::fmt;

use serde::Serialize;

/// Identifier of a site row. Variables are always partitioned by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SiteId(pub i64);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for SiteId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteRecord {
    pub id: SiteId,
    /// Hostname the site answers to, without scheme or port.
    pub domain: String,
    pub name: String,
}
