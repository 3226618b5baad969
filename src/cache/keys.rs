//! Cache key formatting.
//!
//! One key per site, holding that site's full name→value mapping. The
//! format is part of the observable contract and shows up in logs.

use crate::domain::SiteId;

/// Cache key for one site's variable mapping.
pub fn cache_key(site: SiteId) -> String {
    format!("sitevars:{site}")
}
