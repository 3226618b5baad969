//! Context injection: materialize every variable for the current site.
//!
//! The produced mapping is merged into whatever rendering context the
//! consuming application maintains; over HTTP it is served verbatim at
//! `GET /api/context`. No side effects beyond the cache population the
//! read-through path performs.

use crate::domain::{SiteId, SiteVarMap};

use super::vars::{LookupError, SiteVars};

/// Produce the full name→value mapping for the resolved site.
///
/// Fails with [`LookupError::MissingSiteScope`] when the request carried no
/// resolvable site.
pub async fn inject_sitevars(
    vars: &SiteVars,
    scope: Option<SiteId>,
) -> Result<SiteVarMap, LookupError> {
    vars.all_for_site(scope).await
}
