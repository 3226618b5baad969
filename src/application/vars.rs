//! The per-site lookup facade over the variable store and its cache.
//!
//! Reads resolve a variable name to a value for one site, consulting the
//! read-through cache when enabled and the store directly otherwise. Writes
//! go to the store and invalidate the site's cache entry only after the
//! write has committed; an error return leaves the cache untouched.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use crate::cache::{PendingInvalidations, SiteVarCache};
use crate::domain::{DomainError, SiteId, SiteVarMap, SiteVarRecord, validate_name};

use super::repos::{RepoError, SiteRepo, SiteVarRepo};

/// Errors surfaced by read-side lookups.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The caller attempted a lookup without a site scope. This is a
    /// programming error on the caller's side and is never recovered.
    #[error("sitevar lookup requires a site scope")]
    MissingSiteScope,
    /// The coercion function rejected the resolved string value.
    #[error("failed to coerce sitevar `{name}`")]
    Coerce {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Errors surfaced by write-side operations.
#[derive(Debug, Error)]
pub enum VarsWriteError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Lookup facade: the query and write surface for site variables.
pub struct SiteVars {
    vars: Arc<dyn SiteVarRepo>,
    sites: Arc<dyn SiteRepo>,
    cache: Arc<SiteVarCache>,
}

impl SiteVars {
    pub fn new(
        vars: Arc<dyn SiteVarRepo>,
        sites: Arc<dyn SiteRepo>,
        cache: Arc<SiteVarCache>,
    ) -> Self {
        Self { vars, sites, cache }
    }

    pub fn cache(&self) -> &SiteVarCache {
        &self.cache
    }

    /// Resolve a variable to its string value, defaulting to `""`.
    pub async fn get_value(
        &self,
        scope: Option<SiteId>,
        name: &str,
    ) -> Result<String, LookupError> {
        Ok(self
            .get_value_or(scope, name, Some(""))
            .await?
            .unwrap_or_default())
    }

    /// Resolve a variable to its raw string value, substituting `default`
    /// when no row exists. `Ok(None)` only when the variable is absent and
    /// no default was given.
    pub async fn get_value_or(
        &self,
        scope: Option<SiteId>,
        name: &str,
        default: Option<&str>,
    ) -> Result<Option<String>, LookupError> {
        let site = scope.ok_or(LookupError::MissingSiteScope)?;

        if self.cache.is_enabled() {
            let all = self.read_through(site).await?;
            return Ok(all
                .get(name)
                .cloned()
                .or_else(|| default.map(str::to_string)));
        }

        // Cache disabled: a single-row query instead of full materialization.
        match self.vars.get_var(site, name).await {
            Ok(record) => Ok(Some(record.value)),
            Err(RepoError::NotFound) => Ok(default.map(str::to_string)),
            Err(err) => Err(err.into()),
        }
    }

    /// Resolve a variable and coerce it to `T`.
    ///
    /// The coercion runs on the resolved string — cached, freshly queried,
    /// or the substituted default. When the variable is absent and `default`
    /// is `None`, the coercion is skipped entirely and `Ok(None)` is
    /// returned, so callers can pass coercers that would reject an absent
    /// value (`int(None)` in the spiritual ancestor of this code).
    pub async fn get_value_as<T, F, E>(
        &self,
        scope: Option<SiteId>,
        name: &str,
        default: Option<&str>,
        coerce: F,
    ) -> Result<Option<T>, LookupError>
    where
        F: FnOnce(&str) -> Result<T, E>,
        E: std::error::Error + Send + Sync + 'static,
    {
        match self.get_value_or(scope, name, default).await? {
            None => Ok(None),
            Some(raw) => coerce(&raw).map(Some).map_err(|err| LookupError::Coerce {
                name: name.to_string(),
                source: Box::new(err),
            }),
        }
    }

    /// Materialize the full name→value mapping for one site, honoring the
    /// cache policy. This is what gets injected into rendering contexts.
    pub async fn all_for_site(&self, scope: Option<SiteId>) -> Result<SiteVarMap, LookupError> {
        let site = scope.ok_or(LookupError::MissingSiteScope)?;

        if self.cache.is_enabled() {
            return Ok(self.read_through(site).await?.as_ref().clone());
        }

        let records = self.vars.list_vars(site).await?;
        Ok(records.into_iter().map(|v| (v.name, v.value)).collect())
    }

    #[instrument(skip(self), level = "debug")]
    async fn read_through(&self, site: SiteId) -> Result<Arc<SiteVarMap>, RepoError> {
        if let Some(cached) = self.cache.get(site) {
            return Ok(cached);
        }
        let records = self.vars.list_vars(site).await?;
        let mapping: SiteVarMap = records.into_iter().map(|v| (v.name, v.value)).collect();
        let mapping = Arc::new(mapping);
        self.cache.set(site, Arc::clone(&mapping));
        Ok(mapping)
    }

    /// Single record, straight from the store. Admin screens read fresh.
    pub async fn record(&self, site: SiteId, name: &str) -> Result<SiteVarRecord, RepoError> {
        self.vars.get_var(site, name).await
    }

    /// All records for one site, straight from the store, ordered by name.
    pub async fn records_for_site(&self, site: SiteId) -> Result<Vec<SiteVarRecord>, RepoError> {
        self.vars.list_vars(site).await
    }

    /// Create a new variable. Fails with a duplicate error when
    /// `(site, name)` already exists.
    pub async fn create(
        &self,
        site: SiteId,
        name: &str,
        value: &str,
    ) -> Result<SiteVarRecord, VarsWriteError> {
        validate_name(name)?;
        let mut pending = PendingInvalidations::new();
        pending.stage(site);
        let record = self.vars.create_var(site, name, value).await?;
        pending.committed(&self.cache);
        Ok(record)
    }

    /// Update an existing variable's value.
    pub async fn update(
        &self,
        site: SiteId,
        name: &str,
        value: &str,
    ) -> Result<SiteVarRecord, VarsWriteError> {
        let mut pending = PendingInvalidations::new();
        pending.stage(site);
        let record = self.vars.update_var(site, name, value).await?;
        pending.committed(&self.cache);
        Ok(record)
    }

    /// Create-or-update a variable.
    pub async fn set(
        &self,
        site: SiteId,
        name: &str,
        value: &str,
    ) -> Result<SiteVarRecord, VarsWriteError> {
        validate_name(name)?;
        let mut pending = PendingInvalidations::new();
        pending.stage(site);
        let record = self.vars.upsert_var(site, name, value).await?;
        pending.committed(&self.cache);
        Ok(record)
    }

    /// Delete a variable.
    pub async fn remove(&self, site: SiteId, name: &str) -> Result<(), VarsWriteError> {
        let mut pending = PendingInvalidations::new();
        pending.stage(site);
        self.vars.delete_var(site, name).await?;
        pending.committed(&self.cache);
        Ok(())
    }

    /// Delete a site; its variables go with it (schema cascade) and so does
    /// its cache entry.
    pub async fn remove_site(&self, site: SiteId) -> Result<(), VarsWriteError> {
        let mut pending = PendingInvalidations::new();
        pending.stage(site);
        self.sites.delete_site(site).await?;
        pending.committed(&self.cache);
        Ok(())
    }

    /// Clear the cache for one site, or for every known site when no site
    /// is given.
    pub async fn clear_cache(&self, site: Option<SiteId>) -> Result<(), RepoError> {
        match site {
            Some(site) => {
                self.cache.invalidate(site);
            }
            None => {
                for site in self.sites.list_sites().await? {
                    self.cache.invalidate(site.id);
                }
            }
        }
        Ok(())
    }
}
