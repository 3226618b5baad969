//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{SiteId, SiteRecord, SiteVarRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Durable storage for site variables. `(site_id, name)` is unique; creating
/// a duplicate pair fails with [`RepoError::Duplicate`].
#[async_trait]
pub trait SiteVarRepo: Send + Sync {
    /// Single-record lookup. Fails with [`RepoError::NotFound`] when absent.
    async fn get_var(&self, site: SiteId, name: &str) -> Result<SiteVarRecord, RepoError>;

    /// All variables for one site, ordered by name.
    async fn list_vars(&self, site: SiteId) -> Result<Vec<SiteVarRecord>, RepoError>;

    async fn create_var(
        &self,
        site: SiteId,
        name: &str,
        value: &str,
    ) -> Result<SiteVarRecord, RepoError>;

    /// Update an existing variable. Fails with [`RepoError::NotFound`] when
    /// the pair does not exist.
    async fn update_var(
        &self,
        site: SiteId,
        name: &str,
        value: &str,
    ) -> Result<SiteVarRecord, RepoError>;

    /// Create-or-update in one statement.
    async fn upsert_var(
        &self,
        site: SiteId,
        name: &str,
        value: &str,
    ) -> Result<SiteVarRecord, RepoError>;

    async fn delete_var(&self, site: SiteId, name: &str) -> Result<(), RepoError>;
}

/// Read access to the externally owned site table, plus the minimal CRUD the
/// admin surface needs. Deleting a site cascades to its variables at the
/// schema level.
#[async_trait]
pub trait SiteRepo: Send + Sync {
    async fn list_sites(&self) -> Result<Vec<SiteRecord>, RepoError>;

    /// Sites paired with their variable counts, for the admin dashboard.
    async fn list_sites_with_counts(&self) -> Result<Vec<(SiteRecord, i64)>, RepoError>;

    async fn find_site(&self, site: SiteId) -> Result<SiteRecord, RepoError>;

    async fn find_site_by_domain(&self, domain: &str) -> Result<SiteRecord, RepoError>;

    async fn create_site(&self, domain: &str, name: &str) -> Result<SiteRecord, RepoError>;

    async fn delete_site(&self, site: SiteId) -> Result<(), RepoError>;
}
