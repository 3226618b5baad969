use std::sync::Arc;

use async_trait::async_trait;

use crate::application::repos::{RepoError, SiteRepo};
use crate::application::vars::SiteVars;
use crate::infra::db::PostgresRepositories;

/// Liveness seam so the health endpoint works against any backing store.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}

#[async_trait]
impl HealthProbe for PostgresRepositories {
    async fn ping(&self) -> Result<(), RepoError> {
        self.health_check()
            .await
            .map_err(RepoError::from_persistence)
    }
}

#[derive(Clone)]
pub struct HttpState {
    pub vars: Arc<SiteVars>,
    pub sites: Arc<dyn SiteRepo>,
    pub health: Arc<dyn HealthProbe>,
    /// Fallback hostname consulted when the Host header matches no site.
    pub default_host: Option<String>,
    /// Whether the context-injection surface is mounted.
    pub context_inject: bool,
}
