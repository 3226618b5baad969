#![allow(dead_code)]

//! Shared test fixtures: an in-memory repository double with query counters
//! and write-failure injection, plus builders for the facade and HTTP state.

use std::collections::BTreeMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use time::OffsetDateTime;

use sitevars::application::repos::{RepoError, SiteRepo, SiteVarRepo};
use sitevars::application::vars::SiteVars;
use sitevars::cache::{CacheConfig, SiteVarCache};
use sitevars::domain::{SiteId, SiteRecord, SiteVarRecord};
use sitevars::infra::http::{HealthProbe, HttpState};

#[derive(Default)]
struct Tables {
    sites: BTreeMap<i64, SiteRecord>,
    vars: BTreeMap<(i64, String), SiteVarRecord>,
    next_site_id: i64,
}

/// In-memory stand-in for the Postgres repositories.
///
/// Counts store queries so tests can assert whether a read was served from
/// the cache, and injects write failures so tests can assert that a failed
/// write leaves the cache untouched.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    list_var_queries: AtomicUsize,
    get_var_queries: AtomicUsize,
    fail_writes: AtomicBool,
    fail_ping: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed_site(&self, domain: &str, name: &str) -> SiteRecord {
        let mut tables = self.tables.lock().unwrap();
        tables.next_site_id += 1;
        let record = SiteRecord {
            id: SiteId(tables.next_site_id),
            domain: domain.to_string(),
            name: name.to_string(),
        };
        tables.sites.insert(record.id.0, record.clone());
        record
    }

    pub fn seed_var(&self, site: SiteId, name: &str, value: &str) {
        let mut tables = self.tables.lock().unwrap();
        tables
            .vars
            .insert((site.0, name.to_string()), make_record(site, name, value));
    }

    pub fn stored_value(&self, site: SiteId, name: &str) -> Option<String> {
        let tables = self.tables.lock().unwrap();
        tables
            .vars
            .get(&(site.0, name.to_string()))
            .map(|record| record.value.clone())
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_ping(&self, fail: bool) {
        self.fail_ping.store(fail, Ordering::SeqCst);
    }

    pub fn list_var_query_count(&self) -> usize {
        self.list_var_queries.load(Ordering::SeqCst)
    }

    pub fn get_var_query_count(&self) -> usize {
        self.get_var_queries.load(Ordering::SeqCst)
    }

    fn write_gate(&self) -> Result<(), RepoError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(RepoError::Persistence("injected write failure".to_string()))
        } else {
            Ok(())
        }
    }
}

fn make_record(site: SiteId, name: &str, value: &str) -> SiteVarRecord {
    SiteVarRecord {
        site_id: site,
        name: name.to_string(),
        value: value.to_string(),
        updated_at: OffsetDateTime::now_utc(),
    }
}

#[async_trait]
impl SiteVarRepo for InMemoryStore {
    async fn get_var(&self, site: SiteId, name: &str) -> Result<SiteVarRecord, RepoError> {
        self.get_var_queries.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.lock().unwrap();
        tables
            .vars
            .get(&(site.0, name.to_string()))
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn list_vars(&self, site: SiteId) -> Result<Vec<SiteVarRecord>, RepoError> {
        self.list_var_queries.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .vars
            .iter()
            .filter(|((site_id, _), _)| *site_id == site.0)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn create_var(
        &self,
        site: SiteId,
        name: &str,
        value: &str,
    ) -> Result<SiteVarRecord, RepoError> {
        self.write_gate()?;
        let mut tables = self.tables.lock().unwrap();
        let key = (site.0, name.to_string());
        if tables.vars.contains_key(&key) {
            return Err(RepoError::Duplicate {
                constraint: "site_vars_site_id_name_key".to_string(),
            });
        }
        let record = make_record(site, name, value);
        tables.vars.insert(key, record.clone());
        Ok(record)
    }

    async fn update_var(
        &self,
        site: SiteId,
        name: &str,
        value: &str,
    ) -> Result<SiteVarRecord, RepoError> {
        self.write_gate()?;
        let mut tables = self.tables.lock().unwrap();
        let key = (site.0, name.to_string());
        if !tables.vars.contains_key(&key) {
            return Err(RepoError::NotFound);
        }
        let record = make_record(site, name, value);
        tables.vars.insert(key, record.clone());
        Ok(record)
    }

    async fn upsert_var(
        &self,
        site: SiteId,
        name: &str,
        value: &str,
    ) -> Result<SiteVarRecord, RepoError> {
        self.write_gate()?;
        let mut tables = self.tables.lock().unwrap();
        let record = make_record(site, name, value);
        tables.vars.insert((site.0, name.to_string()), record.clone());
        Ok(record)
    }

    async fn delete_var(&self, site: SiteId, name: &str) -> Result<(), RepoError> {
        self.write_gate()?;
        let mut tables = self.tables.lock().unwrap();
        tables
            .vars
            .remove(&(site.0, name.to_string()))
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl SiteRepo for InMemoryStore {
    async fn list_sites(&self) -> Result<Vec<SiteRecord>, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.sites.values().cloned().collect())
    }

    async fn list_sites_with_counts(&self) -> Result<Vec<(SiteRecord, i64)>, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .sites
            .values()
            .map(|site| {
                let count = tables
                    .vars
                    .keys()
                    .filter(|(site_id, _)| *site_id == site.id.0)
                    .count() as i64;
                (site.clone(), count)
            })
            .collect())
    }

    async fn find_site(&self, site: SiteId) -> Result<SiteRecord, RepoError> {
        let tables = self.tables.lock().unwrap();
        tables.sites.get(&site.0).cloned().ok_or(RepoError::NotFound)
    }

    async fn find_site_by_domain(&self, domain: &str) -> Result<SiteRecord, RepoError> {
        let tables = self.tables.lock().unwrap();
        tables
            .sites
            .values()
            .find(|site| site.domain == domain)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn create_site(&self, domain: &str, name: &str) -> Result<SiteRecord, RepoError> {
        self.write_gate()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.sites.values().any(|site| site.domain == domain) {
            return Err(RepoError::Duplicate {
                constraint: "sites_domain_key".to_string(),
            });
        }
        tables.next_site_id += 1;
        let record = SiteRecord {
            id: SiteId(tables.next_site_id),
            domain: domain.to_string(),
            name: name.to_string(),
        };
        tables.sites.insert(record.id.0, record.clone());
        Ok(record)
    }

    async fn delete_site(&self, site: SiteId) -> Result<(), RepoError> {
        self.write_gate()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.sites.remove(&site.0).is_none() {
            return Err(RepoError::NotFound);
        }
        // Variables cascade with the site, as the schema does.
        tables.vars.retain(|(site_id, _), _| *site_id != site.0);
        Ok(())
    }
}

#[async_trait]
impl HealthProbe for InMemoryStore {
    async fn ping(&self) -> Result<(), RepoError> {
        if self.fail_ping.load(Ordering::SeqCst) {
            Err(RepoError::Persistence("injected ping failure".to_string()))
        } else {
            Ok(())
        }
    }
}

pub fn cache_with(enabled: bool) -> Arc<SiteVarCache> {
    Arc::new(SiteVarCache::new(&CacheConfig {
        enabled,
        site_limit: 64,
    }))
}

pub fn facade(store: &Arc<InMemoryStore>, cache: &Arc<SiteVarCache>) -> Arc<SiteVars> {
    Arc::new(SiteVars::new(store.clone(), store.clone(), cache.clone()))
}

pub fn http_state(
    store: &Arc<InMemoryStore>,
    cache: &Arc<SiteVarCache>,
    default_host: Option<&str>,
    context_inject: bool,
) -> HttpState {
    HttpState {
        vars: facade(store, cache),
        sites: store.clone(),
        health: store.clone(),
        default_host: default_host.map(str::to_string),
        context_inject,
    }
}
