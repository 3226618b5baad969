use async_trait::async_trait;
use sqlx::query_as;

use crate::{
    application::repos::{RepoError, SiteRepo},
    domain::{SiteId, SiteRecord},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct SiteRow {
    id: i64,
    domain: String,
    name: String,
}

impl From<SiteRow> for SiteRecord {
    fn from(row: SiteRow) -> Self {
        Self {
            id: SiteId(row.id),
            domain: row.domain,
            name: row.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SiteWithCountRow {
    id: i64,
    domain: String,
    name: String,
    var_count: i64,
}

#[async_trait]
impl SiteRepo for PostgresRepositories {
    async fn list_sites(&self) -> Result<Vec<SiteRecord>, RepoError> {
        let rows = query_as::<_, SiteRow>("SELECT id, domain, name FROM sites ORDER BY domain")
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(SiteRecord::from).collect())
    }

    async fn list_sites_with_counts(&self) -> Result<Vec<(SiteRecord, i64)>, RepoError> {
        let rows = query_as::<_, SiteWithCountRow>(
            "SELECT s.id, s.domain, s.name, COUNT(v.id) AS var_count \
             FROM sites s \
             LEFT JOIN site_vars v ON v.site_id = s.id \
             GROUP BY s.id, s.domain, s.name \
             ORDER BY s.domain",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    SiteRecord {
                        id: SiteId(row.id),
                        domain: row.domain,
                        name: row.name,
                    },
                    row.var_count,
                )
            })
            .collect())
    }

    async fn find_site(&self, site: SiteId) -> Result<SiteRecord, RepoError> {
        let row = query_as::<_, SiteRow>("SELECT id, domain, name FROM sites WHERE id = $1")
            .bind(site.0)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(SiteRecord::from).ok_or(RepoError::NotFound)
    }

    async fn find_site_by_domain(&self, domain: &str) -> Result<SiteRecord, RepoError> {
        let row = query_as::<_, SiteRow>("SELECT id, domain, name FROM sites WHERE domain = $1")
            .bind(domain)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(SiteRecord::from).ok_or(RepoError::NotFound)
    }

    async fn create_site(&self, domain: &str, name: &str) -> Result<SiteRecord, RepoError> {
        let row = query_as::<_, SiteRow>(
            "INSERT INTO sites (domain, name) VALUES ($1, $2) RETURNING id, domain, name",
        )
        .bind(domain)
        .bind(name)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn delete_site(&self, site: SiteId) -> Result<(), RepoError> {
        // Variables cascade at the schema level.
        let result = sqlx::query("DELETE FROM sites WHERE id = $1")
            .bind(site.0)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
