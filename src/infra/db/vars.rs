use async_trait::async_trait;
use sqlx::query_as;
use time::OffsetDateTime;

use crate::{
    application::repos::{RepoError, SiteVarRepo},
    domain::{SiteId, SiteVarRecord},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct SiteVarRow {
    site_id: i64,
    name: String,
    value: String,
    updated_at: OffsetDateTime,
}

impl From<SiteVarRow> for SiteVarRecord {
    fn from(row: SiteVarRow) -> Self {
        Self {
            site_id: SiteId(row.site_id),
            name: row.name,
            value: row.value,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str = "site_id, name, value, updated_at";

#[async_trait]
impl SiteVarRepo for PostgresRepositories {
    async fn get_var(&self, site: SiteId, name: &str) -> Result<SiteVarRecord, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM site_vars WHERE site_id = $1 AND name = $2");
        let row = query_as::<_, SiteVarRow>(&sql)
            .bind(site.0)
            .bind(name)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(SiteVarRecord::from).ok_or(RepoError::NotFound)
    }

    async fn list_vars(&self, site: SiteId) -> Result<Vec<SiteVarRecord>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM site_vars WHERE site_id = $1 ORDER BY name");
        let rows = query_as::<_, SiteVarRow>(&sql)
            .bind(site.0)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(SiteVarRecord::from).collect())
    }

    async fn create_var(
        &self,
        site: SiteId,
        name: &str,
        value: &str,
    ) -> Result<SiteVarRecord, RepoError> {
        let sql = format!(
            "INSERT INTO site_vars (site_id, name, value) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let row = query_as::<_, SiteVarRow>(&sql)
            .bind(site.0)
            .bind(name)
            .bind(value)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_var(
        &self,
        site: SiteId,
        name: &str,
        value: &str,
    ) -> Result<SiteVarRecord, RepoError> {
        let sql = format!(
            "UPDATE site_vars SET value = $3, updated_at = now() \
             WHERE site_id = $1 AND name = $2 \
             RETURNING {COLUMNS}"
        );
        let row = query_as::<_, SiteVarRow>(&sql)
            .bind(site.0)
            .bind(name)
            .bind(value)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(SiteVarRecord::from).ok_or(RepoError::NotFound)
    }

    async fn upsert_var(
        &self,
        site: SiteId,
        name: &str,
        value: &str,
    ) -> Result<SiteVarRecord, RepoError> {
        let sql = format!(
            "INSERT INTO site_vars (site_id, name, value) VALUES ($1, $2, $3) \
             ON CONFLICT (site_id, name) DO UPDATE \
             SET value = EXCLUDED.value, updated_at = now() \
             RETURNING {COLUMNS}"
        );
        let row = query_as::<_, SiteVarRow>(&sql)
            .bind(site.0)
            .bind(name)
            .bind(value)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn delete_var(&self, site: SiteId, name: &str) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM site_vars WHERE site_id = $1 AND name = $2")
            .bind(site.0)
            .bind(name)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
