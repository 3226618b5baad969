use crate::application::repos::RepoError;

/// Constraint names declared by the migrations. Driver errors are classified
/// by the constraint they report rather than by message sniffing.
pub(crate) const SITE_VAR_NAME_KEY: &str = "site_vars_site_id_name_key";
pub(crate) const SITE_DOMAIN_KEY: &str = "sites_domain_key";
pub(crate) const SITE_VAR_SITE_FK: &str = "site_vars_site_id_fkey";

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db) => classify_database_error(db.constraint(), db.message()),
        other => RepoError::from_persistence(other),
    }
}

fn classify_database_error(constraint: Option<&str>, message: &str) -> RepoError {
    match constraint {
        Some(constraint @ (SITE_VAR_NAME_KEY | SITE_DOMAIN_KEY)) => RepoError::Duplicate {
            constraint: constraint.to_string(),
        },
        Some(SITE_VAR_SITE_FK) => RepoError::InvalidInput {
            message: "referenced site does not exist".to_string(),
        },
        _ => RepoError::from_persistence(message),
    }
}
