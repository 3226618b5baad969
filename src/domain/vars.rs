//! Site variables: named string values scoped to one site.
//!
//! The `(site_id, name)` pair is unique; the value is an arbitrary string.
//! Interpretation of the value (int, JSON, ...) is the caller's concern and
//! happens through the lookup facade's coercion parameter.

use std::collections::BTreeMap;

use serde::Serialize;
use time::OffsetDateTime;

use super::error::DomainError;
use super::sites::SiteId;

/// Upper bound on variable names, matching the `VARCHAR(100)` column.
pub const NAME_MAX_LEN: usize = 100;

/// The full name→value mapping for one site, as cached and as injected into
/// rendering contexts.
pub type SiteVarMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteVarRecord {
    pub site_id: SiteId,
    pub name: String,
    pub value: String,
    pub updated_at: OffsetDateTime,
}

/// Validate a variable name before it reaches the store.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("variable name must not be empty"));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(DomainError::validation(format!(
            "variable name exceeds {NAME_MAX_LEN} characters"
        )));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(DomainError::validation(
            "variable name must not contain whitespace",
        ));
    }
    Ok(())
}
