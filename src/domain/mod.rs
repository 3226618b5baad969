//! Domain layer types and invariants.

pub mod error;
pub mod sites;
pub mod vars;

pub use error::DomainError;
pub use sites::{SiteId, SiteRecord};
pub use vars::{NAME_MAX_LEN, SiteVarMap, SiteVarRecord, validate_name};
