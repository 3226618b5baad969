//! Application layer: services, repository seams, and error surfaces.

pub mod checks;
pub mod context;
pub mod error;
pub mod repos;
pub mod vars;

pub use vars::{LookupError, SiteVars, VarsWriteError};
