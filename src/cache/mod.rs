//! Read-through cache for per-site variable mappings.
//!
//! Each entry holds the full name→value mapping for one site, populated
//! lazily on miss from the variable store and replaced wholesale. There is
//! no TTL; invalidation is purely event-driven and deferred until the write
//! that triggered it has committed (see [`PendingInvalidations`]).
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! site_limit = 512
//! ```

mod config;
mod keys;
mod pending;
mod store;

pub use config::CacheConfig;
pub use keys::cache_key;
pub use pending::PendingInvalidations;
pub use store::SiteVarCache;
