//! sitevars: per-site key/value configuration variables for multi-tenant
//! web applications.
//!
//! A small relational table keyed by `(site, name)`, a read-through cache of
//! each site's full mapping with invalidation deferred to commit, a lookup
//! facade with defaults and typed coercion, and an admin surface for editing.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
