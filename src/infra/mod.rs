//! Infrastructure: persistence, telemetry, and the HTTP surface.

pub mod db;
pub mod error;
pub mod http;
pub mod telemetry;
