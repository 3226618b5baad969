//! HTTP surface: router assembly, site resolution, API and admin handlers.

pub mod admin;
pub mod api;
mod middleware;
pub mod site;
mod state;

pub use state::{HealthProbe, HttpState};

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
};

use self::middleware::log_responses;

/// Assemble the full router: JSON API at the root, admin surface under
/// `/admin`, site resolution applied to every request, response logging
/// outermost so it observes the final status.
pub fn build_router(state: HttpState) -> Router {
    let routes = Router::new()
        .merge(api::routes(&state))
        .nest("/admin", admin::routes())
        .layer(from_fn_with_state(state.clone(), site::resolve_site))
        .layer(from_fn(log_responses));

    routes.with_state(state)
}
