//! Admin surface: server-rendered CRUD for sites and their variables.

mod cache;
mod dashboard;
mod sites;
mod vars;

use axum::{
    Router,
    routing::{get, post},
};

use super::state::HttpState;

pub fn routes() -> Router<HttpState> {
    Router::new()
        .route("/", get(dashboard::admin_dashboard))
        .route("/sites/new", get(sites::admin_site_new))
        .route("/sites/create", post(sites::admin_site_create))
        .route("/sites/{site_id}/delete", post(sites::admin_site_delete))
        .route("/sites/{site_id}/vars", get(vars::admin_site_vars))
        .route("/sites/{site_id}/vars/new", get(vars::admin_var_new))
        .route("/sites/{site_id}/vars/create", post(vars::admin_var_create))
        .route(
            "/sites/{site_id}/vars/{name}/edit",
            get(vars::admin_var_edit),
        )
        .route("/sites/{site_id}/vars/{name}", post(vars::admin_var_update))
        .route(
            "/sites/{site_id}/vars/{name}/delete",
            post(vars::admin_var_delete),
        )
        .route("/cache/flush", post(cache::admin_cache_flush))
}
