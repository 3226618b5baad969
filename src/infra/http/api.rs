//! JSON API for consuming applications.

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::application::context::inject_sitevars;
use crate::application::error::lookup_http_error;

use super::site::SiteScope;
use super::state::HttpState;

pub fn routes(state: &HttpState) -> Router<HttpState> {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/api/vars/{name}", get(api_var));

    // The context-injection surface is only mounted when enabled; the
    // startup checks warn when it is off.
    if state.context_inject {
        router = router.route("/api/context", get(api_context));
    }

    router
}

/// Full materialization of the resolved site's variables, for merging into
/// a template rendering context.
async fn api_context(
    State(state): State<HttpState>,
    Extension(scope): Extension<SiteScope>,
) -> Response {
    match inject_sitevars(&state.vars, scope.id()).await {
        Ok(mapping) => Json(mapping).into_response(),
        Err(err) => lookup_http_error("infra::http::api_context", err).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct VarQuery {
    default: Option<String>,
}

async fn api_var(
    State(state): State<HttpState>,
    Extension(scope): Extension<SiteScope>,
    Path(name): Path<String>,
    Query(query): Query<VarQuery>,
) -> Response {
    match state
        .vars
        .get_value_or(scope.id(), &name, query.default.as_deref())
        .await
    {
        Ok(value) => Json(json!({ "name": name, "value": value })).into_response(),
        Err(err) => lookup_http_error("infra::http::api_var", err).into_response(),
    }
}

async fn health(State(state): State<HttpState>) -> Response {
    match state.health.ping().await {
        Ok(()) => (StatusCode::OK, "ok").into_response(),
        Err(err) => {
            error!(error = %err, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable").into_response()
        }
    }
}
