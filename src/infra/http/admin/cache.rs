use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use crate::application::error::repo_http_error;

use super::super::state::HttpState;

/// Clear the cache for every known site.
pub(crate) async fn admin_cache_flush(State(state): State<HttpState>) -> Response {
    match state.vars.clear_cache(None).await {
        Ok(()) => Redirect::to("/admin").into_response(),
        Err(err) => repo_http_error("infra::http::admin_cache_flush", err).into_response(),
    }
}
