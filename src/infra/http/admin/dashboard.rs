use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::error::repo_http_error;
use crate::presentation::admin::views::{AdminDashboardTemplate, SiteSummaryView};
use crate::presentation::views::render_template_response;

use super::super::state::HttpState;

const SOURCE: &str = "infra::http::admin_dashboard";

pub(crate) async fn admin_dashboard(State(state): State<HttpState>) -> Response {
    let sites = match state.sites.list_sites_with_counts().await {
        Ok(sites) => sites,
        Err(err) => return repo_http_error(SOURCE, err).into_response(),
    };

    let sites = sites
        .iter()
        .map(|(record, count)| SiteSummaryView::new(record, *count))
        .collect();

    render_template_response(
        AdminDashboardTemplate {
            sites,
            cache_enabled: state.vars.cache().is_enabled(),
        },
        StatusCode::OK,
    )
}
