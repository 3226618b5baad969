use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::application::error::{repo_http_error, write_http_error};
use crate::application::repos::RepoError;
use crate::domain::SiteId;
use crate::presentation::admin::views::AdminSiteFormTemplate;
use crate::presentation::views::render_template_response;

use super::super::state::HttpState;

const SOURCE: &str = "infra::http::admin_sites";

#[derive(Debug, Deserialize)]
pub(crate) struct SiteForm {
    pub domain: String,
    #[serde(default)]
    pub name: String,
}

fn site_form_template(form: &SiteForm, error: Option<String>) -> AdminSiteFormTemplate {
    AdminSiteFormTemplate {
        form_action: "/admin/sites/create".to_string(),
        domain: form.domain.clone(),
        name: form.name.clone(),
        error,
    }
}

pub(crate) async fn admin_site_new() -> Response {
    let form = SiteForm {
        domain: String::new(),
        name: String::new(),
    };
    render_template_response(site_form_template(&form, None), StatusCode::OK)
}

pub(crate) async fn admin_site_create(
    State(state): State<HttpState>,
    Form(form): Form<SiteForm>,
) -> Response {
    let domain = form.domain.trim();
    if domain.is_empty() {
        return render_template_response(
            site_form_template(&form, Some("Domain must not be empty.".to_string())),
            StatusCode::OK,
        );
    }

    match state.sites.create_site(domain, form.name.trim()).await {
        Ok(_) => Redirect::to("/admin").into_response(),
        Err(err) if err.is_duplicate() => render_template_response(
            site_form_template(
                &form,
                Some(format!("A site with domain `{domain}` already exists.")),
            ),
            StatusCode::OK,
        ),
        Err(err) => repo_http_error(SOURCE, err).into_response(),
    }
}

pub(crate) async fn admin_site_delete(
    State(state): State<HttpState>,
    Path(site_id): Path<i64>,
) -> Response {
    match state.vars.remove_site(SiteId(site_id)).await {
        Ok(()) => Redirect::to("/admin").into_response(),
        Err(err) => write_http_error(SOURCE, err).into_response(),
    }
}

pub(crate) async fn find_site_or_404(
    state: &HttpState,
    site_id: i64,
) -> Result<crate::domain::SiteRecord, Response> {
    match state.sites.find_site(SiteId(site_id)).await {
        Ok(site) => Ok(site),
        Err(RepoError::NotFound) => {
            Err(repo_http_error(SOURCE, RepoError::NotFound).into_response())
        }
        Err(err) => Err(repo_http_error(SOURCE, err).into_response()),
    }
}
