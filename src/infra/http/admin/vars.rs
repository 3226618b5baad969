use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::application::error::{repo_http_error, write_http_error};
use crate::application::vars::VarsWriteError;
use crate::domain::{SiteId, SiteRecord};
use crate::presentation::admin::views::{AdminSiteVarsTemplate, AdminVarFormTemplate, SiteView, VarView};
use crate::presentation::views::render_template_response;

use super::super::state::HttpState;
use super::sites::find_site_or_404;

const SOURCE: &str = "infra::http::admin_vars";

#[derive(Debug, Deserialize)]
pub(crate) struct VarForm {
    pub name: String,
    pub value: String,
}

pub(crate) async fn admin_site_vars(
    State(state): State<HttpState>,
    Path(site_id): Path<i64>,
) -> Response {
    let site = match find_site_or_404(&state, site_id).await {
        Ok(site) => site,
        Err(response) => return response,
    };

    let records = match state.vars.records_for_site(site.id).await {
        Ok(records) => records,
        Err(err) => return repo_http_error(SOURCE, err).into_response(),
    };

    render_template_response(
        AdminSiteVarsTemplate {
            new_href: format!("/admin/sites/{site_id}/vars/new"),
            site: SiteView::from(&site),
            vars: records.iter().map(VarView::new).collect(),
        },
        StatusCode::OK,
    )
}

fn create_form_template(
    site: &SiteRecord,
    form: &VarForm,
    error: Option<String>,
) -> AdminVarFormTemplate {
    AdminVarFormTemplate {
        heading: "Add variable".to_string(),
        form_action: format!("/admin/sites/{}/vars/create", site.id),
        site: SiteView::from(site),
        name: form.name.clone(),
        value: form.value.clone(),
        name_editable: true,
        error,
    }
}

fn edit_form_template(
    site: &SiteRecord,
    name: &str,
    value: &str,
    error: Option<String>,
) -> AdminVarFormTemplate {
    AdminVarFormTemplate {
        heading: format!("Edit `{name}`"),
        form_action: format!("/admin/sites/{}/vars/{name}", site.id),
        site: SiteView::from(site),
        name: name.to_string(),
        value: value.to_string(),
        name_editable: false,
        error,
    }
}

pub(crate) async fn admin_var_new(
    State(state): State<HttpState>,
    Path(site_id): Path<i64>,
) -> Response {
    let site = match find_site_or_404(&state, site_id).await {
        Ok(site) => site,
        Err(response) => return response,
    };

    let form = VarForm {
        name: String::new(),
        value: String::new(),
    };
    render_template_response(create_form_template(&site, &form, None), StatusCode::OK)
}

pub(crate) async fn admin_var_create(
    State(state): State<HttpState>,
    Path(site_id): Path<i64>,
    Form(form): Form<VarForm>,
) -> Response {
    let site = match find_site_or_404(&state, site_id).await {
        Ok(site) => site,
        Err(response) => return response,
    };

    match state.vars.create(site.id, &form.name, &form.value).await {
        Ok(_) => Redirect::to(&format!("/admin/sites/{site_id}/vars")).into_response(),
        Err(VarsWriteError::Domain(domain)) => render_template_response(
            create_form_template(&site, &form, Some(domain.to_string())),
            StatusCode::OK,
        ),
        Err(VarsWriteError::Repo(repo)) if repo.is_duplicate() => {
            let message = format!(
                "A variable named `{}` already exists for this site.",
                form.name
            );
            render_template_response(
                create_form_template(&site, &form, Some(message)),
                StatusCode::OK,
            )
        }
        Err(err) => write_http_error(SOURCE, err).into_response(),
    }
}

pub(crate) async fn admin_var_edit(
    State(state): State<HttpState>,
    Path((site_id, name)): Path<(i64, String)>,
) -> Response {
    let site = match find_site_or_404(&state, site_id).await {
        Ok(site) => site,
        Err(response) => return response,
    };

    let record = match state.vars.record(SiteId(site_id), &name).await {
        Ok(record) => record,
        Err(err) => return repo_http_error(SOURCE, err).into_response(),
    };

    render_template_response(
        edit_form_template(&site, &record.name, &record.value, None),
        StatusCode::OK,
    )
}

pub(crate) async fn admin_var_update(
    State(state): State<HttpState>,
    Path((site_id, name)): Path<(i64, String)>,
    Form(form): Form<VarForm>,
) -> Response {
    match state.vars.update(SiteId(site_id), &name, &form.value).await {
        Ok(_) => Redirect::to(&format!("/admin/sites/{site_id}/vars")).into_response(),
        Err(err) => write_http_error(SOURCE, err).into_response(),
    }
}

pub(crate) async fn admin_var_delete(
    State(state): State<HttpState>,
    Path((site_id, name)): Path<(i64, String)>,
) -> Response {
    match state.vars.remove(SiteId(site_id), &name).await {
        Ok(()) => Redirect::to(&format!("/admin/sites/{site_id}/vars")).into_response(),
        Err(err) => write_http_error(SOURCE, err).into_response(),
    }
}
