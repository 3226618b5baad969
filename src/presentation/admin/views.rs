//! View structs for the admin surface.

use askama::Template;
use time::{OffsetDateTime, macros::format_description};

use crate::domain::{SiteRecord, SiteVarRecord};

pub fn format_timestamp(ts: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute] UTC");
    ts.format(&format).unwrap_or_else(|_| ts.to_string())
}

#[derive(Clone)]
pub struct SiteView {
    pub id: i64,
    pub domain: String,
    pub name: String,
}

impl From<&SiteRecord> for SiteView {
    fn from(record: &SiteRecord) -> Self {
        Self {
            id: record.id.0,
            domain: record.domain.clone(),
            name: record.name.clone(),
        }
    }
}

#[derive(Clone)]
pub struct SiteSummaryView {
    pub site: SiteView,
    pub var_count: i64,
    pub vars_href: String,
    pub delete_action: String,
}

impl SiteSummaryView {
    pub fn new(record: &SiteRecord, var_count: i64) -> Self {
        let id = record.id.0;
        Self {
            site: SiteView::from(record),
            var_count,
            vars_href: format!("/admin/sites/{id}/vars"),
            delete_action: format!("/admin/sites/{id}/delete"),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub sites: Vec<SiteSummaryView>,
    pub cache_enabled: bool,
}

#[derive(Clone)]
pub struct VarView {
    pub name: String,
    pub value: String,
    pub updated_at: String,
    pub edit_href: String,
    pub delete_action: String,
}

impl VarView {
    pub fn new(record: &SiteVarRecord) -> Self {
        let site = record.site_id.0;
        let name = &record.name;
        Self {
            name: record.name.clone(),
            value: record.value.clone(),
            updated_at: format_timestamp(record.updated_at),
            edit_href: format!("/admin/sites/{site}/vars/{name}/edit"),
            delete_action: format!("/admin/sites/{site}/vars/{name}/delete"),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/site_vars.html")]
pub struct AdminSiteVarsTemplate {
    pub site: SiteView,
    pub vars: Vec<VarView>,
    pub new_href: String,
}

#[derive(Template)]
#[template(path = "admin/var_form.html")]
pub struct AdminVarFormTemplate {
    pub site: SiteView,
    pub heading: String,
    pub form_action: String,
    pub name: String,
    pub value: String,
    pub name_editable: bool,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/site_form.html")]
pub struct AdminSiteFormTemplate {
    pub form_action: String,
    pub domain: String,
    pub name: String,
    pub error: Option<String>,
}
