//! Advisory deployment checks.
//!
//! Run once at startup; each finding is logged as a warning and the service
//! keeps running. A misconfigured deployment is degraded, never refused.

use tracing::warn;

use crate::config::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckWarning {
    pub id: &'static str,
    pub message: String,
    pub hint: Option<String>,
}

impl CheckWarning {
    fn new(id: &'static str, message: impl Into<String>, hint: Option<&str>) -> Self {
        Self {
            id,
            message: message.into(),
            hint: hint.map(str::to_string),
        }
    }
}

/// Statically validate the deployment configuration.
pub fn run_startup_checks(settings: &Settings) -> Vec<CheckWarning> {
    let mut warnings = Vec::new();

    if settings.sites.default_host.is_none() {
        warnings.push(CheckWarning::new(
            "sitevars.W001",
            "no default site host configured",
            Some(
                "requests whose Host header matches no site row will carry no site scope \
                 and every lookup on them will fail; set [sites] default_host",
            ),
        ));
    }

    if !settings.context.inject {
        warnings.push(CheckWarning::new(
            "sitevars.W002",
            "context injection is disabled",
            Some(
                "the /api/context surface will not be mounted; template layers expecting \
                 injected site variables will render without them",
            ),
        ));
    }

    if !settings.cache.enabled {
        warnings.push(CheckWarning::new(
            "sitevars.W003",
            "variable cache is disabled",
            Some("every lookup will query the store directly"),
        ));
    }

    warnings
}

/// Log each warning. Advisory only.
pub fn report(warnings: &[CheckWarning]) {
    for warning in warnings {
        warn!(
            check = warning.id,
            hint = warning.hint.as_deref().unwrap_or(""),
            "{}",
            warning.message
        );
    }
}
