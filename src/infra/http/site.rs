//! Site resolution: map the request's Host header to a site row.

use axum::{
    extract::{Request, State},
    http::header::HOST,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::application::repos::RepoError;
use crate::domain::{SiteId, SiteRecord};

use super::state::HttpState;

/// The site scope carried by every request. `None` means the Host header
/// matched no site and no default host resolved; lookups on such requests
/// fail with a missing-scope error.
#[derive(Clone, Debug)]
pub struct SiteScope(pub Option<SiteRecord>);

impl SiteScope {
    pub fn id(&self) -> Option<SiteId> {
        self.0.as_ref().map(|site| site.id)
    }
}

pub async fn resolve_site(
    State(state): State<HttpState>,
    mut request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(strip_port)
        .map(str::to_string);

    let resolved = lookup(&state, host.as_deref()).await;
    request.extensions_mut().insert(SiteScope(resolved));
    next.run(request).await
}

async fn lookup(state: &HttpState, host: Option<&str>) -> Option<SiteRecord> {
    if let Some(host) = host {
        match state.sites.find_site_by_domain(host).await {
            Ok(site) => return Some(site),
            Err(RepoError::NotFound) => {}
            Err(err) => {
                warn!(host, error = %err, "Site resolution query failed");
                return None;
            }
        }
    }

    let fallback = state.default_host.as_deref()?;
    if Some(fallback) == host {
        return None;
    }
    match state.sites.find_site_by_domain(fallback).await {
        Ok(site) => Some(site),
        Err(RepoError::NotFound) => None,
        Err(err) => {
            warn!(host = fallback, error = %err, "Default site resolution query failed");
            None
        }
    }
}

/// `example.com:3000` → `example.com`, `[::1]:3000` → `::1`.
fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        // Bracketed IPv6 literal, with or without a port.
        return rest.split(']').next().unwrap_or(rest);
    }
    match host.rsplit_once(':') {
        // A second colon means a bare IPv6 literal, not host:port.
        Some((name, _)) if !name.contains(':') => name,
        _ => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_port_suffix() {
        assert_eq!(strip_port("example.com:3000"), "example.com");
        assert_eq!(strip_port("example.com"), "example.com");
    }

    #[test]
    fn handles_ipv6_hosts() {
        assert_eq!(strip_port("[::1]:3000"), "::1");
        assert_eq!(strip_port("[::1]"), "::1");
        assert_eq!(strip_port("::1"), "::1");
        assert_eq!(strip_port("127.0.0.1:3000"), "127.0.0.1");
    }
}
