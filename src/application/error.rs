use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    application::repos::RepoError,
    application::vars::{LookupError, VarsWriteError},
    infra::error::InfraError,
};

/// Top-level application error for the binary's run path.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("{0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

/// Diagnostic detail attached to error responses for the logging middleware.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// An error ready to be rendered as an HTTP response: a public message for
/// the client, a detailed report for the logs.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    public_message: &'static str,
    report: ErrorReport,
}

impl HttpError {
    pub fn from_error(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        error: &dyn StdError,
    ) -> Self {
        let report = ErrorReport::from_error(source, status, error);
        Self {
            status,
            public_message,
            report,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.public_message).into_response();
        self.report.attach(&mut response);
        response
    }
}

pub fn repo_http_error(source: &'static str, error: RepoError) -> HttpError {
    match &error {
        RepoError::NotFound => HttpError::from_error(
            source,
            StatusCode::NOT_FOUND,
            "Resource not found",
            &error,
        ),
        RepoError::Duplicate { .. } => HttpError::from_error(
            source,
            StatusCode::CONFLICT,
            "Duplicate record",
            &error,
        ),
        RepoError::InvalidInput { .. } => HttpError::from_error(
            source,
            StatusCode::BAD_REQUEST,
            "Invalid input",
            &error,
        ),
        _ => HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            &error,
        ),
    }
}

pub fn lookup_http_error(source: &'static str, error: LookupError) -> HttpError {
    match &error {
        LookupError::MissingSiteScope => HttpError::from_error(
            source,
            StatusCode::BAD_REQUEST,
            "Request carries no site scope",
            &error,
        ),
        LookupError::Coerce { .. } => HttpError::from_error(
            source,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Variable value could not be coerced",
            &error,
        ),
        LookupError::Repo(repo) if repo.is_not_found() => HttpError::from_error(
            source,
            StatusCode::NOT_FOUND,
            "Resource not found",
            &error,
        ),
        LookupError::Repo(_) => HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            &error,
        ),
    }
}

pub fn write_http_error(source: &'static str, error: VarsWriteError) -> HttpError {
    match error {
        VarsWriteError::Domain(domain) => HttpError::from_error(
            source,
            StatusCode::BAD_REQUEST,
            "Validation failed",
            &domain,
        ),
        VarsWriteError::Repo(repo) => repo_http_error(source, repo),
    }
}
