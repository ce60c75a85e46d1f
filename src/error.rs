/*
 * Responsibility
 * - The application-wide AppError
 * - IntoResponse: the only place that turns a failure into an HTTP status + JSON body
 * - Conversions from repo / extractor errors
 *
 * Every error reaches the client as `{ "error": <code>, "message": <text> }`.
 * Internal detail stays in the logs.
 */
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repos::error::RepoError;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("unauthenticated")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("conflict: {0}")]
    Conflict(&'static str),
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("request timeout")]
    Timeout,
    #[error("internal server error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            AppError::BadRequest { code, message } => (code, message),
            AppError::Unauthorized => ("UNAUTHENTICATED", "authentication required".into()),
            AppError::Forbidden => ("FORBIDDEN", "access denied".into()),
            AppError::NotFound { resource } => ("NOT_FOUND", format!("{resource} not found.")),
            AppError::MethodNotAllowed => ("METHOD_NOT_ALLOWED", "method not allowed".into()),
            AppError::Conflict(what) => ("CONFLICT", format!("{what} conflicts with existing data")),
            AppError::PayloadTooLarge => ("PAYLOAD_TOO_LARGE", "request body is too large".into()),
            AppError::Timeout => ("REQUEST_TIMEOUT", "request timed out".into()),
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "unhandled failure");
                ("INTERNAL_SERVER_ERROR", "internal server error".into())
            }
        };

        let body = ErrorResponse {
            error: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::Conflict("resource"),
            RepoError::MissingReference => {
                AppError::bad_request("INVALID_REFERENCE", "referenced resource does not exist")
            }
            RepoError::Db(err) => AppError::Internal(err.into()),
        }
    }
}

// Extractor rejections carry framework wording; only the classification is kept.
impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        tracing::debug!(error = %e, "json body rejected");
        // A streamed body that outgrows the limit surfaces here, not in the limit layer.
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge;
        }
        AppError::bad_request("BAD_REQUEST", "request body is not valid")
    }
}

impl From<PathRejection> for AppError {
    fn from(e: PathRejection) -> Self {
        tracing::debug!(error = %e, "path rejected");
        AppError::bad_request("BAD_REQUEST", "invalid path parameter")
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        tracing::debug!(error = %e, "query rejected");
        AppError::bad_request("BAD_REQUEST", "invalid query parameter")
    }
}
