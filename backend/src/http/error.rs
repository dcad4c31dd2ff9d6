//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::services::ServiceError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Legacy runtime or store temporarily unavailable
    Unavailable(String),
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Unavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::new("UNAVAILABLE", msg),
            ),
            AppError::Repository(e) => {
                let status = match e {
                    RepositoryError::ConnectionError { .. } => StatusCode::SERVICE_UNAVAILABLE,
                    RepositoryError::QueryError { .. }
                    | RepositoryError::ValidationError { .. }
                    | RepositoryError::ConfigurationError { .. } => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                let error = ApiError::new("REPOSITORY_ERROR", e.to_string())
                    .with_details(e.context().to_string());
                (status, error)
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::UnknownStatistic(_) | ServiceError::PreferenceNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            ServiceError::Session(_) => AppError::Unavailable(err.to_string()),
            ServiceError::Repository(e) => AppError::Repository(e),
        }
    }
}
