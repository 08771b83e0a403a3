//! HTTP error mapping.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler error, converted into a status code and `{"error": ...}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Gateway or unexpected failure (500).
    #[error("{0}")]
    Internal(String),
    /// No row with the requested identity (404).
    #[error("{0}")]
    NotFound(String),
    /// Malformed or constraint-violating input (400).
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    /// Map a failure from a create or update call.
    ///
    /// Writes surface gateway failures as 400 so constraint violations
    /// (unknown category or tag ids, duplicate pairings) read as client
    /// errors. Not-found keeps its 404.
    pub fn from_write(err: storefront_core::Error) -> Self {
        match err {
            storefront_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::BadRequest(other.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<storefront_core::Error> for ApiError {
    fn from(err: storefront_core::Error) -> Self {
        match err {
            storefront_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            storefront_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(subsystem = "api", status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(subsystem = "api", status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
