//! HTTP handlers, one module per resource.

pub mod categories;
pub mod health;
pub mod products;
pub mod tags;

use serde::Serialize;
use utoipa::ToSchema;

use crate::ApiError;

/// Confirmation body returned by update and delete endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Narrow a path id to the storage id type.
///
/// Path ids are parsed as `i64` so that a well-formed integer outside the
/// `i32` range reads as "no such row" rather than a malformed request.
pub(crate) fn row_id(raw: i64, not_found: &str) -> Result<i32, ApiError> {
    i32::try_from(raw).map_err(|_| ApiError::NotFound(not_found.to_string()))
}
