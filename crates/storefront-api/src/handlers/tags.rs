//! Tag HTTP handlers.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use storefront_core::{CreateTagRequest, Tag, TagWithProducts, UpdateTagRequest};
use tracing::info;

use super::{row_id, MessageResponse};
use crate::{ApiError, AppState, ErrorResponse};

const NOT_FOUND: &str = "No tag found with this id";

/// List all tags with the products carrying them.
#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "Tags",
    responses(
        (status = 200, description = "All tags", body = [TagWithProducts]),
        (status = 500, description = "Query failed", body = ErrorResponse),
    )
)]
pub async fn list_tags(
    State(state): State<AppState>,
) -> Result<Json<Vec<TagWithProducts>>, ApiError> {
    Ok(Json(state.tags.list().await?))
}

/// Get one tag with its products.
#[utoipa::path(
    get,
    path = "/api/tags/{id}",
    tag = "Tags",
    params(("id" = i32, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag found", body = TagWithProducts),
        (status = 404, description = "Tag not found", body = ErrorResponse),
    )
)]
pub async fn get_tag(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TagWithProducts>, ApiError> {
    let id = row_id(id?.0, NOT_FOUND)?;
    state
        .tags
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

/// Create a tag.
///
/// # Returns
/// - 201 Created with the new tag
/// - 400 Bad Request if the body is malformed or fails validation
#[utoipa::path(
    post,
    path = "/api/tags",
    tag = "Tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created", body = Tag),
        (status = 400, description = "Invalid input", body = ErrorResponse),
    )
)]
pub async fn create_tag(
    State(state): State<AppState>,
    body: Result<Json<CreateTagRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    let Json(req) = body?;
    req.validate()?;

    let tag = state.tags.create(req).await.map_err(ApiError::from_write)?;

    info!(subsystem = "api", component = "tags", op = "create", tag_id = tag.id, "Tag created");
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Rename a tag.
#[utoipa::path(
    put,
    path = "/api/tags/{id}",
    tag = "Tags",
    params(("id" = i32, Path, description = "Tag id")),
    request_body = UpdateTagRequest,
    responses(
        (status = 200, description = "Tag updated", body = MessageResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse),
    )
)]
pub async fn update_tag(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateTagRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = row_id(id?.0, NOT_FOUND)?;
    let Json(req) = body?;
    req.validate()?;

    if state.tags.update(id, req).await.map_err(ApiError::from_write)? == 0 {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(MessageResponse::new("Tag updated successfully")))
}

/// Delete a tag and its product pairings.
#[utoipa::path(
    delete,
    path = "/api/tags/{id}",
    tag = "Tags",
    params(("id" = i32, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag deleted", body = MessageResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse),
    )
)]
pub async fn delete_tag(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = row_id(id?.0, NOT_FOUND)?;
    if state.tags.delete(id).await? == 0 {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    info!(subsystem = "api", component = "tags", op = "delete", tag_id = id, "Tag deleted");
    Ok(Json(MessageResponse::new("Tag deleted successfully")))
}
