//! Category HTTP handlers.
//!
//! Categories are always returned with their products eager-loaded.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use storefront_core::{
    Category, CategoryWithProducts, CreateCategoryRequest, UpdateCategoryRequest,
};
use tracing::info;

use super::{row_id, MessageResponse};
use crate::{ApiError, AppState, ErrorResponse};

const NOT_FOUND: &str = "Category not found";

/// List all categories with their products.
///
/// # Returns
/// - 200 OK with array of categories
/// - 500 Internal Server Error if the query fails
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Categories",
    responses(
        (status = 200, description = "All categories", body = [CategoryWithProducts]),
        (status = 500, description = "Query failed", body = ErrorResponse),
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryWithProducts>>, ApiError> {
    let categories = state.categories.list().await?;
    Ok(Json(categories))
}

/// Get one category with its products.
///
/// # Returns
/// - 200 OK with the category
/// - 404 Not Found if no category has this id
/// - 500 Internal Server Error if the query fails
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = CategoryWithProducts),
        (status = 404, description = "Category not found", body = ErrorResponse),
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<CategoryWithProducts>, ApiError> {
    let id = row_id(id?.0, NOT_FOUND)?;
    state
        .categories
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

/// Create a category.
///
/// # Returns
/// - 201 Created with the new category
/// - 400 Bad Request if the body is malformed or fails validation
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid input", body = ErrorResponse),
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    body: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let Json(req) = body?;
    req.validate()?;

    let category = state
        .categories
        .create(req)
        .await
        .map_err(ApiError::from_write)?;

    info!(
        subsystem = "api",
        component = "categories",
        op = "create",
        category_id = category.id,
        "Category created"
    );
    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category's name.
///
/// # Returns
/// - 200 OK with a confirmation message
/// - 400 Bad Request if the body is malformed or fails validation
/// - 404 Not Found if no category has this id
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category id")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = MessageResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateCategoryRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = row_id(id?.0, NOT_FOUND)?;
    let Json(req) = body?;
    req.validate()?;

    let rows = state
        .categories
        .update(id, req)
        .await
        .map_err(ApiError::from_write)?;
    if rows == 0 {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    Ok(Json(MessageResponse::new("Category updated successfully")))
}

/// Delete a category. Its products are kept and detached.
///
/// # Returns
/// - 200 OK with a confirmation message
/// - 404 Not Found if no category has this id
/// - 500 Internal Server Error if the delete fails
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = row_id(id?.0, NOT_FOUND)?;
    if state.categories.delete(id).await? == 0 {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    info!(
        subsystem = "api",
        component = "categories",
        op = "delete",
        category_id = id,
        "Category deleted"
    );
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
