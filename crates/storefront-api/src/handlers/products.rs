//! Product HTTP handlers.
//!
//! Products are returned with their category and tags. Create and update
//! accept a `tagIds` array; on update an absent field leaves the tags alone,
//! `[]` clears them and any other list replaces them. Tag reconciliation
//! finishes before the response is sent.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use storefront_core::{
    CreateProductRequest, ProductDetail, ProductTag, ProductTagId,
    SetProductTagsRequest, TagId, UpdateProductRequest,
};
use tracing::info;
use utoipa::ToSchema;

use super::{row_id, MessageResponse};
use crate::{ApiError, AppState, ErrorResponse};

const NOT_FOUND: &str = "No product found with this id";

/// Outcome of replacing a product's tag set.
#[derive(Debug, Serialize, ToSchema)]
pub struct TagSyncResponse {
    /// Tag ids newly paired with the product.
    pub added: Vec<TagId>,
    /// Junction row ids that were removed.
    pub removed: Vec<ProductTagId>,
}

/// List all products with category and tags.
///
/// # Returns
/// - 200 OK with array of products
/// - 500 Internal Server Error if the query fails
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses(
        (status = 200, description = "All products", body = [ProductDetail]),
        (status = 500, description = "Query failed", body = ErrorResponse),
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductDetail>>, ApiError> {
    let products = state.products.list().await?;
    Ok(Json(products))
}

/// Get one product with category and tags.
///
/// # Returns
/// - 200 OK with the product
/// - 404 Not Found if no product has this id
/// - 500 Internal Server Error if the query fails
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductDetail),
        (status = 404, description = "Product not found", body = ErrorResponse),
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ProductDetail>, ApiError> {
    let id = row_id(id?.0, NOT_FOUND)?;
    state
        .products
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

/// Create a product, attaching `tagIds` when present.
///
/// # Returns
/// - 201 Created with the product, its category and tags
/// - 400 Bad Request if the body is malformed, fails validation, or names
///   an unknown category or tag
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductDetail),
        (status = 400, description = "Invalid input", body = ErrorResponse),
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductDetail>), ApiError> {
    let Json(req) = body?;
    req.validate()?;

    let product = state
        .products
        .create(req)
        .await
        .map_err(ApiError::from_write)?;

    info!(
        subsystem = "api",
        component = "products",
        op = "create",
        product_id = product.id,
        tag_count = product.tags.len(),
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product's fields and, when `tagIds` is present, its tags.
///
/// # Returns
/// - 200 OK with a confirmation message once tags are reconciled
/// - 400 Bad Request if the body is malformed, fails validation, or names
///   an unknown category or tag
/// - 404 Not Found if no product has this id
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = MessageResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = row_id(id?.0, NOT_FOUND)?;
    let Json(req) = body?;
    req.validate()?;

    let rows = state
        .products
        .update(id, req)
        .await
        .map_err(ApiError::from_write)?;
    if rows == 0 {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    Ok(Json(MessageResponse::new("Product updated successfully")))
}

/// Delete a product and its tag pairings.
///
/// # Returns
/// - 200 OK with a confirmation message
/// - 404 Not Found if no product has this id
/// - 500 Internal Server Error if the delete fails
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = row_id(id?.0, NOT_FOUND)?;
    if state.products.delete(id).await? == 0 {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    info!(
        subsystem = "api",
        component = "products",
        op = "delete",
        product_id = id,
        "Product deleted"
    );
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

/// List the junction rows pairing a product with its tags.
#[utoipa::path(
    get,
    path = "/api/products/{id}/tags",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Junction rows", body = [ProductTag]),
        (status = 404, description = "Product not found", body = ErrorResponse),
    )
)]
pub async fn get_product_tags(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<ProductTag>>, ApiError> {
    let id = row_id(id?.0, NOT_FOUND)?;
    if !state.products.exists(id).await? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(state.product_tags.list_for_product(id).await?))
}

/// Replace a product's tag set.
///
/// # Returns
/// - 200 OK with the tag ids added and the junction rows removed
/// - 400 Bad Request if the body is malformed or names an unknown tag
/// - 404 Not Found if no product has this id
#[utoipa::path(
    put,
    path = "/api/products/{id}/tags",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    request_body = SetProductTagsRequest,
    responses(
        (status = 200, description = "Tags reconciled", body = TagSyncResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
    )
)]
pub async fn set_product_tags(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<SetProductTagsRequest>, JsonRejection>,
) -> Result<Json<TagSyncResponse>, ApiError> {
    let id = row_id(id?.0, NOT_FOUND)?;
    let Json(req) = body?;
    // Part of the write: gateway failures here surface as 400 like the sync.
    if !state
        .products
        .exists(id)
        .await
        .map_err(ApiError::from_write)?
    {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    let plan = state
        .product_tags
        .sync_for_product(id, &req.tag_ids)
        .await
        .map_err(ApiError::from_write)?;

    Ok(Json(TagSyncResponse {
        added: plan.to_add,
        removed: plan.to_remove,
    }))
}
