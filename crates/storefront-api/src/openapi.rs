//! Generated OpenAPI document, served at `/openapi.json` with Swagger UI at `/docs`.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers::{self, health::HealthResponse, products::TagSyncResponse, MessageResponse};
use storefront_core::{
    Category, CategoryWithProducts, CreateCategoryRequest, CreateProductRequest, CreateTagRequest,
    Product, ProductDetail, ProductTag, SetProductTagsRequest, Tag, TagWithProducts,
    UpdateCategoryRequest, UpdateProductRequest, UpdateTagRequest,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        description = "Catalog of categories, products and tags"
    ),
    paths(
        handlers::health::health_check,
        handlers::categories::list_categories,
        handlers::categories::get_category,
        handlers::categories::create_category,
        handlers::categories::update_category,
        handlers::categories::delete_category,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::products::get_product_tags,
        handlers::products::set_product_tags,
        handlers::tags::list_tags,
        handlers::tags::get_tag,
        handlers::tags::create_tag,
        handlers::tags::update_tag,
        handlers::tags::delete_tag,
    ),
    components(schemas(
        Category,
        CategoryWithProducts,
        CreateCategoryRequest,
        UpdateCategoryRequest,
        Product,
        ProductDetail,
        CreateProductRequest,
        UpdateProductRequest,
        Tag,
        TagWithProducts,
        CreateTagRequest,
        UpdateTagRequest,
        ProductTag,
        SetProductTagsRequest,
        TagSyncResponse,
        MessageResponse,
        ErrorResponse,
        HealthResponse,
    )),
    tags(
        (name = "Categories", description = "Category CRUD with eager-loaded products"),
        (name = "Products", description = "Product CRUD and tag assignment"),
        (name = "Tags", description = "Tag CRUD with eager-loaded products"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;
