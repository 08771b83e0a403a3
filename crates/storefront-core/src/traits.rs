//! Repository traits for the catalog.
//!
//! These traits define the persistence gateway the HTTP layer talks to,
//! enabling the PostgreSQL implementation to be swapped for test doubles.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;
use crate::tag_sync::TagSyncPlan;

// =============================================================================
// CATEGORY REPOSITORY
// =============================================================================

/// Repository for category CRUD operations.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a new category.
    async fn create(&self, req: CreateCategoryRequest) -> Result<Category>;

    /// Fetch a category with its products.
    async fn get(&self, id: CategoryId) -> Result<Option<CategoryWithProducts>>;

    /// List all categories with their products.
    async fn list(&self) -> Result<Vec<CategoryWithProducts>>;

    /// Update a category, returning the number of rows matched.
    async fn update(&self, id: CategoryId, req: UpdateCategoryRequest) -> Result<u64>;

    /// Delete a category, returning the number of rows removed.
    async fn delete(&self, id: CategoryId) -> Result<u64>;
}

// =============================================================================
// PRODUCT REPOSITORY
// =============================================================================

/// Repository for product CRUD operations.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product and attach `req.tag_ids`, if any, atomically.
    async fn create(&self, req: CreateProductRequest) -> Result<ProductDetail>;

    /// Fetch a product with its category and tags.
    async fn get(&self, id: ProductId) -> Result<Option<ProductDetail>>;

    /// List all products with their categories and tags.
    async fn list(&self) -> Result<Vec<ProductDetail>>;

    /// Update a product and, unless `req.tag_ids` is unchanged, reconcile
    /// its tags in the same unit of work. Returns the number of rows matched;
    /// tags are not touched when it is zero.
    async fn update(&self, id: ProductId, req: UpdateProductRequest) -> Result<u64>;

    /// Delete a product (and its junction rows), returning rows removed.
    async fn delete(&self, id: ProductId) -> Result<u64>;

    /// Check if a product exists.
    async fn exists(&self, id: ProductId) -> Result<bool>;
}

// =============================================================================
// TAG REPOSITORY
// =============================================================================

/// Repository for tag CRUD operations.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Insert a new tag.
    async fn create(&self, req: CreateTagRequest) -> Result<Tag>;

    /// Fetch a tag with the products carrying it.
    async fn get(&self, id: TagId) -> Result<Option<TagWithProducts>>;

    /// List all tags with their products.
    async fn list(&self) -> Result<Vec<TagWithProducts>>;

    /// Update a tag, returning the number of rows matched.
    async fn update(&self, id: TagId, req: UpdateTagRequest) -> Result<u64>;

    /// Delete a tag (and its junction rows), returning rows removed.
    async fn delete(&self, id: TagId) -> Result<u64>;
}

// =============================================================================
// PRODUCT TAG (JUNCTION) REPOSITORY
// =============================================================================

/// Repository for product/tag junction rows.
#[async_trait]
pub trait ProductTagRepository: Send + Sync {
    /// All junction rows for a product.
    async fn list_for_product(&self, product_id: ProductId) -> Result<Vec<ProductTag>>;

    /// Insert one junction row per tag id.
    async fn bulk_create(&self, product_id: ProductId, tag_ids: &[TagId])
        -> Result<Vec<ProductTag>>;

    /// Delete junction rows by row identity, returning rows removed.
    async fn bulk_delete(&self, ids: &[ProductTagId]) -> Result<u64>;

    /// Make the product's junction rows match `desired` exactly and return the
    /// plan that was applied. The product's existence is not checked; a
    /// missing product simply has no rows to diff against.
    async fn sync_for_product(&self, product_id: ProductId, desired: &[TagId])
        -> Result<TagSyncPlan>;
}
