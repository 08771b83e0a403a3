//! Entity and request types for the catalog.
//!
//! Relationships are declared by the foreign-key fields on these structs:
//! a [`Product`] optionally belongs to one [`Category`] through
//! `category_id`, and products relate to [`Tag`]s many-to-many through
//! [`ProductTag`] junction rows.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::error::{Error, Result};
use crate::tag_sync::TagSelection;

/// Identity of a category row.
pub type CategoryId = i32;
/// Identity of a product row.
pub type ProductId = i32;
/// Identity of a tag row.
pub type TagId = i32;
/// Identity of a product/tag junction row.
pub type ProductTagId = i32;

/// Stock assigned to a product created without an explicit quantity.
pub const DEFAULT_STOCK: i32 = 10;

/// Longest accepted category, product or tag name.
pub const MAX_NAME_LEN: usize = 255;

// =============================================================================
// ENTITIES
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Category {
    pub id: CategoryId,
    pub category_name: String,
}

/// A category with its products eager-loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryWithProducts {
    pub id: CategoryId,
    pub category_name: String,
    pub products: Vec<Product>,
}

impl CategoryWithProducts {
    pub fn new(category: Category, products: Vec<Product>) -> Self {
        Self {
            id: category.id,
            category_name: category.category_name,
            products,
        }
    }
}

/// A product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Product {
    pub id: ProductId,
    pub product_name: String,
    #[schema(value_type = String, example = "14.99")]
    pub price: BigDecimal,
    pub stock: i32,
    /// Owning category; `None` when the product is uncategorized.
    pub category_id: Option<CategoryId>,
}

/// A product with its category and tags eager-loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDetail {
    pub id: ProductId,
    pub product_name: String,
    #[schema(value_type = String, example = "14.99")]
    pub price: BigDecimal,
    pub stock: i32,
    pub category_id: Option<CategoryId>,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
}

impl ProductDetail {
    pub fn new(product: Product, category: Option<Category>, tags: Vec<Tag>) -> Self {
        Self {
            id: product.id,
            product_name: product.product_name,
            price: product.price,
            stock: product.stock,
            category_id: product.category_id,
            category,
            tags,
        }
    }

    /// Tag ids attached to this product, in the order they were loaded.
    pub fn tag_ids(&self) -> Vec<TagId> {
        self.tags.iter().map(|t| t.id).collect()
    }
}

/// A tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Tag {
    pub id: TagId,
    pub tag_name: String,
}

/// A tag with the products carrying it eager-loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TagWithProducts {
    pub id: TagId,
    pub tag_name: String,
    pub products: Vec<Product>,
}

impl TagWithProducts {
    pub fn new(tag: Tag, products: Vec<Product>) -> Self {
        Self {
            id: tag.id,
            tag_name: tag.tag_name,
            products,
        }
    }
}

/// Junction row pairing one product with one tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow, ToSchema,
)]
pub struct ProductTag {
    pub id: ProductTagId,
    pub product_id: ProductId,
    pub tag_id: TagId,
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Request for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub category_name: String,
}

impl CreateCategoryRequest {
    pub fn validate(&self) -> Result<()> {
        validate_name("category_name", &self.category_name)
    }
}

/// Request for updating a category. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub category_name: Option<String>,
}

impl UpdateCategoryRequest {
    pub fn validate(&self) -> Result<()> {
        match &self.category_name {
            Some(name) => validate_name("category_name", name),
            None => Ok(()),
        }
    }
}

/// Request for creating a product.
///
/// ```json
/// { "product_name": "Basketball", "price": "200.00", "stock": 3, "tagIds": [1, 2] }
/// ```
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub product_name: String,
    #[schema(value_type = String, example = "200.00")]
    pub price: BigDecimal,
    #[serde(default = "default_stock")]
    pub stock: i32,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Tags to attach right after the product is created.
    #[serde(default, rename = "tagIds", alias = "tag_ids")]
    pub tag_ids: Option<Vec<TagId>>,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<()> {
        validate_name("product_name", &self.product_name)?;
        validate_price(&self.price)?;
        validate_stock(self.stock)
    }
}

/// Request for updating a product. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub product_name: Option<String>,
    #[schema(value_type = Option<String>, example = "200.00")]
    pub price: Option<BigDecimal>,
    pub stock: Option<i32>,
    /// Absent leaves the category alone; `null` detaches the product.
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<i32>)]
    pub category_id: Option<Option<CategoryId>>,
    /// Absent leaves tags alone; `[]` clears them; a list replaces them.
    #[serde(default, rename = "tagIds", alias = "tag_ids")]
    #[schema(value_type = Option<Vec<i32>>)]
    pub tag_ids: TagSelection,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.product_name {
            validate_name("product_name", name)?;
        }
        if let Some(price) = &self.price {
            validate_price(price)?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        Ok(())
    }
}

/// Request for creating a tag.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTagRequest {
    pub tag_name: String,
}

impl CreateTagRequest {
    pub fn validate(&self) -> Result<()> {
        validate_name("tag_name", &self.tag_name)
    }
}

/// Request for updating a tag. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateTagRequest {
    pub tag_name: Option<String>,
}

impl UpdateTagRequest {
    pub fn validate(&self) -> Result<()> {
        match &self.tag_name {
            Some(name) => validate_name("tag_name", name),
            None => Ok(()),
        }
    }
}

/// Request replacing the full tag set of a product.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetProductTagsRequest {
    #[serde(rename = "tagIds", alias = "tag_ids")]
    pub tag_ids: Vec<TagId>,
}

// =============================================================================
// VALIDATION
// =============================================================================

fn default_stock() -> i32 {
    DEFAULT_STOCK
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field
/// (`None`, via `#[serde(default)]`).
fn deserialize_present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Validate an entity name: non-blank and at most [`MAX_NAME_LEN`] characters.
pub fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} cannot be empty", field)));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(Error::InvalidInput(format!(
            "{} must be {} characters or less",
            field, MAX_NAME_LEN
        )));
    }
    Ok(())
}

pub fn validate_price(price: &BigDecimal) -> Result<()> {
    if *price < BigDecimal::from(0) {
        return Err(Error::InvalidInput("price must not be negative".to_string()));
    }
    Ok(())
}

pub fn validate_stock(stock: i32) -> Result<()> {
    if stock < 0 {
        return Err(Error::InvalidInput("stock must not be negative".to_string()));
    }
    Ok(())
}
