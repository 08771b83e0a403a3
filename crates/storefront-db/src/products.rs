//! Product repository implementation.
//!
//! Eager loading is batched: one query for the products, one for their
//! categories and one for their tags, regardless of how many products are
//! returned.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};
use tracing::info;

use storefront_core::{
    Category, CategoryId, CreateProductRequest, Error, Product, ProductDetail, ProductId,
    ProductRepository, Result, Tag, UpdateProductRequest,
};

use crate::product_tags::{bulk_create_tx, sync_tx};

/// Column list shared by every query that maps rows to [`Product`].
pub(crate) const PRODUCT_COLUMNS: &str = "id, product_name, price, stock, category_id";

/// PostgreSQL implementation of ProductRepository.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: Pool<Postgres>,
}

impl PgProductRepository {
    /// Create a new PgProductRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Attach each product's category and tags.
async fn load_details(
    conn: &mut PgConnection,
    products: Vec<Product>,
) -> Result<Vec<ProductDetail>> {
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();
    let category_ids: Vec<CategoryId> = products.iter().filter_map(|p| p.category_id).collect();

    let categories: HashMap<CategoryId, Category> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        sqlx::query_as::<_, Category>(
            "SELECT id, category_name FROM category WHERE id = ANY($1)",
        )
        .bind(&category_ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(Error::Database)?
        .into_iter()
        .map(|c| (c.id, c))
        .collect()
    };

    let tag_rows = sqlx::query_as::<_, (ProductId, i32, String)>(
        r#"
        SELECT pt.product_id, t.id, t.tag_name
        FROM product_tag pt
        JOIN tag t ON t.id = pt.tag_id
        WHERE pt.product_id = ANY($1)
        ORDER BY t.id
        "#,
    )
    .bind(&product_ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(Error::Database)?;

    let mut tags: HashMap<ProductId, Vec<Tag>> = HashMap::new();
    for (product_id, id, tag_name) in tag_rows {
        tags.entry(product_id)
            .or_default()
            .push(Tag { id, tag_name });
    }

    Ok(products
        .into_iter()
        .map(|product| {
            let category = product
                .category_id
                .and_then(|id| categories.get(&id).cloned());
            let product_tags = tags.remove(&product.id).unwrap_or_default();
            ProductDetail::new(product, category, product_tags)
        })
        .collect())
}

async fn fetch_detail(conn: &mut PgConnection, id: ProductId) -> Result<Option<ProductDetail>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM product WHERE id = $1",
        PRODUCT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(Error::Database)?;

    match product {
        Some(product) => Ok(load_details(conn, vec![product]).await?.pop()),
        None => Ok(None),
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, req: CreateProductRequest) -> Result<ProductDetail> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO product (product_name, price, stock, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(&req.product_name)
        .bind(&req.price)
        .bind(req.stock)
        .bind(req.category_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let tag_count = match req.tag_ids.as_deref() {
            Some(tag_ids) => bulk_create_tx(&mut *tx, product.id, tag_ids).await?.len(),
            None => 0,
        };

        let detail = load_details(&mut *tx, vec![product])
            .await?
            .pop()
            .ok_or_else(|| Error::Internal("created product vanished".to_string()))?;

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "products",
            op = "create",
            product_id = detail.id,
            tag_count,
            "Product created"
        );
        Ok(detail)
    }

    async fn get(&self, id: ProductId) -> Result<Option<ProductDetail>> {
        let mut conn = self.pool.acquire().await.map_err(Error::Database)?;
        fetch_detail(&mut *conn, id).await
    }

    async fn list(&self) -> Result<Vec<ProductDetail>> {
        let mut conn = self.pool.acquire().await.map_err(Error::Database)?;

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM product ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&mut *conn)
        .await
        .map_err(Error::Database)?;

        load_details(&mut *conn, products).await
    }

    async fn update(&self, id: ProductId, req: UpdateProductRequest) -> Result<u64> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let (set_category, category_id) = match req.category_id {
            Some(category_id) => (true, category_id),
            None => (false, None),
        };

        let result = sqlx::query(
            r#"
            UPDATE product SET
                product_name = COALESCE($2, product_name),
                price = COALESCE($3, price),
                stock = COALESCE($4, stock),
                category_id = CASE WHEN $5 THEN $6 ELSE category_id END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(req.product_name)
        .bind(req.price)
        .bind(req.stock)
        .bind(set_category)
        .bind(category_id)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let rows_affected = result.rows_affected();
        if rows_affected == 0 {
            // Nothing matched; dropping the transaction rolls it back.
            return Ok(0);
        }

        if let Some(desired) = req.tag_ids.desired() {
            sync_tx(&mut *tx, id, desired).await?;
        }

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "products",
            op = "update",
            product_id = id,
            rows_affected,
            "Product updated"
        );
        Ok(rows_affected)
    }

    async fn delete(&self, id: ProductId) -> Result<u64> {
        // Junction rows go with the product via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "products",
            op = "delete",
            product_id = id,
            rows_affected = result.rows_affected(),
            "Product delete executed"
        );
        Ok(result.rows_affected())
    }

    async fn exists(&self, id: ProductId) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM product WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)
    }
}
