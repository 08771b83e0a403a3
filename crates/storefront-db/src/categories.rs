//! Category repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};
use tracing::info;

use storefront_core::{
    Category, CategoryId, CategoryRepository, CategoryWithProducts, CreateCategoryRequest, Error,
    Product, Result, UpdateCategoryRequest,
};

use crate::products::PRODUCT_COLUMNS;

/// PostgreSQL implementation of CategoryRepository.
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: Pool<Postgres>,
}

impl PgCategoryRepository {
    /// Create a new PgCategoryRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Attach products to each category using a single batched query.
async fn with_products(
    conn: &mut PgConnection,
    categories: Vec<Category>,
) -> Result<Vec<CategoryWithProducts>> {
    if categories.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<CategoryId> = categories.iter().map(|c| c.id).collect();
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM product WHERE category_id = ANY($1) ORDER BY id",
        PRODUCT_COLUMNS
    ))
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(Error::Database)?;

    let mut by_category: HashMap<CategoryId, Vec<Product>> = HashMap::new();
    for product in products {
        if let Some(category_id) = product.category_id {
            by_category.entry(category_id).or_default().push(product);
        }
    }

    Ok(categories
        .into_iter()
        .map(|category| {
            let products = by_category.remove(&category.id).unwrap_or_default();
            CategoryWithProducts::new(category, products)
        })
        .collect())
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, req: CreateCategoryRequest) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO category (category_name) VALUES ($1) RETURNING id, category_name",
        )
        .bind(&req.category_name)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "categories",
            op = "create",
            category_id = category.id,
            "Category created"
        );
        Ok(category)
    }

    async fn get(&self, id: CategoryId) -> Result<Option<CategoryWithProducts>> {
        let mut conn = self.pool.acquire().await.map_err(Error::Database)?;

        let category =
            sqlx::query_as::<_, Category>("SELECT id, category_name FROM category WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(Error::Database)?;

        match category {
            Some(category) => Ok(with_products(&mut *conn, vec![category]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<CategoryWithProducts>> {
        let mut conn = self.pool.acquire().await.map_err(Error::Database)?;

        let categories =
            sqlx::query_as::<_, Category>("SELECT id, category_name FROM category ORDER BY id")
                .fetch_all(&mut *conn)
                .await
                .map_err(Error::Database)?;

        with_products(&mut *conn, categories).await
    }

    async fn update(&self, id: CategoryId, req: UpdateCategoryRequest) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE category SET category_name = COALESCE($2, category_name) WHERE id = $1",
        )
        .bind(id)
        .bind(req.category_name)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: CategoryId) -> Result<u64> {
        // Products keep existing; the foreign key sets their category_id to NULL.
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "categories",
            op = "delete",
            category_id = id,
            rows_affected = result.rows_affected(),
            "Category delete executed"
        );
        Ok(result.rows_affected())
    }
}
