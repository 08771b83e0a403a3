//! Tag repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};
use tracing::info;

use storefront_core::{
    CreateTagRequest, Error, Product, Result, Tag, TagId, TagRepository, TagWithProducts,
    UpdateTagRequest,
};

/// PostgreSQL implementation of TagRepository.
#[derive(Clone)]
pub struct PgTagRepository {
    pool: Pool<Postgres>,
}

impl PgTagRepository {
    /// Create a new PgTagRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TaggedProductRow {
    tag_id: TagId,
    #[sqlx(flatten)]
    product: Product,
}

/// Attach the products carrying each tag through the junction table.
async fn with_products(conn: &mut PgConnection, tags: Vec<Tag>) -> Result<Vec<TagWithProducts>> {
    if tags.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<TagId> = tags.iter().map(|t| t.id).collect();
    let rows = sqlx::query_as::<_, TaggedProductRow>(
        r#"
        SELECT pt.tag_id, p.id, p.product_name, p.price, p.stock, p.category_id
        FROM product_tag pt
        JOIN product p ON p.id = pt.product_id
        WHERE pt.tag_id = ANY($1)
        ORDER BY p.id
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(Error::Database)?;

    let mut by_tag: HashMap<TagId, Vec<Product>> = HashMap::new();
    for row in rows {
        by_tag.entry(row.tag_id).or_default().push(row.product);
    }

    Ok(tags
        .into_iter()
        .map(|tag| {
            let products = by_tag.remove(&tag.id).unwrap_or_default();
            TagWithProducts::new(tag, products)
        })
        .collect())
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn create(&self, req: CreateTagRequest) -> Result<Tag> {
        let tag = sqlx::query_as::<_, Tag>(
            "INSERT INTO tag (tag_name) VALUES ($1) RETURNING id, tag_name",
        )
        .bind(&req.tag_name)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "tags",
            op = "create",
            tag_id = tag.id,
            "Tag created"
        );
        Ok(tag)
    }

    async fn get(&self, id: TagId) -> Result<Option<TagWithProducts>> {
        let mut conn = self.pool.acquire().await.map_err(Error::Database)?;

        let tag = sqlx::query_as::<_, Tag>("SELECT id, tag_name FROM tag WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(Error::Database)?;

        match tag {
            Some(tag) => Ok(with_products(&mut *conn, vec![tag]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<TagWithProducts>> {
        let mut conn = self.pool.acquire().await.map_err(Error::Database)?;

        let tags = sqlx::query_as::<_, Tag>("SELECT id, tag_name FROM tag ORDER BY id")
            .fetch_all(&mut *conn)
            .await
            .map_err(Error::Database)?;

        with_products(&mut *conn, tags).await
    }

    async fn update(&self, id: TagId, req: UpdateTagRequest) -> Result<u64> {
        let result = sqlx::query("UPDATE tag SET tag_name = COALESCE($2, tag_name) WHERE id = $1")
            .bind(id)
            .bind(req.tag_name)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: TagId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tag WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "tags",
            op = "delete",
            tag_id = id,
            rows_affected = result.rows_affected(),
            "Tag delete executed"
        );
        Ok(result.rows_affected())
    }
}
