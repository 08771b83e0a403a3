//! Product/tag junction repository and the transactional tag sync.
//!
//! The `*_tx` functions operate on a caller-owned connection so product
//! create and update can attach or reconcile tags inside their own
//! transaction.

use std::collections::HashSet;
use std::time::Instant;

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};
use tracing::debug;

use storefront_core::{
    plan_tag_sync, Error, ProductId, ProductTag, ProductTagId, ProductTagRepository, Result,
    TagId, TagSyncPlan,
};

/// PostgreSQL implementation of ProductTagRepository.
#[derive(Clone)]
pub struct PgProductTagRepository {
    pool: Pool<Postgres>,
}

impl PgProductTagRepository {
    /// Create a new PgProductTagRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Collapse duplicate tag ids, keeping first occurrences in order.
fn dedup_tag_ids(tag_ids: &[TagId]) -> Vec<TagId> {
    let mut seen = HashSet::new();
    tag_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Lock the product row so concurrent tag writes for it run one at a time.
///
/// Junction-row locks alone do not serialize two writers when the product
/// has no rows yet.
pub(crate) async fn lock_product_tx(conn: &mut PgConnection, product_id: ProductId) -> Result<()> {
    sqlx::query("SELECT id FROM product WHERE id = $1 FOR UPDATE")
        .bind(product_id)
        .execute(&mut *conn)
        .await
        .map_err(Error::Database)?;
    Ok(())
}

/// Read a product's junction rows, locking them for the rest of the transaction.
pub(crate) async fn lock_for_product_tx(
    conn: &mut PgConnection,
    product_id: ProductId,
) -> Result<Vec<ProductTag>> {
    sqlx::query_as::<_, ProductTag>(
        "SELECT id, product_id, tag_id FROM product_tag WHERE product_id = $1 ORDER BY id FOR UPDATE",
    )
    .bind(product_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(Error::Database)
}

/// Insert one junction row per distinct tag id.
pub(crate) async fn bulk_create_tx(
    conn: &mut PgConnection,
    product_id: ProductId,
    tag_ids: &[TagId],
) -> Result<Vec<ProductTag>> {
    let tag_ids = dedup_tag_ids(tag_ids);
    if tag_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, ProductTag>(
        r#"
        INSERT INTO product_tag (product_id, tag_id)
        SELECT $1, tag_id FROM UNNEST($2::int4[]) WITH ORDINALITY AS t(tag_id, ord)
        ORDER BY ord
        RETURNING id, product_id, tag_id
        "#,
    )
    .bind(product_id)
    .bind(&tag_ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(Error::Database)
}

/// Delete junction rows by row identity.
pub(crate) async fn bulk_delete_tx(conn: &mut PgConnection, ids: &[ProductTagId]) -> Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query("DELETE FROM product_tag WHERE id = ANY($1)")
        .bind(ids)
        .execute(&mut *conn)
        .await
        .map_err(Error::Database)?;
    Ok(result.rows_affected())
}

/// Reconcile a product's junction rows with `desired` on the given connection.
///
/// Callers wrap this in a transaction so the delete and insert commit or
/// roll back together.
pub(crate) async fn sync_tx(
    conn: &mut PgConnection,
    product_id: ProductId,
    desired: &[TagId],
) -> Result<TagSyncPlan> {
    let start = Instant::now();

    let current = lock_for_product_tx(conn, product_id).await?;
    let plan = plan_tag_sync(&current, desired);

    if !plan.is_noop() {
        bulk_delete_tx(conn, &plan.to_remove).await?;
        bulk_create_tx(conn, product_id, &plan.to_add).await?;
    }

    debug!(
        subsystem = "database",
        component = "product_tags",
        op = "sync_tags",
        product_id,
        to_add = plan.to_add.len(),
        to_remove = plan.to_remove.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Product tags reconciled"
    );
    Ok(plan)
}

#[async_trait]
impl ProductTagRepository for PgProductTagRepository {
    async fn list_for_product(&self, product_id: ProductId) -> Result<Vec<ProductTag>> {
        sqlx::query_as::<_, ProductTag>(
            "SELECT id, product_id, tag_id FROM product_tag WHERE product_id = $1 ORDER BY id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn bulk_create(
        &self,
        product_id: ProductId,
        tag_ids: &[TagId],
    ) -> Result<Vec<ProductTag>> {
        let mut conn = self.pool.acquire().await.map_err(Error::Database)?;
        bulk_create_tx(&mut *conn, product_id, tag_ids).await
    }

    async fn bulk_delete(&self, ids: &[ProductTagId]) -> Result<u64> {
        let mut conn = self.pool.acquire().await.map_err(Error::Database)?;
        bulk_delete_tx(&mut *conn, ids).await
    }

    async fn sync_for_product(
        &self,
        product_id: ProductId,
        desired: &[TagId],
    ) -> Result<TagSyncPlan> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        lock_product_tx(&mut *tx, product_id).await?;
        let plan = sync_tx(&mut *tx, product_id, desired).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(plan)
    }
}
