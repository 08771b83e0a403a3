//! # storefront-db
//!
//! PostgreSQL persistence layer for the storefront catalog.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for categories, products, tags and the
//!   product/tag junction
//! - Transactional tag reconciliation for product updates
//! - Schema migrations and demo seed data
//!
//! ## Example
//!
//! ```rust,ignore
//! use storefront_db::{Database, PoolConfig, ProductRepository, CreateProductRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/storefront", &PoolConfig::default()).await?;
//!     db.migrate().await?;
//!
//!     let product = db.products.create(CreateProductRequest {
//!         product_name: "Basketball".to_string(),
//!         price: "200.00".parse()?,
//!         stock: 3,
//!         category_id: None,
//!         tag_ids: Some(vec![1, 2]),
//!     }).await?;
//!
//!     println!("Created product {}", product.id);
//!     Ok(())
//! }
//! ```
pub mod categories;
pub mod pool;
pub mod product_tags;
pub mod products;
pub mod seed;
pub mod tags;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use storefront_core::*;

// Re-export repository implementations
pub use categories::PgCategoryRepository;
pub use pool::{connect_pool, log_pool_metrics, PoolConfig};
pub use product_tags::PgProductTagRepository;
pub use products::PgProductRepository;
pub use seed::seed_if_empty;
pub use tags::PgTagRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Category repository.
    pub categories: PgCategoryRepository,
    /// Product repository; updates reconcile tags in the same transaction.
    pub products: PgProductRepository,
    /// Tag repository.
    pub tags: PgTagRepository,
    /// Product/tag junction repository.
    pub product_tags: PgProductTagRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            categories: PgCategoryRepository::new(pool.clone()),
            products: PgProductRepository::new(pool.clone()),
            tags: PgTagRepository::new(pool.clone()),
            product_tags: PgProductTagRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to `url` with the given pool settings.
    pub async fn connect(url: &str, config: &PoolConfig) -> Result<Self> {
        let pool = connect_pool(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Insert the demo catalog when the database is empty.
    pub async fn seed_if_empty(&self) -> Result<bool> {
        seed::seed_if_empty(&self.pool).await
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
