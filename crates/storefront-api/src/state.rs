//! Shared handler state.

use std::sync::Arc;

use storefront_core::{CategoryRepository, ProductRepository, ProductTagRepository, TagRepository};
use storefront_db::Database;

/// Repositories shared by every handler.
///
/// Held as trait objects so the router can run over any gateway
/// implementation.
#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub product_tags: Arc<dyn ProductTagRepository>,
}

impl AppState {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
        tags: Arc<dyn TagRepository>,
        product_tags: Arc<dyn ProductTagRepository>,
    ) -> Self {
        Self {
            categories,
            products,
            tags,
            product_tags,
        }
    }

    /// Build state over the PostgreSQL repositories.
    pub fn from_database(db: &Database) -> Self {
        Self::new(
            Arc::new(db.categories.clone()),
            Arc::new(db.products.clone()),
            Arc::new(db.tags.clone()),
            Arc::new(db.product_tags.clone()),
        )
    }
}
