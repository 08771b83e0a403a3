//! # storefront-core
//!
//! Core types, traits, and abstractions for the storefront catalog.
//!
//! This crate provides the entity model (categories, products, tags and the
//! product/tag junction), the repository traits the persistence layer
//! implements, and the pure planning logic used to reconcile a product's tag
//! associations.

pub mod error;
pub mod logging;
pub mod models;
pub mod tag_sync;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use tag_sync::{plan_tag_sync, TagSelection, TagSyncPlan};
pub use traits::*;
