//! # storefront-api
//!
//! HTTP server for the storefront catalog: categories, products, tags and
//! the product/tag junction, backed by [`storefront_db`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod openapi;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorResponse};
pub use routes::{api_router, app};
pub use state::AppState;
