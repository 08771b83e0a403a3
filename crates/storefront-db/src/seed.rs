//! Demo catalog seeding.
//!
//! Inserts a small set of categories, products and tags so a fresh
//! deployment has something to browse. Seeding only runs against an empty
//! catalog.

use std::collections::HashMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use sqlx::{Pool, Postgres};
use tracing::info;

use storefront_core::{Error, Result};

use crate::product_tags::bulk_create_tx;

pub const SEED_CATEGORIES: &[&str] = &["Shirts", "Shorts", "Music", "Hats", "Shoes"];

pub const SEED_TAGS: &[&str] = &[
    "rock music",
    "pop music",
    "blue",
    "red",
    "green",
    "white",
    "gold",
    "pop culture",
];

/// Seed product: name, price, stock, category name, tag names.
pub struct SeedProduct {
    pub name: &'static str,
    pub price: &'static str,
    pub stock: i32,
    pub category: &'static str,
    pub tags: &'static [&'static str],
}

pub const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Plain T-Shirt",
        price: "14.99",
        stock: 14,
        category: "Shirts",
        tags: &["rock music", "blue", "red", "green"],
    },
    SeedProduct {
        name: "Running Sneakers",
        price: "90.00",
        stock: 25,
        category: "Shoes",
        tags: &["white"],
    },
    SeedProduct {
        name: "Branded Baseball Hat",
        price: "22.99",
        stock: 12,
        category: "Hats",
        tags: &["red", "green", "white", "pop culture"],
    },
    SeedProduct {
        name: "Top 40 Music Compilation Vinyl Record",
        price: "12.99",
        stock: 50,
        category: "Music",
        tags: &["rock music", "pop music", "pop culture"],
    },
    SeedProduct {
        name: "Cargo Shorts",
        price: "29.99",
        stock: 22,
        category: "Shorts",
        tags: &["gold", "pop culture"],
    },
];

/// Insert the demo catalog if no category, product or tag exists yet.
///
/// Returns `true` when data was inserted.
pub async fn seed_if_empty(pool: &Pool<Postgres>) -> Result<bool> {
    let populated: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM category)
             OR EXISTS(SELECT 1 FROM product)
             OR EXISTS(SELECT 1 FROM tag)",
    )
    .fetch_one(pool)
    .await
    .map_err(Error::Database)?;

    if populated {
        info!(
            subsystem = "database",
            component = "seed",
            "Catalog already populated, skipping seed"
        );
        return Ok(false);
    }

    let mut tx = pool.begin().await.map_err(Error::Database)?;

    let mut category_ids = HashMap::new();
    for name in SEED_CATEGORIES {
        let id: i32 =
            sqlx::query_scalar("INSERT INTO category (category_name) VALUES ($1) RETURNING id")
                .bind(*name)
                .fetch_one(&mut *tx)
                .await
                .map_err(Error::Database)?;
        category_ids.insert(*name, id);
    }

    let mut tag_ids = HashMap::new();
    for name in SEED_TAGS {
        let id: i32 = sqlx::query_scalar("INSERT INTO tag (tag_name) VALUES ($1) RETURNING id")
            .bind(*name)
            .fetch_one(&mut *tx)
            .await
            .map_err(Error::Database)?;
        tag_ids.insert(*name, id);
    }

    for product in SEED_PRODUCTS {
        let price = BigDecimal::from_str(product.price)
            .map_err(|e| Error::Internal(format!("invalid seed price: {}", e)))?;

        let product_id: i32 = sqlx::query_scalar(
            "INSERT INTO product (product_name, price, stock, category_id)
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(product.name)
        .bind(&price)
        .bind(product.stock)
        .bind(category_ids.get(product.category).copied())
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let product_tags: Vec<i32> = product
            .tags
            .iter()
            .filter_map(|name| tag_ids.get(name).copied())
            .collect();
        bulk_create_tx(&mut *tx, product_id, &product_tags).await?;
    }

    tx.commit().await.map_err(Error::Database)?;

    info!(
        subsystem = "database",
        component = "seed",
        categories = SEED_CATEGORIES.len(),
        products = SEED_PRODUCTS.len(),
        tags = SEED_TAGS.len(),
        "Demo catalog seeded"
    );
    Ok(true)
}
