//! Router tests for product tag assignment: create with `tagIds`, the
//! three-way `tagIds` update field, and the `/api/products/:id/tags` routes.

mod common;

use common::{create_tag, product_tag_ids, send, test_app, TestApp};
use reqwest::{Method, StatusCode};
use serde_json::json;

async fn seed_tags(app: &TestApp) -> Vec<i64> {
    let mut ids = Vec::new();
    for name in ["rock music", "pop music", "blue", "red"] {
        ids.push(create_tag(app, name).await);
    }
    ids
}

async fn create_tagged_product(app: &TestApp, tag_ids: &[i64]) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/products",
        Some(json!({ "product_name": "Vintage Cap", "price": "22.00", "stock": 5, "tagIds": tag_ids })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_create_with_tag_ids_attaches_exactly_those_tags() {
    let (app, catalog) = test_app().await;
    let tags = seed_tags(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({ "product_name": "Basketball", "price": "200.00", "tagIds": [tags[0], tags[1]] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["tags"].as_array().unwrap().len(), 2);

    let id = body["id"].as_i64().unwrap();
    assert_eq!(product_tag_ids(&app, id).await, vec![tags[0], tags[1]]);
    assert_eq!(catalog.product_tag_rows(id as i32).len(), 2);
}

#[tokio::test]
async fn test_update_reconciles_overlapping_sets() {
    let (app, _) = test_app().await;
    let tags = seed_tags(&app).await;
    let id = create_tagged_product(&app, &[tags[1], tags[2], tags[3]]).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/products/{}", id),
        Some(json!({ "tagIds": [tags[0], tags[1], tags[2]] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product updated successfully");
    assert_eq!(product_tag_ids(&app, id).await, vec![tags[0], tags[1], tags[2]]);
}

#[tokio::test]
async fn test_update_with_empty_tag_ids_clears_tags() {
    let (app, _) = test_app().await;
    let tags = seed_tags(&app).await;
    let id = create_tagged_product(&app, &[tags[0], tags[1]]).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/products/{}", id),
        Some(json!({ "tagIds": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(product_tag_ids(&app, id).await.is_empty());
}

#[tokio::test]
async fn test_update_without_tag_ids_keeps_tags() {
    let (app, _) = test_app().await;
    let tags = seed_tags(&app).await;
    let id = create_tagged_product(&app, &[tags[0], tags[1]]).await;

    for body in [json!({ "stock": 1 }), json!({ "stock": 2, "tagIds": null })] {
        let (status, _) = send(&app, Method::PUT, &format!("/api/products/{}", id), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(product_tag_ids(&app, id).await, vec![tags[0], tags[1]]);
    }

    let (_, body) = send(&app, Method::GET, &format!("/api/products/{}", id), None).await;
    assert_eq!(body["stock"], 2);
}

#[tokio::test]
async fn test_repeated_update_is_idempotent() {
    let (app, catalog) = test_app().await;
    let tags = seed_tags(&app).await;
    let id = create_tagged_product(&app, &[tags[0]]).await;
    let uri = format!("/api/products/{}", id);

    send(&app, Method::PUT, &uri, Some(json!({ "tagIds": [tags[2], tags[3]] }))).await;
    let first = catalog.product_tag_rows(id as i32);

    send(&app, Method::PUT, &uri, Some(json!({ "tagIds": [tags[2], tags[3]] }))).await;
    let second = catalog.product_tag_rows(id as i32);

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_update_with_unknown_tag_is_400_and_leaves_tags() {
    let (app, _) = test_app().await;
    let tags = seed_tags(&app).await;
    let id = create_tagged_product(&app, &[tags[0]]).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/products/{}", id),
        Some(json!({ "product_name": "Renamed", "tagIds": [tags[1], 9999] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, product) = send(&app, Method::GET, &format!("/api/products/{}", id), None).await;
    assert_eq!(product["product_name"], "Vintage Cap");
    assert_eq!(product_tag_ids(&app, id).await, vec![tags[0]]);
}

#[tokio::test]
async fn test_create_with_duplicate_tag_ids_pairs_once() {
    let (app, catalog) = test_app().await;
    let tags = seed_tags(&app).await;
    let id = create_tagged_product(&app, &[tags[0], tags[0], tags[1]]).await;

    assert_eq!(catalog.product_tag_rows(id as i32).len(), 2);
}

#[tokio::test]
async fn test_product_tags_routes() {
    let (app, _) = test_app().await;
    let tags = seed_tags(&app).await;
    let id = create_tagged_product(&app, &[tags[0], tags[1]]).await;
    let uri = format!("/api/products/{}/tags", id);

    let (status, rows) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().unwrap().clone();
    assert_eq!(rows.len(), 2);
    let removed_row = rows
        .iter()
        .find(|r| r["tag_id"].as_i64() == Some(tags[0]))
        .unwrap()["id"]
        .clone();

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "tagIds": [tags[1], tags[2]] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["added"], json!([tags[2]]));
    assert_eq!(body["removed"], json!([removed_row]));
    assert_eq!(product_tag_ids(&app, id).await, vec![tags[1], tags[2]]);

    let (status, _) = send(&app, Method::GET, "/api/products/4242/tags", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/products/4242/tags",
        Some(json!({ "tagIds": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_tag_removes_it_from_products() {
    let (app, _) = test_app().await;
    let tags = seed_tags(&app).await;
    let id = create_tagged_product(&app, &[tags[0], tags[1]]).await;

    let (status, _) = send(&app, Method::DELETE, &format!("/api/tags/{}", tags[0]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product_tag_ids(&app, id).await, vec![tags[1]]);
}
