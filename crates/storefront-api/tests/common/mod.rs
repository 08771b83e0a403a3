//! In-memory catalog and HTTP helpers for router tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Method, StatusCode};
use serde_json::Value;
use storefront_api::{api_router, AppState};
use storefront_core::{
    plan_tag_sync, Category, CategoryId, CategoryRepository, CategoryWithProducts,
    CreateCategoryRequest, CreateProductRequest, CreateTagRequest, Error, Product, ProductDetail,
    ProductId, ProductRepository, ProductTag, ProductTagId, ProductTagRepository, Result, Tag,
    TagId, TagRepository, TagSyncPlan, TagWithProducts, UpdateCategoryRequest,
    UpdateProductRequest, UpdateTagRequest,
};

#[derive(Default)]
struct CatalogData {
    next_id: i32,
    categories: Vec<Category>,
    products: Vec<Product>,
    tags: Vec<Tag>,
    product_tags: Vec<ProductTag>,
}

impl CatalogData {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn check_category(&self, id: Option<CategoryId>) -> Result<()> {
        match id {
            Some(id) if !self.categories.iter().any(|c| c.id == id) => {
                Err(Error::InvalidInput(format!("unknown category {}", id)))
            }
            _ => Ok(()),
        }
    }

    fn check_tags(&self, ids: &[TagId]) -> Result<()> {
        match ids.iter().find(|id| !self.tags.iter().any(|t| t.id == **id)) {
            Some(id) => Err(Error::InvalidInput(format!("unknown tag {}", id))),
            None => Ok(()),
        }
    }

    fn rows_for(&self, product_id: ProductId) -> Vec<ProductTag> {
        self.product_tags
            .iter()
            .filter(|pt| pt.product_id == product_id)
            .copied()
            .collect()
    }

    fn insert_rows(&mut self, product_id: ProductId, tag_ids: &[TagId]) -> Vec<ProductTag> {
        let mut seen = HashSet::new();
        let mut rows = Vec::new();
        for &tag_id in tag_ids {
            if seen.insert(tag_id) {
                let row = ProductTag {
                    id: self.next_id(),
                    product_id,
                    tag_id,
                };
                self.product_tags.push(row);
                rows.push(row);
            }
        }
        rows
    }

    fn sync(&mut self, product_id: ProductId, desired: &[TagId]) -> Result<TagSyncPlan> {
        self.check_tags(desired)?;
        let plan = plan_tag_sync(&self.rows_for(product_id), desired);
        self.product_tags.retain(|pt| !plan.to_remove.contains(&pt.id));
        self.insert_rows(product_id, &plan.to_add);
        Ok(plan)
    }

    fn detail(&self, product: &Product) -> ProductDetail {
        let category = product
            .category_id
            .and_then(|id| self.categories.iter().find(|c| c.id == id).cloned());
        let tags = self
            .rows_for(product.id)
            .iter()
            .filter_map(|pt| self.tags.iter().find(|t| t.id == pt.tag_id).cloned())
            .collect();
        ProductDetail::new(product.clone(), category, tags)
    }

    fn category_with_products(&self, category: &Category) -> CategoryWithProducts {
        let products = self
            .products
            .iter()
            .filter(|p| p.category_id == Some(category.id))
            .cloned()
            .collect();
        CategoryWithProducts::new(category.clone(), products)
    }

    fn tag_with_products(&self, tag: &Tag) -> TagWithProducts {
        let products = self
            .product_tags
            .iter()
            .filter(|pt| pt.tag_id == tag.id)
            .filter_map(|pt| self.products.iter().find(|p| p.id == pt.product_id).cloned())
            .collect();
        TagWithProducts::new(tag.clone(), products)
    }
}

/// Repository set over shared in-memory vectors, enforcing the same
/// referential rules as the database schema.
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    data: Arc<Mutex<CatalogData>>,
}

impl MemoryCatalog {
    fn with<T>(&self, f: impl FnOnce(&mut CatalogData) -> T) -> T {
        let mut data = self.data.lock().unwrap();
        f(&mut data)
    }

    pub fn product_tag_rows(&self, product_id: ProductId) -> Vec<ProductTag> {
        self.with(|d| d.rows_for(product_id))
    }
}

#[async_trait]
impl CategoryRepository for MemoryCatalog {
    async fn create(&self, req: CreateCategoryRequest) -> Result<Category> {
        self.with(|d| {
            let category = Category {
                id: d.next_id(),
                category_name: req.category_name,
            };
            d.categories.push(category.clone());
            Ok(category)
        })
    }

    async fn get(&self, id: CategoryId) -> Result<Option<CategoryWithProducts>> {
        self.with(|d| {
            Ok(d.categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| d.category_with_products(c)))
        })
    }

    async fn list(&self) -> Result<Vec<CategoryWithProducts>> {
        self.with(|d| Ok(d.categories.iter().map(|c| d.category_with_products(c)).collect()))
    }

    async fn update(&self, id: CategoryId, req: UpdateCategoryRequest) -> Result<u64> {
        self.with(|d| match d.categories.iter_mut().find(|c| c.id == id) {
            Some(category) => {
                if let Some(name) = req.category_name {
                    category.category_name = name;
                }
                Ok(1)
            }
            None => Ok(0),
        })
    }

    async fn delete(&self, id: CategoryId) -> Result<u64> {
        self.with(|d| {
            let before = d.categories.len();
            d.categories.retain(|c| c.id != id);
            if d.categories.len() == before {
                return Ok(0);
            }
            for product in d.products.iter_mut().filter(|p| p.category_id == Some(id)) {
                product.category_id = None;
            }
            Ok(1)
        })
    }
}

#[async_trait]
impl ProductRepository for MemoryCatalog {
    async fn create(&self, req: CreateProductRequest) -> Result<ProductDetail> {
        self.with(|d| {
            d.check_category(req.category_id)?;
            let tag_ids = req.tag_ids.unwrap_or_default();
            d.check_tags(&tag_ids)?;

            let product = Product {
                id: d.next_id(),
                product_name: req.product_name,
                price: req.price,
                stock: req.stock,
                category_id: req.category_id,
            };
            d.products.push(product.clone());
            d.insert_rows(product.id, &tag_ids);
            Ok(d.detail(&product))
        })
    }

    async fn get(&self, id: ProductId) -> Result<Option<ProductDetail>> {
        self.with(|d| Ok(d.products.iter().find(|p| p.id == id).map(|p| d.detail(p))))
    }

    async fn list(&self) -> Result<Vec<ProductDetail>> {
        self.with(|d| Ok(d.products.iter().map(|p| d.detail(p)).collect()))
    }

    async fn update(&self, id: ProductId, req: UpdateProductRequest) -> Result<u64> {
        self.with(|d| {
            if !d.products.iter().any(|p| p.id == id) {
                return Ok(0);
            }
            if let Some(category_id) = req.category_id {
                d.check_category(category_id)?;
            }
            if let Some(desired) = req.tag_ids.desired() {
                d.check_tags(desired)?;
            }

            if let Some(product) = d.products.iter_mut().find(|p| p.id == id) {
                if let Some(name) = req.product_name {
                    product.product_name = name;
                }
                if let Some(price) = req.price {
                    product.price = price;
                }
                if let Some(stock) = req.stock {
                    product.stock = stock;
                }
                if let Some(category_id) = req.category_id {
                    product.category_id = category_id;
                }
            }
            if let Some(desired) = req.tag_ids.desired() {
                d.sync(id, desired)?;
            }
            Ok(1)
        })
    }

    async fn delete(&self, id: ProductId) -> Result<u64> {
        self.with(|d| {
            let before = d.products.len();
            d.products.retain(|p| p.id != id);
            d.product_tags.retain(|pt| pt.product_id != id);
            Ok((before - d.products.len()) as u64)
        })
    }

    async fn exists(&self, id: ProductId) -> Result<bool> {
        self.with(|d| Ok(d.products.iter().any(|p| p.id == id)))
    }
}

#[async_trait]
impl TagRepository for MemoryCatalog {
    async fn create(&self, req: CreateTagRequest) -> Result<Tag> {
        self.with(|d| {
            let tag = Tag {
                id: d.next_id(),
                tag_name: req.tag_name,
            };
            d.tags.push(tag.clone());
            Ok(tag)
        })
    }

    async fn get(&self, id: TagId) -> Result<Option<TagWithProducts>> {
        self.with(|d| Ok(d.tags.iter().find(|t| t.id == id).map(|t| d.tag_with_products(t))))
    }

    async fn list(&self) -> Result<Vec<TagWithProducts>> {
        self.with(|d| Ok(d.tags.iter().map(|t| d.tag_with_products(t)).collect()))
    }

    async fn update(&self, id: TagId, req: UpdateTagRequest) -> Result<u64> {
        self.with(|d| match d.tags.iter_mut().find(|t| t.id == id) {
            Some(tag) => {
                if let Some(name) = req.tag_name {
                    tag.tag_name = name;
                }
                Ok(1)
            }
            None => Ok(0),
        })
    }

    async fn delete(&self, id: TagId) -> Result<u64> {
        self.with(|d| {
            let before = d.tags.len();
            d.tags.retain(|t| t.id != id);
            d.product_tags.retain(|pt| pt.tag_id != id);
            Ok((before - d.tags.len()) as u64)
        })
    }
}

#[async_trait]
impl ProductTagRepository for MemoryCatalog {
    async fn list_for_product(&self, product_id: ProductId) -> Result<Vec<ProductTag>> {
        self.with(|d| Ok(d.rows_for(product_id)))
    }

    async fn bulk_create(
        &self,
        product_id: ProductId,
        tag_ids: &[TagId],
    ) -> Result<Vec<ProductTag>> {
        self.with(|d| {
            d.check_tags(tag_ids)?;
            if d.rows_for(product_id).iter().any(|pt| tag_ids.contains(&pt.tag_id)) {
                return Err(Error::InvalidInput("duplicate product tag".to_string()));
            }
            Ok(d.insert_rows(product_id, tag_ids))
        })
    }

    async fn bulk_delete(&self, ids: &[ProductTagId]) -> Result<u64> {
        self.with(|d| {
            let before = d.product_tags.len();
            d.product_tags.retain(|pt| !ids.contains(&pt.id));
            Ok((before - d.product_tags.len()) as u64)
        })
    }

    async fn sync_for_product(
        &self,
        product_id: ProductId,
        desired: &[TagId],
    ) -> Result<TagSyncPlan> {
        self.with(|d| d.sync(product_id, desired))
    }
}

/// Repository set whose every call fails as an unreachable database would.
#[derive(Clone, Default)]
pub struct FailingCatalog;

fn gateway_down<T>() -> Result<T> {
    Err(Error::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl CategoryRepository for FailingCatalog {
    async fn create(&self, _req: CreateCategoryRequest) -> Result<Category> {
        gateway_down()
    }
    async fn get(&self, _id: CategoryId) -> Result<Option<CategoryWithProducts>> {
        gateway_down()
    }
    async fn list(&self) -> Result<Vec<CategoryWithProducts>> {
        gateway_down()
    }
    async fn update(&self, _id: CategoryId, _req: UpdateCategoryRequest) -> Result<u64> {
        gateway_down()
    }
    async fn delete(&self, _id: CategoryId) -> Result<u64> {
        gateway_down()
    }
}

#[async_trait]
impl ProductRepository for FailingCatalog {
    async fn create(&self, _req: CreateProductRequest) -> Result<ProductDetail> {
        gateway_down()
    }
    async fn get(&self, _id: ProductId) -> Result<Option<ProductDetail>> {
        gateway_down()
    }
    async fn list(&self) -> Result<Vec<ProductDetail>> {
        gateway_down()
    }
    async fn update(&self, _id: ProductId, _req: UpdateProductRequest) -> Result<u64> {
        gateway_down()
    }
    async fn delete(&self, _id: ProductId) -> Result<u64> {
        gateway_down()
    }
    async fn exists(&self, _id: ProductId) -> Result<bool> {
        gateway_down()
    }
}

#[async_trait]
impl TagRepository for FailingCatalog {
    async fn create(&self, _req: CreateTagRequest) -> Result<Tag> {
        gateway_down()
    }
    async fn get(&self, _id: TagId) -> Result<Option<TagWithProducts>> {
        gateway_down()
    }
    async fn list(&self) -> Result<Vec<TagWithProducts>> {
        gateway_down()
    }
    async fn update(&self, _id: TagId, _req: UpdateTagRequest) -> Result<u64> {
        gateway_down()
    }
    async fn delete(&self, _id: TagId) -> Result<u64> {
        gateway_down()
    }
}

#[async_trait]
impl ProductTagRepository for FailingCatalog {
    async fn list_for_product(&self, _product_id: ProductId) -> Result<Vec<ProductTag>> {
        gateway_down()
    }
    async fn bulk_create(
        &self,
        _product_id: ProductId,
        _tag_ids: &[TagId],
    ) -> Result<Vec<ProductTag>> {
        gateway_down()
    }
    async fn bulk_delete(&self, _ids: &[ProductTagId]) -> Result<u64> {
        gateway_down()
    }
    async fn sync_for_product(
        &self,
        _product_id: ProductId,
        _desired: &[TagId],
    ) -> Result<TagSyncPlan> {
        gateway_down()
    }
}

/// Server bound to an ephemeral local port over a fresh in-memory catalog.
pub struct TestApp {
    pub base_url: String,
    client: reqwest::Client,
}

pub async fn test_app() -> (TestApp, MemoryCatalog) {
    let catalog = MemoryCatalog::default();
    let state = AppState::new(
        Arc::new(catalog.clone()),
        Arc::new(catalog.clone()),
        Arc::new(catalog.clone()),
        Arc::new(catalog.clone()),
    );
    (serve(state).await, catalog)
}

/// Server whose repositories always fail.
pub async fn failing_app() -> TestApp {
    let state = AppState::new(
        Arc::new(FailingCatalog),
        Arc::new(FailingCatalog),
        Arc::new(FailingCatalog),
        Arc::new(FailingCatalog),
    );
    serve(state).await
}

async fn serve(state: AppState) -> TestApp {
    let router = api_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
    }
}

/// Send a JSON request and return the status and parsed body
/// (`Value::Null` when the body is not JSON).
pub async fn send(app: &TestApp, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = body.map(|json| json.to_string()).unwrap_or_default();
    send_raw(app, method, uri, body).await
}

pub async fn send_raw(app: &TestApp, method: Method, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .client
        .request(method, format!("{}{}", app.base_url, uri))
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.bytes().await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Create a category and return its id.
pub async fn create_category(app: &TestApp, name: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/categories",
        Some(serde_json::json!({ "category_name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

/// Create a tag and return its id.
pub async fn create_tag(app: &TestApp, name: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/tags",
        Some(serde_json::json!({ "tag_name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

/// Tag ids of a product as returned by `GET /api/products/:id`, sorted.
pub async fn product_tag_ids(app: &TestApp, product_id: i64) -> Vec<i64> {
    let (status, body) = send(app, Method::GET, &format!("/api/products/{}", product_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let mut ids: Vec<i64> = body["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    ids
}
