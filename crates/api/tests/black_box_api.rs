use std::sync::Arc;

use async_trait::async_trait;
use fakestore_api::app::{build_app, services::AppServices};
use fakestore_core::ProductId;
use fakestore_infra::{ProductStore, StoreError};
use fakestore_products::{NewProduct, Page, PageRequest, Product, ProductFilter, ProductPatch};
use reqwest::StatusCode;
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over a fresh in-memory store, on an ephemeral port.
        Self::spawn_with(AppServices::in_memory()).await
    }

    async fn spawn_with(services: AppServices) -> Self {
        let app = build_app(Arc::new(services));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn products(&self) -> String {
        format!("{}/api/products", self.base_url)
    }

    fn product(&self, id: &str) -> String {
        format!("{}/api/products/{}", self.base_url, id)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Store whose every call fails like a lost database connection.
struct FailingStore;

fn db_down<T>() -> Result<T, StoreError> {
    Err(StoreError::Backend("db down".to_string()))
}

#[async_trait]
impl ProductStore for FailingStore {
    async fn create(&self, _product: NewProduct) -> Result<Product, StoreError> {
        db_down()
    }

    async fn find(&self, _filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        db_down()
    }

    async fn find_page(
        &self,
        _filter: &ProductFilter,
        _request: PageRequest,
    ) -> Result<Page<Product>, StoreError> {
        db_down()
    }

    async fn find_by_id(&self, _id: &ProductId) -> Result<Option<Product>, StoreError> {
        db_down()
    }

    async fn update_by_id(
        &self,
        _id: &ProductId,
        _patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        db_down()
    }

    async fn delete_by_id(&self, _id: &ProductId) -> Result<Option<Product>, StoreError> {
        db_down()
    }
}

fn product_body(name: &str, category: &str) -> Value {
    json!({
        "name": name,
        "price": 25.0,
        "description": format!("{name} for testing"),
        "category": category,
        "image": "http://img.example/p.png",
    })
}

async fn create(client: &reqwest::Client, srv: &TestServer, body: &Value) -> Value {
    let res = client.post(srv.products()).json(body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn list(client: &reqwest::Client, srv: &TestServer, query: &[(&str, &str)]) -> (StatusCode, Value) {
    let res = client.get(srv.products()).query(query).send().await.unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

fn names(items: &Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_then_get_returns_same_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let body = json!({
        "name": "Drone X",
        "price": 199.99,
        "description": "...",
        "category": "Drones",
        "image": "http://x/y.png",
    });
    let created = create(&client, &srv, &body).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    for field in ["name", "price", "description", "category", "image"] {
        assert_eq!(created[field], body[field], "field {field}");
    }

    let res = client.get(srv.product(&id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn unknown_id_is_404_with_fixed_message() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.product("unknown-id")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Product not found" }));

    let res = client
        .put(srv.product("unknown-id"))
        .json(&json!({ "price": 1.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.delete(srv.product("unknown-id")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create(&client, &srv, &product_body("Smart Plug", "Smart Home")).await;
    let id = created["id"].as_str().unwrap();

    let res = client.delete(srv.product(id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Product deleted");
    assert_eq!(body["product"]["id"], created["id"]);

    let res = client.get(srv.product(id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_changes_only_present_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create(&client, &srv, &product_body("Webcam", "Cameras")).await;
    let id = created["id"].as_str().unwrap();

    let res = client
        .put(srv.product(id))
        .json(&json!({ "price": 39.5, "id": "attempted-override" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();

    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["price"], 39.5);
    for field in ["name", "description", "category", "image"] {
        assert_eq!(updated[field], created[field], "field {field}");
    }
}

#[tokio::test]
async fn category_filter_is_exact() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create(&client, &srv, &product_body("Console", "Gaming")).await;
    create(&client, &srv, &product_body("Tripod", "Accessories")).await;
    create(&client, &srv, &product_body("Joystick", "Gaming")).await;

    let (status, items) = list(&client, &srv, &[("category", "Gaming")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&items), ["Console", "Joystick"]);

    let (_, items) = list(&client, &srv, &[("category", "gaming")]).await;
    assert!(items.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn name_filter_is_case_insensitive_substring() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create(&client, &srv, &product_body("LAMP Deluxe", "Smart Home")).await;
    create(&client, &srv, &product_body("Floor Lamp", "Home Appliances")).await;
    create(&client, &srv, &product_body("Bedside lamp", "Smart Home")).await;
    create(&client, &srv, &product_body("Ceiling Fan", "Home Appliances")).await;

    let (status, items) = list(&client, &srv, &[("name", "lamp")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&items), ["LAMP Deluxe", "Floor Lamp", "Bedside lamp"]);

    let (_, items) = list(&client, &srv, &[("name", "lamp"), ("category", "Smart Home")]).await;
    assert_eq!(names(&items), ["LAMP Deluxe", "Bedside lamp"]);
}

#[tokio::test]
async fn paging_returns_requested_slice_and_totals() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for i in 1..=12 {
        create(&client, &srv, &product_body(&format!("Watch {i}"), "Wearables")).await;
    }

    let (status, page) = list(&client, &srv, &[("page", "2"), ("pageSize", "5")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&page["docs"]), ["Watch 6", "Watch 7", "Watch 8", "Watch 9", "Watch 10"]);
    assert_eq!(page["totalDocs"], 12);
    assert_eq!(page["totalPages"], 3);
    assert_eq!(page["page"], 2);
    assert_eq!(page["limit"], 5);
    assert_eq!(page["hasNextPage"], true);
}

#[tokio::test]
async fn paging_composes_with_filters() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for i in 1..=4 {
        create(&client, &srv, &product_body(&format!("Cam {i}"), "Cameras")).await;
        create(&client, &srv, &product_body(&format!("Drone {i}"), "Drones")).await;
    }

    let (status, page) = list(
        &client,
        &srv,
        &[("category", "Drones"), ("page", "2"), ("pageSize", "3")],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&page["docs"]), ["Drone 4"]);
    assert_eq!(page["totalDocs"], 4);
}

#[tokio::test]
async fn incomplete_paging_returns_full_list() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for i in 1..=3 {
        create(&client, &srv, &product_body(&format!("Cable {i}"), "Accessories")).await;
    }

    let (status, items) = list(&client, &srv, &[("page", "1")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn invalid_paging_is_400() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for (page, size) in [("0", "5"), ("abc", "5"), ("1", "-3")] {
        let (status, body) = list(&client, &srv, &[("page", page), ("pageSize", size)]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "page={page} pageSize={size}");
        assert!(body["error"].as_str().unwrap().contains("positive integer"));
    }
}

#[tokio::test]
async fn empty_catalog_lists_as_empty_array() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, items) = list(&client, &srv, &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items, json!([]));
}

#[tokio::test]
async fn invalid_create_payloads_are_rejected_with_error_body() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut missing_image = product_body("Router", "Computers");
    missing_image.as_object_mut().unwrap().remove("image");
    let res = client.post(srv.products()).json(&missing_image).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("image is required"));

    let res = client
        .post(srv.products())
        .json(&product_body("Sofa", "Furniture"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(srv.products())
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(format!("{}/api-docs", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let doc: Value = res.json().await.unwrap();
    assert_eq!(doc["info"]["title"], "My Fake Store API");
    assert!(doc["paths"]["/api/products"].is_object());
}

#[tokio::test]
async fn store_failures_are_500_with_error_body() {
    let srv = TestServer::spawn_with(AppServices::new(Arc::new(FailingStore))).await;
    let client = reqwest::Client::new();
    let body = product_body("Headset", "Gaming");

    let requests = [
        ("list", client.get(srv.products())),
        ("paged list", client.get(srv.products()).query(&[("page", "1"), ("pageSize", "5")])),
        ("get", client.get(srv.product("some-id"))),
        ("create", client.post(srv.products()).json(&body)),
        ("update", client.put(srv.product("some-id")).json(&json!({ "price": 5.0 }))),
        ("delete", client.delete(srv.product("some-id"))),
    ];
    for (label, request) in requests {
        let res = request.send().await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR, "{label}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "error": "db down" }), "{label}");
    }
}

#[tokio::test]
async fn update_without_body_returns_record_unchanged() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create(&client, &srv, &product_body("Mouse", "Accessories")).await;
    let id = created["id"].as_str().unwrap();

    let res = client.put(srv.product(id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, created);

    let res = client
        .put(srv.product(id))
        .header("content-type", "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, created);
}

#[tokio::test]
async fn update_with_malformed_json_is_400() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create(&client, &srv, &product_body("Keyboard", "Accessories")).await;
    let id = created["id"].as_str().unwrap();

    let res = client
        .put(srv.product(id))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].is_string());
}
