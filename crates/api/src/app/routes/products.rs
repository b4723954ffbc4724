use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use fakestore_core::ProductId;
use fakestore_infra::Listing;
use fakestore_products::{compose_listing, ListingParams, ProductDraft};

use crate::app::dto::{self, DeleteProductResponse, ProductPage, ProductResponse};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// List products, optionally filtered and paged.
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    params(dto::ListProductsQuery),
    responses(
        (status = 200, description = "Matching products; a ProductPage when both page and pageSize are given", body = [ProductResponse]),
        (status = 400, description = "Invalid paging parameters", body = dto::ErrorBody),
        (status = 500, description = "Store failure", body = dto::ErrorBody),
    )
)]
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::ListProductsQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };
    let plan = match compose_listing(&ListingParams::from(query)) {
        Ok(plan) => plan,
        Err(e) => return errors::query_error_to_response(e),
    };

    match services.store().list(&plan).await {
        Ok(Listing::All(items)) => {
            let items = items.into_iter().map(ProductResponse::from).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Ok(Listing::Paged(page)) => (StatusCode::OK, Json(ProductPage::from(page))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Fetch one product by id.
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "The requested product", body = ProductResponse),
        (status = 404, description = "No product with this id", body = dto::MessageBody),
        (status = 500, description = "Store failure", body = dto::ErrorBody),
    )
)]
pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().find_by_id(&id).await {
        Ok(Some(product)) => (StatusCode::OK, Json(ProductResponse::from(product))).into_response(),
        Ok(None) => errors::not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Create a product. Every field is required.
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "products",
    request_body = dto::ProductBody,
    responses(
        (status = 201, description = "Created", body = ProductResponse),
        (status = 400, description = "Missing or invalid fields", body = dto::ErrorBody),
        (status = 500, description = "Store failure", body = dto::ErrorBody),
    )
)]
pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::ProductBody>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let new = match ProductDraft::from(body).into_new() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().create(new).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, category = %product.category, "product created");
            (StatusCode::CREATED, Json(ProductResponse::from(product))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Overwrite the given fields of a product.
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product id")),
    request_body = dto::ProductBody,
    responses(
        (status = 200, description = "The updated product", body = ProductResponse),
        (status = 400, description = "Invalid fields or id", body = dto::ErrorBody),
        (status = 404, description = "No product with this id", body = dto::MessageBody),
        (status = 500, description = "Store failure", body = dto::ErrorBody),
    )
)]
pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let body = match update_body(&headers, &body) {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let patch = match ProductDraft::from(body).into_patch() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().update_by_id(&id, patch).await {
        Ok(Some(product)) => {
            tracing::info!(product_id = %product.id, "product updated");
            (StatusCode::OK, Json(ProductResponse::from(product))).into_response()
        }
        Ok(None) => errors::not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// A missing body, or one not sent as JSON, is an empty update.
fn update_body(headers: &HeaderMap, bytes: &Bytes) -> Result<dto::ProductBody, JsonRejection> {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));
    if bytes.is_empty() || !is_json {
        return Ok(dto::ProductBody::default());
    }
    let Json(body) = Json::<dto::ProductBody>::from_bytes(bytes)?;
    Ok(body)
}

/// Permanently delete a product.
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Deleted; echoes the removed product", body = DeleteProductResponse),
        (status = 404, description = "No product with this id", body = dto::MessageBody),
        (status = 500, description = "Store failure", body = dto::ErrorBody),
    )
)]
pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().delete_by_id(&id).await {
        Ok(Some(product)) => {
            tracing::info!(product_id = %product.id, "product deleted");
            let body = DeleteProductResponse {
                message: "Product deleted".to_string(),
                product: ProductResponse::from(product),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(None) => errors::not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}
