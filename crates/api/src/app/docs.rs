//! OpenAPI document for the catalog API, served at `/api-docs`.

use axum::Json;
use utoipa::OpenApi;

use crate::app::{dto, routes};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "My Fake Store API",
        version = "1.0.0",
        description = "A simple API to manage fake store products"
    ),
    paths(
        routes::products::list_products,
        routes::products::get_product,
        routes::products::create_product,
        routes::products::update_product,
        routes::products::delete_product,
    ),
    components(schemas(
        dto::ProductBody,
        dto::ProductResponse,
        dto::ProductPage,
        dto::DeleteProductResponse,
        dto::ErrorBody,
        dto::MessageBody,
    )),
    tags((name = "products", description = "Product catalog"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
