use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use fakestore_products::{ListingParams, Page, Product, ProductDraft};

// -------------------------
// Request DTOs
// -------------------------

/// Listing query string. Values stay raw here; the composer validates them.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProductsQuery {
    /// Exact category match (e.g. `Gaming`, `Smart Home`).
    pub category: Option<String>,
    /// Case-insensitive substring of the product name.
    pub name: Option<String>,
    /// 1-indexed page number; only used together with `pageSize`.
    #[param(value_type = Option<u32>)]
    pub page: Option<String>,
    /// Records per page; only used together with `page`.
    #[serde(rename = "pageSize")]
    #[param(value_type = Option<u32>)]
    pub page_size: Option<String>,
}

impl From<ListProductsQuery> for ListingParams {
    fn from(q: ListProductsQuery) -> Self {
        ListingParams {
            category: q.category,
            name: q.name,
            page: q.page,
            page_size: q.page_size,
        }
    }
}

/// Product fields as sent by clients. Create needs all of them; update any subset.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductBody {
    #[schema(example = "Drone X")]
    pub name: Option<String>,
    #[schema(example = 199.99)]
    pub price: Option<f64>,
    pub description: Option<String>,
    #[schema(example = "Drones")]
    pub category: Option<String>,
    #[schema(example = "http://example.com/drone.png")]
    pub image: Option<String>,
}

impl From<ProductBody> for ProductDraft {
    fn from(body: ProductBody) -> Self {
        ProductDraft {
            name: body.name,
            price: body.price,
            description: body.description,
            category: body.category,
            image: body.image,
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    #[schema(example = "Drones")]
    pub category: String,
    pub image: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id.into(),
            name: p.name,
            price: p.price,
            description: p.description,
            category: p.category.as_str().to_string(),
            image: p.image,
        }
    }
}

/// One page of products plus totals for the whole match set.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub docs: Vec<ProductResponse>,
    pub total_docs: u64,
    pub limit: u32,
    pub total_pages: u64,
    pub page: u32,
    pub paging_counter: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
}

impl From<Page<Product>> for ProductPage {
    fn from(page: Page<Product>) -> Self {
        let page = page.map(ProductResponse::from);
        Self {
            docs: page.docs,
            total_docs: page.total_docs,
            limit: page.limit,
            total_pages: page.total_pages,
            page: page.page,
            paging_counter: page.paging_counter,
            has_prev_page: page.has_prev_page,
            has_next_page: page.has_next_page,
            prev_page: page.prev_page,
            next_page: page.next_page,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteProductResponse {
    #[schema(example = "Product deleted")]
    pub message: String,
    pub product: ProductResponse,
}

/// Body of 400/500 responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of 404 responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageBody {
    #[schema(example = "Product not found")]
    pub message: String,
}
