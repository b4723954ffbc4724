use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use fakestore_core::ProductId;
use fakestore_products::{ListingPlan, NewProduct, Page, PageRequest, Product, ProductFilter, ProductPatch};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The identifier is not in the format this store assigns.
    #[error("invalid product id: {0}")]
    InvalidId(String),

    /// Driver, connectivity or persistence fault.
    #[error("{0}")]
    Backend(String),
}

/// Result of executing a [`ListingPlan`].
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    All(Vec<Product>),
    Paged(Page<Product>),
}

/// Async record store for catalog products.
///
/// Every method is a single store round-trip. Implementations must keep
/// listings in a stable insertion order so paging is deterministic.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persist a new record; the store assigns its id.
    async fn create(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// Every record matching `filter`.
    async fn find(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError>;

    /// One page of the records matching `filter`, plus totals.
    async fn find_page(
        &self,
        filter: &ProductFilter,
        request: PageRequest,
    ) -> Result<Page<Product>, StoreError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;

    /// Apply `patch` and return the updated record, or `None` if absent.
    async fn update_by_id(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError>;

    /// Hard delete. Returns the removed record, or `None` if absent.
    async fn delete_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;

    /// Release connections. Called once after the server stops.
    async fn shutdown(&self) {}

    /// Execute a composed listing: paged when the plan asks for it, full otherwise.
    async fn list(&self, plan: &ListingPlan) -> Result<Listing, StoreError> {
        match plan.paging {
            Some(request) => self.find_page(&plan.filter, request).await.map(Listing::Paged),
            None => self.find(&plan.filter).await.map(Listing::All),
        }
    }
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn create(&self, product: NewProduct) -> Result<Product, StoreError> {
        (**self).create(product).await
    }

    async fn find(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        (**self).find(filter).await
    }

    async fn find_page(
        &self,
        filter: &ProductFilter,
        request: PageRequest,
    ) -> Result<Page<Product>, StoreError> {
        (**self).find_page(filter, request).await
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn update_by_id(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        (**self).update_by_id(id, patch).await
    }

    async fn delete_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        (**self).delete_by_id(id).await
    }

    async fn shutdown(&self) {
        (**self).shutdown().await
    }
}
