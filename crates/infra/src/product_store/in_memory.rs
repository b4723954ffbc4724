use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use fakestore_core::{Entity, ProductId};
use fakestore_products::{NewProduct, Page, PageRequest, Product, ProductFilter, ProductPatch};

use super::r#trait::{ProductStore, StoreError};

/// In-memory product store.
///
/// Intended for tests/dev. Records are kept in insertion order; lookups are
/// linear scans.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    records: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Product>>, StoreError> {
        self.records
            .read()
            .map_err(|_| StoreError::Backend("product store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Product>>, StoreError> {
        self.records
            .write()
            .map_err(|_| StoreError::Backend("product store lock poisoned".to_string()))
    }

    fn matching(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .read()?
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, product: NewProduct) -> Result<Product, StoreError> {
        let record = Product::from_new(ProductId::generate(), product);
        self.write()?.push(record.clone());
        tracing::debug!(product_id = %record.id, "product stored in memory");
        Ok(record)
    }

    async fn find(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        self.matching(filter)
    }

    async fn find_page(
        &self,
        filter: &ProductFilter,
        request: PageRequest,
    ) -> Result<Page<Product>, StoreError> {
        Ok(Page::from_matches(self.matching(filter)?, request))
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.read()?.iter().find(|p| p.has_id(id)).cloned())
    }

    async fn update_by_id(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        let mut records = self.write()?;
        let Some(record) = records.iter_mut().find(|p| p.has_id(id)) else {
            return Ok(None);
        };
        patch.apply(record);
        Ok(Some(record.clone()))
    }

    async fn delete_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let mut records = self.write()?;
        let position = records.iter().position(|p| p.has_id(id));
        let removed = position.map(|idx| records.remove(idx));
        if removed.is_some() {
            tracing::debug!(product_id = %id, "product removed from memory");
        }
        Ok(removed)
    }
}
