use std::sync::Arc;

use fakestore_infra::{InMemoryProductStore, ProductStore};

use crate::config::StoreBackend;

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn ProductStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductStore::new()))
    }

    pub fn store(&self) -> &dyn ProductStore {
        self.store.as_ref()
    }

    /// Release store connections. Call once after the server stops.
    pub async fn shutdown(&self) {
        self.store.shutdown().await;
    }
}

pub async fn build_services(backend: &StoreBackend) -> anyhow::Result<AppServices> {
    match backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory product store");
            Ok(AppServices::in_memory())
        }
        #[cfg(feature = "mongo")]
        StoreBackend::Mongo { uri, database } => {
            use anyhow::Context;

            let store = fakestore_infra::MongoProductStore::connect(uri, database)
                .await
                .context("failed to connect to MongoDB")?;
            Ok(AppServices::new(Arc::new(store)))
        }
        #[cfg(not(feature = "mongo"))]
        StoreBackend::Mongo { .. } => {
            tracing::warn!(
                "STORE_BACKEND=mongo but the mongo feature is not enabled, falling back to in-memory"
            );
            Ok(AppServices::in_memory())
        }
    }
}
