//! Infrastructure layer: record stores and their driver adapters.

pub mod product_store;

pub use product_store::{InMemoryProductStore, Listing, ProductStore, StoreError};
#[cfg(feature = "mongo")]
pub use product_store::MongoProductStore;
