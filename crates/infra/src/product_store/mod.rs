//! Product record store boundary.
//!
//! This module defines the async storage abstraction the HTTP handlers talk to,
//! plus an in-memory implementation (dev/test) and a MongoDB adapter behind the
//! `mongo` feature.

pub mod in_memory;
#[cfg(feature = "mongo")]
pub mod mongo;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
#[cfg(feature = "mongo")]
pub use mongo::MongoProductStore;
pub use r#trait::{Listing, ProductStore, StoreError};
