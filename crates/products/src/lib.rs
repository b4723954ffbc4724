//! Products domain module.
//!
//! This crate contains the catalog's business rules: the product record, payload
//! validation, and the listing query composer. It is pure domain logic (no IO,
//! no HTTP, no storage).

pub mod page;
pub mod product;
pub mod query;

pub use page::Page;
pub use product::{NewProduct, Product, ProductCategory, ProductDraft, ProductPatch};
pub use query::{
    compose_listing, ListingParams, ListingPlan, PageRequest, ProductFilter, QueryError,
    MAX_PAGE_SIZE,
};
