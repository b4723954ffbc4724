//! Listing query composition.
//!
//! Turns raw listing parameters (as they arrive on a query string) into a typed
//! filter plus an optional paging request. Stores either evaluate
//! [`ProductFilter::matches`] directly or translate the filter into an
//! equivalent native query.

use serde::Deserialize;
use thiserror::Error;

use crate::product::Product;

/// Upper bound for `pageSize`; larger requests are clamped.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw listing parameters. Every field is optional and unparsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListingParams {
    pub category: Option<String>,
    pub name: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("{param} must be a positive integer (got `{value}`)")]
    InvalidPaging { param: &'static str, value: String },
}

/// Field constraints for a listing. Present criteria combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact, case-sensitive category equality.
    pub category: Option<String>,
    /// Case-insensitive literal substring of the product name.
    pub name: Option<String>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if product.category.as_str() != category {
                return false;
            }
        }
        if let Some(needle) = &self.name {
            if !product.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// A 1-indexed page of `page_size` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Returns `None` when either value is zero. `page_size` is clamped to
    /// [`MAX_PAGE_SIZE`].
    pub fn new(page: u32, page_size: u32) -> Option<Self> {
        if page == 0 || page_size == 0 {
            return None;
        }
        Some(Self {
            page,
            page_size: page_size.min(MAX_PAGE_SIZE),
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of matching records preceding this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

/// What the store should be asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPlan {
    pub filter: ProductFilter,
    pub paging: Option<PageRequest>,
}

/// Compose a listing plan from raw parameters.
///
/// Empty strings count as absent. Paging applies only when both `page` and
/// `pageSize` are given; any paging value that is present must be a positive
/// integer.
pub fn compose_listing(params: &ListingParams) -> Result<ListingPlan, QueryError> {
    let filter = ProductFilter {
        category: non_empty(params.category.as_deref()),
        name: non_empty(params.name.as_deref()),
    };

    let page = parse_positive("page", params.page.as_deref())?;
    let page_size = parse_positive("pageSize", params.page_size.as_deref())?;

    let paging = match (page, page_size) {
        (Some(page), Some(page_size)) => PageRequest::new(page, page_size),
        _ => None,
    };

    Ok(ListingPlan { filter, paging })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

fn parse_positive(param: &'static str, raw: Option<&str>) -> Result<Option<u32>, QueryError> {
    let Some(raw) = raw.filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(QueryError::InvalidPaging {
            param,
            value: raw.to_string(),
        }),
    }
}
