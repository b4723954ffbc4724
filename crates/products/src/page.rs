//! Paged listing result.

use serde::{Deserialize, Serialize};

use crate::query::PageRequest;

/// One page of matching records plus totals for the whole match set.
///
/// Serialized in camelCase (`docs`, `totalDocs`, `totalPages`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub docs: Vec<T>,
    pub total_docs: u64,
    pub limit: u32,
    pub total_pages: u64,
    pub page: u32,
    /// 1-based position of the first record on this page.
    pub paging_counter: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    /// Build a page from the records already sliced out by the store.
    pub fn new(docs: Vec<T>, total_docs: u64, request: PageRequest) -> Self {
        let limit = request.page_size();
        let page = request.page();
        let total_pages = total_docs.div_ceil(u64::from(limit));
        let has_prev_page = page > 1;
        let has_next_page = u64::from(page) < total_pages;

        Self {
            docs,
            total_docs,
            limit,
            total_pages,
            page,
            paging_counter: request.offset() + 1,
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| page - 1),
            next_page: has_next_page.then(|| page + 1),
        }
    }

    /// Slice `all` (the full ordered match set) down to the requested page.
    pub fn from_matches(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let docs = all
            .into_iter()
            .skip(skip)
            .take(request.page_size() as usize)
            .collect();
        Self::new(docs, total, request)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            docs: self.docs.into_iter().map(f).collect(),
            total_docs: self.total_docs,
            limit: self.limit,
            total_pages: self.total_pages,
            page: self.page,
            paging_counter: self.paging_counter,
            has_prev_page: self.has_prev_page,
            has_next_page: self.has_next_page,
            prev_page: self.prev_page,
            next_page: self.next_page,
        }
    }
}
