use crate::backend::{SearchBackend, SearchParams};
use crate::error::SearchFailure;
use crate::models::{FilterCriteria, PageMeta, Property, DEFAULT_PAGE_SIZE};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a fetch did to the displayed page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Results and metadata were replaced
    Applied,
    /// Results were cleared and an error is active
    Failed,
    /// A newer request was issued meanwhile; the response was dropped
    Stale,
}

/// Result set of the last applied response
#[derive(Debug, Clone)]
pub struct PageState {
    pub results: Vec<Property>,
    pub meta: Option<PageMeta>,
    /// Server-reported page of the last success, else the last requested one
    pub current_page: u32,
    pub error: Option<SearchFailure>,
    pub busy: bool,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            meta: None,
            current_page: 1,
            error: None,
            busy: false,
        }
    }
}

impl PageState {
    /// Navigation is locked while a request is in flight
    pub fn can_go_prev(&self) -> bool {
        !self.busy && self.meta.is_some_and(|m| m.has_prev)
    }

    pub fn can_go_next(&self) -> bool {
        !self.busy && self.meta.is_some_and(|m| m.has_next)
    }

    pub fn total(&self) -> u64 {
        self.meta.map(|m| m.total).unwrap_or(0)
    }

    pub fn total_pages(&self) -> u32 {
        self.meta.map(|m| m.total_pages).unwrap_or(1)
    }

    /// Number of listings on the current page
    pub fn showing(&self) -> usize {
        self.results.len()
    }
}

struct Inner {
    page: PageState,
    /// Number of the most recently issued request
    sequence: u64,
    last_criteria: Option<FilterCriteria>,
}

/// Drives paged searches against the backend.
///
/// Requests are numbered as they are issued and only the response to the
/// latest one is applied, so a slow earlier page can never overwrite a newer
/// result set. Navigation trusts the server's `has_prev`/`has_next` flags and
/// is refused while a request is in flight.
pub struct PaginationController {
    backend: Arc<dyn SearchBackend>,
    page_size: u32,
    inner: Mutex<Inner>,
}

impl PaginationController {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self::with_page_size(backend, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(backend: Arc<dyn SearchBackend>, page_size: u32) -> Self {
        Self {
            backend,
            page_size: page_size.max(1),
            inner: Mutex::new(Inner {
                page: PageState::default(),
                sequence: 0,
                last_criteria: None,
            }),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Snapshot of the current page
    pub fn state(&self) -> PageState {
        self.inner.lock().page.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.lock().page.busy
    }

    pub fn current_page(&self) -> u32 {
        self.inner.lock().page.current_page
    }

    /// Request `target_page` of the search described by `criteria`
    pub async fn fetch_page(&self, criteria: &FilterCriteria, target_page: u32) -> FetchOutcome {
        let target_page = target_page.max(1);
        let request_id = {
            let mut inner = self.inner.lock();
            inner.sequence += 1;
            inner.page.error = None;
            inner.page.busy = true;
            inner.last_criteria = Some(criteria.clone());
            inner.sequence
        };

        let params = SearchParams::new(criteria, target_page, self.page_size);
        debug!(
            "Request {} to {}: page {}",
            request_id,
            self.backend.backend_name(),
            target_page
        );
        let result = self.backend.search(&params).await;

        let mut inner = self.inner.lock();
        if request_id != inner.sequence {
            debug!(
                "Discarding response {} for page {}; request {} is newer",
                request_id, target_page, inner.sequence
            );
            return FetchOutcome::Stale;
        }

        let page = &mut inner.page;
        page.busy = false;
        match result {
            Ok(response) if response.success => {
                page.current_page = response.meta.map(|m| m.page).unwrap_or(target_page);
                page.results = response.properties;
                page.meta = response.meta;
                info!(
                    "Page {} of {}: {} properties ({} total)",
                    page.current_page,
                    page.total_pages(),
                    page.results.len(),
                    page.total()
                );
                FetchOutcome::Applied
            }
            Ok(response) => {
                let failure = SearchFailure::rejected(response.message);
                warn!("Search rejected: {}", failure);
                page.results.clear();
                page.meta = None;
                page.error = Some(failure);
                FetchOutcome::Failed
            }
            Err(e) => {
                warn!("Search request failed: {}", e);
                page.results.clear();
                page.meta = None;
                page.error = Some(SearchFailure::from_transport(&e));
                FetchOutcome::Failed
            }
        }
    }

    /// Previous page, if the server says there is one
    pub async fn go_prev(&self) -> Option<FetchOutcome> {
        let (criteria, target) = {
            let inner = self.inner.lock();
            if !inner.page.can_go_prev() {
                return None;
            }
            let meta = inner.page.meta?;
            let criteria = inner.last_criteria.clone()?;
            (criteria, meta.page.saturating_sub(1).max(1))
        };
        Some(self.fetch_page(&criteria, target).await)
    }

    /// Next page, if the server says there is one
    pub async fn go_next(&self) -> Option<FetchOutcome> {
        let (criteria, target) = {
            let inner = self.inner.lock();
            if !inner.page.can_go_next() {
                return None;
            }
            let meta = inner.page.meta?;
            let criteria = inner.last_criteria.clone()?;
            (criteria, meta.page.max(1) + 1)
        };
        Some(self.fetch_page(&criteria, target).await)
    }
}
