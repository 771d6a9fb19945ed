use crate::backend::SearchBackend;
use crate::error::SearchFailure;
use crate::feeds::{AuxiliaryFeedLoader, FeedHandle, FeedState};
use crate::models::{FilterCriteria, Property, RecentSearchEntry};
use crate::pagination::{FetchOutcome, PageState, PaginationController};
use crate::recent::RecentSearchStore;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Lifecycle of the most recent search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
    Success,
    Failed,
}

/// What the search view should show right now
#[derive(Debug, Clone)]
pub enum ViewContent {
    /// Before the first search: highlighted listings
    Home {
        highlights: Vec<Property>,
        loading: bool,
    },
    Searching,
    Results(PageState),
    NoResults,
    Error(SearchFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Every criteria field was at its default; nothing was sent
    Blocked,
    Fetched(FetchOutcome),
}

/// Ties criteria, paging, history and the auxiliary feeds together.
///
/// Once the first search is submitted the home feed is never shown again,
/// even if later searches come back empty.
pub struct SearchViewModel {
    criteria: Mutex<FilterCriteria>,
    pagination: PaginationController,
    recents: Mutex<RecentSearchStore>,
    feeds: AuxiliaryFeedLoader,
    feed_handle: Mutex<Option<FeedHandle>>,
    has_searched: AtomicBool,
    phase: Mutex<SearchPhase>,
}

impl SearchViewModel {
    pub fn new(backend: Arc<dyn SearchBackend>, recents: RecentSearchStore, page_size: u32) -> Self {
        Self {
            criteria: Mutex::new(FilterCriteria::default()),
            pagination: PaginationController::with_page_size(backend.clone(), page_size),
            recents: Mutex::new(recents),
            feeds: AuxiliaryFeedLoader::new(backend),
            feed_handle: Mutex::new(None),
            has_searched: AtomicBool::new(false),
            phase: Mutex::new(SearchPhase::Idle),
        }
    }

    /// Kick off the auxiliary feeds. Calling it again while mounted is a no-op.
    pub fn mount(&self) {
        let mut handle = self.feed_handle.lock();
        if handle.as_ref().is_some_and(|h| !h.is_torn_down()) {
            return;
        }
        debug!("Mounting search view");
        *handle = Some(self.feeds.mount());
    }

    /// Cancel feed requests still in flight
    pub fn teardown(&self) {
        if let Some(handle) = self.feed_handle.lock().as_ref() {
            debug!("Tearing down search view");
            handle.teardown();
        }
    }

    /// Wait until the mounted feed fetches have settled
    pub async fn feeds_settled(&self) {
        let handle = self.feed_handle.lock().take();
        if let Some(handle) = handle {
            handle.join().await;
        }
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.criteria.lock().clone()
    }

    pub fn set_criteria(&self, criteria: FilterCriteria) {
        *self.criteria.lock() = criteria;
    }

    pub fn update_criteria(&self, edit: impl FnOnce(&mut FilterCriteria)) {
        edit(&mut self.criteria.lock());
    }

    /// Whether the search action should be enabled
    pub fn can_submit(&self) -> bool {
        self.criteria.lock().is_submittable() && !self.pagination.is_busy()
    }

    pub fn is_loading(&self) -> bool {
        self.pagination.is_busy()
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> SearchPhase {
        *self.phase.lock()
    }

    pub fn page(&self) -> PageState {
        self.pagination.state()
    }

    pub fn pagination(&self) -> &PaginationController {
        &self.pagination
    }

    pub fn feeds(&self) -> FeedState {
        self.feeds.state()
    }

    pub fn trending(&self) -> Vec<FilterCriteria> {
        self.feeds.trending()
    }

    pub fn recents(&self) -> Vec<RecentSearchEntry> {
        self.recents.lock().entries().to_vec()
    }

    pub fn clear_recents(&self) {
        self.recents.lock().clear();
    }

    /// Search from page 1 with the current criteria, then remember them
    pub async fn submit(&self) -> SubmitOutcome {
        let criteria = self.criteria();
        if !criteria.is_submittable() {
            debug!("Submit ignored: no criteria set");
            return SubmitOutcome::Blocked;
        }

        self.has_searched.store(true, Ordering::SeqCst);
        *self.phase.lock() = SearchPhase::Searching;
        info!("Searching: {}", criteria.chip_label());

        let outcome = self.pagination.fetch_page(&criteria, 1).await;
        self.settle(outcome);
        self.recents.lock().record(criteria);

        SubmitOutcome::Fetched(outcome)
    }

    /// Replace the criteria with a trending or recent chip and search
    pub async fn quick_search(&self, criteria: FilterCriteria) -> SubmitOutcome {
        self.set_criteria(criteria);
        self.submit().await
    }

    pub async fn go_prev(&self) -> Option<FetchOutcome> {
        let outcome = self.pagination.go_prev().await?;
        self.settle(outcome);
        Some(outcome)
    }

    pub async fn go_next(&self) -> Option<FetchOutcome> {
        let outcome = self.pagination.go_next().await?;
        self.settle(outcome);
        Some(outcome)
    }

    fn settle(&self, outcome: FetchOutcome) {
        let next = match outcome {
            FetchOutcome::Applied => SearchPhase::Success,
            FetchOutcome::Failed => SearchPhase::Failed,
            // The newer request owns the phase
            FetchOutcome::Stale => return,
        };
        *self.phase.lock() = next;
    }

    pub fn content(&self) -> ViewContent {
        if !self.has_searched() {
            let feeds = self.feeds.state();
            return ViewContent::Home {
                highlights: feeds.home_feed,
                loading: feeds.home_loading,
            };
        }

        let page = self.pagination.state();
        if page.busy {
            ViewContent::Searching
        } else if let Some(error) = page.error.clone() {
            ViewContent::Error(error)
        } else if page.results.is_empty() {
            ViewContent::NoResults
        } else {
            ViewContent::Results(page)
        }
    }
}
