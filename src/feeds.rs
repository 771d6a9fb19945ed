use crate::backend::SearchBackend;
use crate::models::{FilterCriteria, Property};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Auxiliary content loaded alongside the search view
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    /// Suggested quick searches; empty until a non-empty list arrives
    pub trending: Vec<FilterCriteria>,
    /// Highlighted listings for the home view, all tagged as featured
    pub home_feed: Vec<Property>,
    pub home_loading: bool,
}

/// Loads trending suggestions and the home feed.
///
/// Failures leave the corresponding feed empty and are only logged. Each
/// load takes a cancellation token that is checked before any state change,
/// so responses arriving after teardown are ignored.
#[derive(Clone)]
pub struct AuxiliaryFeedLoader {
    backend: Arc<dyn SearchBackend>,
    state: Arc<Mutex<FeedState>>,
}

impl AuxiliaryFeedLoader {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(FeedState::default())),
        }
    }

    pub fn state(&self) -> FeedState {
        self.state.lock().clone()
    }

    pub fn trending(&self) -> Vec<FilterCriteria> {
        self.state.lock().trending.clone()
    }

    pub fn home_feed(&self) -> Vec<Property> {
        self.state.lock().home_feed.clone()
    }

    /// Start both fetches in the background. Dropping or tearing down the
    /// returned handle cancels whatever is still in flight.
    pub fn mount(&self) -> FeedHandle {
        let token = CancellationToken::new();

        let trending = {
            let loader = self.clone();
            let token = token.clone();
            tokio::spawn(async move { loader.load_trending(&token).await })
        };
        let home = {
            let loader = self.clone();
            let token = token.clone();
            tokio::spawn(async move { loader.load_home_feed(&token).await })
        };

        FeedHandle {
            token,
            tasks: vec![trending, home],
        }
    }

    pub async fn load_trending(&self, token: &CancellationToken) {
        let result = tokio::select! {
            _ = token.cancelled() => {
                debug!("Trending fetch cancelled");
                return;
            }
            result = self.backend.trending() => result,
        };
        if token.is_cancelled() {
            return;
        }

        match result {
            Ok(items) if !items.is_empty() => {
                info!("Loaded {} trending searches", items.len());
                self.state.lock().trending = items;
            }
            Ok(_) => debug!("No trending searches available"),
            Err(e) => warn!("Could not load trending searches: {}", e),
        }
    }

    pub async fn load_home_feed(&self, token: &CancellationToken) {
        if token.is_cancelled() {
            return;
        }
        self.state.lock().home_loading = true;

        let result = tokio::select! {
            _ = token.cancelled() => {
                debug!("Home feed fetch cancelled");
                return;
            }
            result = self.backend.home_feed() => result,
        };
        if token.is_cancelled() {
            return;
        }

        let highlights = match result {
            Ok(feed) => feed.into_highlights(),
            Err(e) => {
                warn!("Could not load home feed: {}", e);
                Vec::new()
            }
        };
        info!("Home feed has {} highlighted listings", highlights.len());

        let mut state = self.state.lock();
        state.home_feed = highlights;
        state.home_loading = false;
    }
}

/// Background fetches started by [`AuxiliaryFeedLoader::mount`]
pub struct FeedHandle {
    token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl FeedHandle {
    /// Cancel in-flight fetches; their results will not be applied
    pub fn teardown(&self) {
        self.token.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for both fetches to finish or observe cancellation
    pub async fn join(mut self) {
        for task in std::mem::take(&mut self.tasks) {
            if let Err(e) = task.await {
                warn!("Feed task failed: {}", e);
            }
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
