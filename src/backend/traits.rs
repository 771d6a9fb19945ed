use crate::backend::types::{HomeFeed, SearchParams, SearchResponse};
use crate::error::TransportError;
use crate::models::FilterCriteria;
use async_trait::async_trait;

/// The property-search service as seen by the client.
///
/// `HttpBackend` talks to the real service; tests plug in scripted
/// implementations.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one page of a search
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, TransportError>;

    /// Popular criteria combinations offered as quick searches
    async fn trending(&self) -> Result<Vec<FilterCriteria>, TransportError>;

    /// Content for the view shown before any search
    async fn home_feed(&self) -> Result<HomeFeed, TransportError>;

    /// Get the name of the backend, for logging
    fn backend_name(&self) -> &'static str;
}
