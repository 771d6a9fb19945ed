pub mod backend;
pub mod config;
pub mod error;
pub mod feeds;
pub mod models;
pub mod pagination;
pub mod recent;
pub mod session;
pub mod storage;
pub mod url;
pub mod view_model;

pub use backend::{HttpBackend, SearchBackend};
pub use config::ClientConfig;
pub use error::{SearchFailure, TransportError};
pub use models::{Bathrooms, Bedrooms, FilterCriteria, PageMeta, Property, RecentSearchEntry};
pub use pagination::{FetchOutcome, PageState, PaginationController};
pub use recent::RecentSearchStore;
pub use session::{AuthProvider, LoginGrant, Role, Session};
pub use view_model::{SearchPhase, SearchViewModel, SubmitOutcome, ViewContent};
