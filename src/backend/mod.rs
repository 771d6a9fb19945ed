pub mod http;
pub mod traits;
pub mod types;

pub use http::HttpBackend;
pub use traits::SearchBackend;
pub use types::{HomeFeed, SearchParams, SearchResponse, Section};
