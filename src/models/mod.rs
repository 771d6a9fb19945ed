pub mod criteria;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use criteria::{parse_price, Bathrooms, Bedrooms, FilterCriteria, RecentSearchEntry};

/// Page size the server applies when none is requested
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Core property data model, as listed by the search backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    #[serde(default, deserialize_with = "wire::string_or_number")]
    pub id: String,
    #[serde(rename = "titulo", default, deserialize_with = "wire::string_or_number")]
    pub title: String,
    /// Currency-prefixed price as sent by the portal, e.g. "S/ 1,500"
    #[serde(rename = "precio", default, deserialize_with = "wire::string_or_number")]
    pub price: String,
    #[serde(rename = "dormitorios", default, deserialize_with = "wire::string_or_number")]
    pub bedrooms: String,
    #[serde(rename = "baños", alias = "banos", default, deserialize_with = "wire::string_or_number")]
    pub bathrooms: String,
    #[serde(rename = "m2", default, deserialize_with = "wire::string_or_number")]
    pub area_m2: String,
    #[serde(rename = "descripcion", default, deserialize_with = "wire::lenient_option")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "wire::string_or_number")]
    pub link: String,
    #[serde(rename = "imagen_url", default, deserialize_with = "wire::lenient_option")]
    pub image_url: Option<String>,
    #[serde(rename = "fuente", default, deserialize_with = "wire::string_or_number")]
    pub source: String,
    #[serde(default, deserialize_with = "wire::lenient_timestamp")]
    pub scraped_at: Option<DateTime<Utc>>,
    /// Set by the client for home feed items, never persisted server side
    #[serde(default, deserialize_with = "wire::lenient_flag")]
    pub is_featured: bool,
}

impl Property {
    /// Absolute URL of the listing
    pub fn link_url(&self) -> String {
        crate::url::normalize_url(&self.link)
    }

    /// Absolute URL of the cover image, if the listing has one
    pub fn image(&self) -> Option<String> {
        self.image_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(crate::url::normalize_url)
    }

    pub fn display_price(&self) -> String {
        crate::url::format_price(&self.price)
    }
}

/// Pagination descriptor returned with every search response.
///
/// `has_prev` and `has_next` are authoritative: the client forwards them to
/// gate navigation and never recomputes them from `page`/`total_pages`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
    #[serde(default)]
    pub has_prev: bool,
    #[serde(default)]
    pub has_next: bool,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_total_pages() -> u32 {
    1
}
