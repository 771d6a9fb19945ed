use crate::models::wire::{self, list_from_value};
use crate::models::{Bathrooms, Bedrooms, FilterCriteria, PageMeta, Property};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameters for `GET /search`.
///
/// Price bounds are omitted when unset; the server reads absence, not zero,
/// as "no bound".
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchParams {
    #[serde(rename = "zona")]
    pub zone: String,
    #[serde(rename = "dormitorios")]
    pub bedrooms: Bedrooms,
    #[serde(rename = "banos")]
    pub bathrooms: Bathrooms,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_max: Option<u64>,
    #[serde(rename = "palabras_clave")]
    pub keywords: String,
    pub page: u32,
    pub page_size: u32,
}

impl SearchParams {
    pub fn new(criteria: &FilterCriteria, page: u32, page_size: u32) -> Self {
        Self {
            zone: criteria.zone.clone(),
            bedrooms: criteria.bedrooms,
            bathrooms: criteria.bathrooms,
            price_min: criteria.price_min,
            price_max: criteria.price_max,
            keywords: criteria.keywords.clone(),
            page,
            page_size,
        }
    }
}

/// Body of a `GET /search` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "wire::lenient_list")]
    pub properties: Vec<Property>,
    #[serde(default, deserialize_with = "wire::lenient_option")]
    pub meta: Option<PageMeta>,
    #[serde(default, deserialize_with = "wire::lenient_option")]
    pub message: Option<String>,
}

/// Body of a `GET /trending` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendingResponse {
    #[serde(default, deserialize_with = "wire::lenient_list")]
    pub items: Vec<FilterCriteria>,
}

/// A titled group of listings in the home feed
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "wire::lenient_list")]
    pub properties: Vec<Property>,
}

/// Raw home feed body; either field may be missing or of the wrong shape
#[derive(Debug, Default, Deserialize)]
pub struct HomeFeedPayload {
    #[serde(default)]
    featured: Value,
    #[serde(default)]
    sections: Value,
}

/// The `GET /home-feed` payload, resolved once at the boundary
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "HomeFeedPayload")]
pub enum HomeFeed {
    Featured(Vec<Property>),
    Sectioned(Vec<Section>),
    Empty,
}

impl From<HomeFeedPayload> for HomeFeed {
    fn from(payload: HomeFeedPayload) -> Self {
        let featured: Vec<Property> = list_from_value(payload.featured);
        if !featured.is_empty() {
            return HomeFeed::Featured(featured);
        }
        if payload.sections.is_array() {
            return HomeFeed::Sectioned(list_from_value(payload.sections));
        }
        HomeFeed::Empty
    }
}

impl HomeFeed {
    /// Maximum number of listings shown on the home view
    pub const LIMIT: usize = 9;

    /// Listings to highlight, in server order, capped and tagged as featured
    pub fn into_highlights(self) -> Vec<Property> {
        let items: Vec<Property> = match self {
            HomeFeed::Featured(items) => items,
            HomeFeed::Sectioned(sections) => sections
                .into_iter()
                .flat_map(|section| section.properties)
                .take(Self::LIMIT)
                .collect(),
            HomeFeed::Empty => Vec::new(),
        };

        items
            .into_iter()
            .take(Self::LIMIT)
            .map(|mut property| {
                property.is_featured = true;
                property
            })
            .collect()
    }
}
