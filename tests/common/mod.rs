//! Scripted search backend shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use rental_scout::backend::{HomeFeed, SearchParams, SearchResponse};
use rental_scout::{FilterCriteria, PageMeta, Property, SearchBackend, TransportError};
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::oneshot;

/// Canned answer for one search page
#[derive(Clone)]
pub enum Reply {
    Ok(SearchResponse),
    Unreachable { detail: Option<String> },
}

#[derive(Default)]
pub struct ScriptedBackend {
    pages: Mutex<HashMap<u32, Reply>>,
    page_gates: Mutex<HashMap<u32, oneshot::Receiver<()>>>,
    trending: Mutex<Option<Vec<FilterCriteria>>>,
    home_feed: Mutex<Option<HomeFeed>>,
    trending_gate: Mutex<Option<oneshot::Receiver<()>>>,
    home_gate: Mutex<Option<oneshot::Receiver<()>>>,
    requests: Mutex<Vec<SearchParams>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_page(self, page: u32, reply: Reply) -> Self {
        self.pages.lock().insert(page, reply);
        self
    }

    pub fn with_trending(self, items: Vec<FilterCriteria>) -> Self {
        *self.trending.lock() = Some(items);
        self
    }

    pub fn with_home_feed(self, feed: HomeFeed) -> Self {
        *self.home_feed.lock() = Some(feed);
        self
    }

    /// Hold the response for `page` until the returned sender fires
    pub fn gate_page(&self, page: u32) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.page_gates.lock().insert(page, rx);
        tx
    }

    /// Hold both feed responses until the returned senders fire
    pub fn gate_feeds(&self) -> (oneshot::Sender<()>, oneshot::Sender<()>) {
        let (trending_tx, trending_rx) = oneshot::channel();
        let (home_tx, home_rx) = oneshot::channel();
        *self.trending_gate.lock() = Some(trending_rx);
        *self.home_gate.lock() = Some(home_rx);
        (trending_tx, home_tx)
    }

    pub fn requests(&self) -> Vec<SearchParams> {
        self.requests.lock().clone()
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.requests.lock().iter().map(|p| p.page).collect()
    }
}

async fn wait_for(gate: Option<oneshot::Receiver<()>>) {
    if let Some(rx) = gate {
        let _ = rx.await;
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, TransportError> {
        self.requests.lock().push(params.clone());
        let gate = self.page_gates.lock().remove(&params.page);
        wait_for(gate).await;

        let reply = self.pages.lock().get(&params.page).cloned();
        match reply {
            Some(Reply::Ok(response)) => Ok(response),
            Some(Reply::Unreachable { detail }) => Err(TransportError::Status {
                status: 503,
                detail,
            }),
            None => Err(TransportError::Status {
                status: 404,
                detail: None,
            }),
        }
    }

    async fn trending(&self) -> Result<Vec<FilterCriteria>, TransportError> {
        let gate = self.trending_gate.lock().take();
        wait_for(gate).await;

        let items = self.trending.lock().clone();
        items.ok_or(TransportError::Status {
            status: 500,
            detail: None,
        })
    }

    async fn home_feed(&self) -> Result<HomeFeed, TransportError> {
        let gate = self.home_gate.lock().take();
        wait_for(gate).await;

        let feed = self.home_feed.lock().clone();
        feed.ok_or(TransportError::Status {
            status: 500,
            detail: None,
        })
    }

    fn backend_name(&self) -> &'static str {
        "scripted"
    }
}

pub fn listing(id: u32) -> Property {
    serde_json::from_value(json!({
        "id": id,
        "titulo": format!("Departamento {}", id),
        "precio": "S/1500",
        "dormitorios": 2,
        "baños": 1,
        "m2": 70,
        "link": format!("portal.pe/aviso/{}", id),
        "fuente": "urbania",
        "scraped_at": "2024-05-01T10:00:00Z"
    }))
    .expect("valid listing")
}

pub fn meta(page: u32, total_pages: u32, total: u64) -> PageMeta {
    PageMeta {
        page,
        page_size: 20,
        total,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
    }
}

pub fn page_of(ids: &[u32], meta: PageMeta) -> Reply {
    Reply::Ok(SearchResponse {
        success: true,
        properties: ids.iter().copied().map(listing).collect(),
        meta: Some(meta),
        message: None,
    })
}

pub fn rejected(message: Option<&str>) -> Reply {
    Reply::Ok(SearchResponse {
        success: false,
        properties: Vec::new(),
        meta: None,
        message: message.map(str::to_string),
    })
}

pub fn sectioned_feed(sections: &[(&str, std::ops::RangeInclusive<u32>)]) -> HomeFeed {
    let sections: Vec<_> = sections
        .iter()
        .map(|(title, ids)| {
            json!({
                "title": title,
                "properties": ids.clone().map(listing).collect::<Vec<_>>(),
            })
        })
        .collect();
    serde_json::from_value(json!({ "sections": sections })).expect("valid feed")
}

pub fn zone(name: &str) -> FilterCriteria {
    FilterCriteria {
        zone: name.to_string(),
        ..Default::default()
    }
}
