use crate::models::{FilterCriteria, RecentSearchEntry};
use crate::storage::{MemoryStorage, Storage};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key of the persisted history
pub const RECENTS_KEY: &str = "scraper_recents_v1";
/// Number of distinct searches kept
pub const MAX_RECENTS: usize = 8;

/// Deduplicated, newest-first history of submitted searches.
///
/// The in-memory list is authoritative; every change is mirrored to storage
/// on a best-effort basis and storage errors never reach the caller.
pub struct RecentSearchStore {
    entries: Vec<RecentSearchEntry>,
    storage: Arc<dyn Storage>,
}

impl RecentSearchStore {
    /// Restore history from storage. Missing or unreadable data yields an
    /// empty history.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let entries = match storage.read(RECENTS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<RecentSearchEntry>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring corrupt search history: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read search history: {:#}", e);
                Vec::new()
            }
        };

        debug!("Loaded {} recent searches", entries.len());
        Self { entries, storage }
    }

    /// History that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::load(Arc::new(MemoryStorage::new()))
    }

    /// Entries, newest first
    pub fn entries(&self) -> &[RecentSearchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a submitted search as the newest entry
    pub fn record(&mut self, criteria: FilterCriteria) {
        self.record_entry(RecentSearchEntry::new(criteria));
    }

    /// Zero price bounds are dropped before storing. An entry left with no
    /// constraint at all is not recorded.
    pub fn record_entry(&mut self, mut entry: RecentSearchEntry) {
        entry.criteria = entry.criteria.normalized();
        if !entry.criteria.is_submittable() {
            debug!("Not recording a search without constraints");
            return;
        }
        self.entries.insert(0, entry);

        let mut seen = HashSet::new();
        self.entries.retain(|e| seen.insert(e.dedup_key()));
        self.entries.truncate(MAX_RECENTS);

        self.persist();
    }

    /// Forget every entry, in memory and in storage
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.storage.remove(RECENTS_KEY) {
            warn!("Could not erase search history: {:#}", e);
        }
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                warn!("Could not serialize search history: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.write(RECENTS_KEY, &json) {
            warn!("Could not persist search history: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bedrooms;
    use anyhow::{anyhow, Result};
    use chrono::{Duration, Utc};

    fn zone(name: &str) -> FilterCriteria {
        FilterCriteria {
            zone: name.to_string(),
            ..Default::default()
        }
    }

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }

        fn write(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("quota exceeded"))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(anyhow!("read-only"))
        }
    }

    #[test]
    fn repeated_record_keeps_single_newest_entry() {
        let mut store = RecentSearchStore::in_memory();
        let earlier = Utc::now() - Duration::seconds(30);
        store.record_entry(RecentSearchEntry {
            criteria: zone("Miraflores"),
            created_at: earlier,
        });
        store.record(zone("Miraflores"));

        assert_eq!(store.len(), 1);
        assert!(store.entries()[0].created_at > earlier);
    }

    #[test]
    fn repeat_moves_entry_to_front() {
        let mut store = RecentSearchStore::in_memory();
        store.record(zone("A"));
        store.record(zone("B"));
        store.record(zone("A"));

        let zones: Vec<&str> = store.entries().iter().map(|e| e.criteria.zone.as_str()).collect();
        assert_eq!(zones, vec!["A", "B"]);
    }

    #[test]
    fn history_is_capped_with_oldest_evicted() {
        let mut store = RecentSearchStore::in_memory();
        for i in 0..20 {
            store.record(zone(&format!("zone-{}", i)));
            assert!(store.len() <= MAX_RECENTS);
        }

        assert_eq!(store.len(), MAX_RECENTS);
        assert_eq!(store.entries()[0].criteria.zone, "zone-19");
        assert_eq!(store.entries()[MAX_RECENTS - 1].criteria.zone, "zone-12");
    }

    #[test]
    fn entries_differing_in_one_field_are_distinct() {
        let mut store = RecentSearchStore::in_memory();
        store.record(zone("A"));
        store.record(FilterCriteria {
            bedrooms: Bedrooms::One,
            ..zone("A")
        });
        store.record(zone("a"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn history_survives_reload() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut store = RecentSearchStore::load(storage.clone());
        store.record(zone("Barranco"));
        store.record(zone("Surco"));

        let reloaded = RecentSearchStore::load(storage.clone());
        assert_eq!(reloaded.len(), 2);
        for (loaded, original) in reloaded.entries().iter().zip(store.entries()) {
            assert_eq!(loaded.criteria, original.criteria);
            assert_eq!(
                loaded.created_at.timestamp_millis(),
                original.created_at.timestamp_millis()
            );
        }

        store.clear();
        assert!(store.is_empty());
        assert_eq!(storage.read(RECENTS_KEY).unwrap(), None);
        assert!(RecentSearchStore::load(storage).is_empty());
    }

    #[test]
    fn zero_price_bound_reloads_verbatim() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut store = RecentSearchStore::load(storage.clone());
        store.record(FilterCriteria {
            price_min: Some(0),
            price_max: Some(2500),
            ..zone("Lince")
        });
        store.record(FilterCriteria {
            price_min: Some(0),
            ..Default::default()
        });

        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].criteria.price_min, None);
        assert_eq!(store.entries()[0].dedup_key(), "Lince|0|0||2500|");

        let reloaded = RecentSearchStore::load(storage);
        assert_eq!(reloaded.entries()[0].criteria, store.entries()[0].criteria);
        assert!(reloaded.entries()[0].criteria.is_submittable());
    }

    #[test]
    fn corrupt_history_loads_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(RECENTS_KEY, "{not json").unwrap();
        assert!(RecentSearchStore::load(storage).is_empty());
    }

    #[test]
    fn storage_failures_are_swallowed() {
        let mut store = RecentSearchStore::load(Arc::new(BrokenStorage));
        assert!(store.is_empty());

        store.record(zone("Lince"));
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
    }
}
