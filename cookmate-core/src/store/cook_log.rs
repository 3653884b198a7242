//! Side-table of cook timestamps keyed by recipe id.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::CookbookError;
use crate::models::CookLogEntry;
use crate::storage::{KeyValueStore, StorageError, StorageKey};

/// Maps recipe ids to their [`CookLogEntry`].
///
/// Entries are only ever created for ids the caller vouches for; the store
/// itself does not know which recipes exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CookLogStore {
    entries: BTreeMap<String, CookLogEntry>,
}

impl CookLogStore {
    /// Loads the persisted table.
    ///
    /// A record that is not a JSON object is discarded with a warning. A single
    /// unreadable entry is reset on its own; the others are kept.
    pub fn load<S: KeyValueStore>(storage: &S) -> Result<Self, StorageError> {
        let Some(json) = storage.get(StorageKey::CookLog)? else {
            return Ok(Self::default());
        };

        let raw: BTreeMap<String, Value> = match serde_json::from_str(&json) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Ignoring malformed cook log: {}", e);
                return Ok(Self::default());
            }
        };

        let entries = raw
            .into_iter()
            .map(|(id, value)| {
                let entry = serde_json::from_value(value).unwrap_or_else(|e| {
                    tracing::warn!("Resetting malformed cook log entry {}: {}", id, e);
                    CookLogEntry::default()
                });
                (id, entry)
            })
            .collect();
        Ok(Self { entries })
    }

    /// Writes the whole table.
    pub fn save<S: KeyValueStore>(&self, storage: &mut S) -> Result<(), CookbookError> {
        let json = serde_json::to_string(&self.entries).map_err(|source| CookbookError::Encode {
            key: StorageKey::CookLog,
            source,
        })?;
        storage.set(StorageKey::CookLog, &json)?;
        Ok(())
    }

    /// Adds an empty entry for every id that lacks one. Returns how many were added.
    pub fn sync<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) -> usize {
        ids.into_iter().filter(|id| self.ensure(id)).count()
    }

    /// Creates an empty entry for `id` if missing. Returns true if one was added.
    pub fn ensure(&mut self, id: &str) -> bool {
        if self.entries.contains_key(id) {
            return false;
        }
        self.entries.insert(id.to_string(), CookLogEntry::default());
        true
    }

    /// Records a cook of `id` at `at`, creating the entry if needed.
    pub fn mark(&mut self, id: &str, at: DateTime<Utc>) -> CookLogEntry {
        let entry = self.entries.entry(id.to_string()).or_default();
        entry.mark(at);
        *entry
    }

    pub fn prune(&mut self, id: &str) -> Option<CookLogEntry> {
        self.entries.remove(id)
    }

    /// The entry for `id`, or an empty one.
    pub fn entry(&self, id: &str) -> CookLogEntry {
        self.entries.get(id).copied().unwrap_or_default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;
    use crate::storage::MemoryStore;

    #[test]
    fn test_load_empty_storage() {
        let storage = MemoryStore::new();
        assert!(CookLogStore::load(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_load_malformed_falls_back() {
        let mut storage = MemoryStore::new();
        storage.set(StorageKey::CookLog, "not json").unwrap();
        assert!(CookLogStore::load(&storage).unwrap().is_empty());

        storage.set(StorageKey::CookLog, "[1, 2]").unwrap();
        assert!(CookLogStore::load(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_load_bad_entry_keeps_the_rest() {
        let mut storage = MemoryStore::new();
        storage
            .set(
                StorageKey::CookLog,
                r#"{
                    "a": {"lastCooked": "2024-05-01T18:00:00.000Z", "lastMarkedAsCooked": "2024-05-01T18:00:00.000Z"},
                    "b": {"lastCooked": "2024-06-02", "lastMarkedAsCooked": "2024-06-02"},
                    "c": {"lastCooked": "bad"},
                    "d": "not an entry"
                }"#,
            )
            .unwrap();

        let log = CookLogStore::load(&storage).unwrap();

        assert_eq!(log.len(), 4);
        let a = parse_timestamp("2024-05-01T18:00:00Z");
        assert_eq!(log.entry("a").last_cooked, a);
        assert_eq!(log.entry("a").last_marked_as_cooked, a);
        assert_eq!(log.entry("b").last_cooked, parse_timestamp("2024-06-02"));
        assert_eq!(log.entry("c"), CookLogEntry::default());
        assert!(log.contains("d"));
        assert_eq!(log.entry("d"), CookLogEntry::default());
    }

    #[test]
    fn test_sync_adds_missing_only() {
        let mut log = CookLogStore::default();
        let now = Utc::now();
        log.mark("a", now);

        let added = log.sync(["a", "b", "c"]);

        assert_eq!(added, 2);
        assert_eq!(log.entry("a").last_cooked, Some(now));
        assert_eq!(log.entry("b"), CookLogEntry::default());
        assert!(log.contains("c"));
    }

    #[test]
    fn test_mark_sets_both_and_isolates() {
        let mut log = CookLogStore::default();
        log.sync(["a", "b"]);

        let now = Utc::now();
        let entry = log.mark("a", now);

        assert_eq!(entry.last_cooked, Some(now));
        assert_eq!(entry.last_marked_as_cooked, Some(now));
        assert_eq!(log.entry("b"), CookLogEntry::default());
    }

    #[test]
    fn test_entry_defaults_when_absent() {
        let log = CookLogStore::default();
        assert_eq!(log.entry("nope"), CookLogEntry::default());
        assert!(!log.contains("nope"));
    }

    #[test]
    fn test_prune() {
        let mut log = CookLogStore::default();
        log.ensure("a");
        assert!(log.prune("a").is_some());
        assert!(log.prune("a").is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let mut storage = MemoryStore::new();
        let mut log = CookLogStore::default();
        log.ensure("a");
        log.mark("b", Utc::now());

        log.save(&mut storage).unwrap();

        assert_eq!(CookLogStore::load(&storage).unwrap(), log);
    }
}
