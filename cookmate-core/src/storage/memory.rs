//! In-process store, mostly for tests and throwaway cookbooks.

use std::collections::HashMap;

use super::{KeyValueStore, StorageError, StorageKey};

/// Keeps records in a map. An optional quota caps the total stored bytes,
/// like a browser's local storage does.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: HashMap<StorageKey, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes pushing the total past `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            records: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Total bytes currently stored.
    pub fn used(&self) -> usize {
        self.records.values().map(String::len).sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.records.get(&key).cloned())
    }

    fn set(&mut self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let current = self.records.get(&key).map_or(0, String::len);
            let size = self.used() - current + value.len();
            if size > quota {
                return Err(StorageError::QuotaExceeded { key, size, quota });
            }
        }
        self.records.insert(key, value.to_string());
        Ok(())
    }
}
