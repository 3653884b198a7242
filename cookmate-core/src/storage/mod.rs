//! Durable key-value medium for Cookmate records.
//!
//! Each record is a whole JSON document stored under a fixed [`StorageKey`].
//! Writes replace the previous value entirely.
//!
//! Storage layout for [`FileStore`]:
//! ```text
//! ~/.local/share/cookmate/
//! ├── cookmate_recipes.json       # array of recipes
//! └── cookmate_cooked_data.json   # recipe id -> cook log entry
//! ```

mod file;
mod key;
mod memory;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use file::FileStore;
pub use key::StorageKey;
pub use memory::MemoryStore;

/// Errors that can occur while reading or writing a record.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),

    #[error("Storage quota exceeded writing {key}: {size} bytes, quota is {quota} bytes")]
    QuotaExceeded {
        key: StorageKey,
        size: usize,
        quota: usize,
    },
}

/// A synchronous key-value medium holding serialized records.
pub trait KeyValueStore {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been written yet.
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Replaces the value stored under `key`.
    fn set(&mut self, key: StorageKey, value: &str) -> Result<(), StorageError>;
}
