//! Cookbook error types.

use thiserror::Error;

use crate::models::RecipeError;
use crate::storage::{StorageError, StorageKey};

/// Errors returned by cookbook and store operations.
#[derive(Error, Debug)]
pub enum CookbookError {
    #[error(transparent)]
    Invalid(#[from] RecipeError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Stored {key} record is not valid JSON: {source}")]
    Corrupt {
        key: StorageKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode {key} record: {source}")]
    Encode {
        key: StorageKey,
        #[source]
        source: serde_json::Error,
    },
}

impl CookbookError {
    /// True when the in-memory change succeeded but could not be written.
    pub fn is_unsaved(&self) -> bool {
        matches!(self, CookbookError::Storage(_))
    }
}
