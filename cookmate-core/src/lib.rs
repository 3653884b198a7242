//! Cookmate Core Library
//!
//! Recipe models, ingredient normalization, seeding and local persistence
//! shared by Cookmate front ends.

pub mod cookbook;
pub mod error;
pub mod models;
pub mod seed;
pub mod storage;
pub mod store;

pub use cookbook::Cookbook;
pub use error::CookbookError;
pub use models::{
    normalize_ingredients, parse_timestamp, CookLogEntry, IngredientGroup, Recipe, RecipeDraft,
    RecipeError,
};
pub use seed::{SeedError, SeedRecipe, SeedSource};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageKey};
pub use store::{CookLogStore, RecipeStore};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
