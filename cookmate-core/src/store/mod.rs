//! In-memory stores backed by a [`KeyValueStore`](crate::storage::KeyValueStore).

mod cook_log;
mod recipes;

pub use cook_log::CookLogStore;
pub use recipes::RecipeStore;
