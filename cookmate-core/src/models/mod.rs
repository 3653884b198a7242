mod cook_log;
mod ingredient;
mod recipe;

pub use cook_log::CookLogEntry;
pub use ingredient::{normalize_ingredients, IngredientGroup};
pub use recipe::{generate_id, parse_timestamp, Recipe, RecipeDraft, RecipeError};
