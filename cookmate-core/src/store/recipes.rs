//! The recipe collection and its persistence.

use std::cmp::Reverse;

use crate::error::CookbookError;
use crate::models::{Recipe, RecipeDraft};
use crate::seed::{import_seed, SeedSource};
use crate::storage::{KeyValueStore, StorageKey};

/// Owns the recipe collection in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeStore {
    recipes: Vec<Recipe>,
}

impl RecipeStore {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// Loads the persisted collection, seeding it on first run.
    ///
    /// A blank record counts as no record. A seed that cannot be fetched
    /// leaves the collection empty and is retried on the next load. A seed
    /// that cannot be written is kept in memory.
    pub async fn load<S: KeyValueStore>(
        storage: &mut S,
        seed: &SeedSource,
    ) -> Result<Self, CookbookError> {
        let stored = storage
            .get(StorageKey::Recipes)?
            .filter(|json| !json.trim().is_empty());
        if let Some(json) = stored {
            return Self::from_json(&json);
        }

        let items = match seed.fetch().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Could not seed recipes from {}: {}", seed, e);
                return Ok(Self::default());
            }
        };

        let store = Self::new(import_seed(items));
        tracing::info!("Seeded {} recipe(s) from {}", store.len(), seed);
        if let Err(e) = store.save(storage) {
            tracing::warn!("Seeded recipes were not saved: {}", e);
        }
        Ok(store)
    }

    pub fn from_json(json: &str) -> Result<Self, CookbookError> {
        let recipes = serde_json::from_str(json).map_err(|source| CookbookError::Corrupt {
            key: StorageKey::Recipes,
            source,
        })?;
        Ok(Self { recipes })
    }

    pub fn to_json(&self) -> Result<String, CookbookError> {
        serde_json::to_string(&self.recipes).map_err(|source| CookbookError::Encode {
            key: StorageKey::Recipes,
            source,
        })
    }

    /// Writes the whole collection.
    pub fn save<S: KeyValueStore>(&self, storage: &mut S) -> Result<(), CookbookError> {
        storage.set(StorageKey::Recipes, &self.to_json()?)?;
        Ok(())
    }

    /// All recipes, newest `date_added` first.
    ///
    /// Recipes with equal, missing or unreadable dates keep their stored order,
    /// after every dated recipe.
    pub fn list(&self) -> Vec<&Recipe> {
        let mut recipes: Vec<&Recipe> = self.recipes.iter().collect();
        recipes.sort_by_key(|r| Reverse(r.added_at()));
        recipes
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Looks up by exact id, then by case-insensitive name.
    pub fn find(&self, query: &str) -> Option<&Recipe> {
        self.get(query).or_else(|| {
            let query = query.trim().to_lowercase();
            self.recipes.iter().find(|r| r.name.to_lowercase() == query)
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.recipes.iter().map(|r| r.id.as_str())
    }

    pub fn insert(&mut self, recipe: Recipe) {
        self.recipes.push(recipe);
    }

    /// Applies a draft to the recipe with `id`. Returns `None` if there is none.
    pub fn update(&mut self, id: &str, draft: RecipeDraft) -> Option<&Recipe> {
        let recipe = self.recipes.iter_mut().find(|r| r.id == id)?;
        recipe.apply(draft);
        Some(recipe)
    }

    pub fn remove(&mut self, id: &str) -> Option<Recipe> {
        let index = self.recipes.iter().position(|r| r.id == id)?;
        Some(self.recipes.remove(index))
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngredientGroup;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use tempfile::TempDir;

    fn dated(name: &str, date_added: &str) -> Recipe {
        let mut recipe = Recipe::from_draft(RecipeDraft::new(name, "10 min"));
        recipe.date_added = date_added.to_string();
        recipe
    }

    #[test]
    fn test_list_newest_first() {
        let store = RecipeStore::new(vec![
            dated("January", "2024-01-01"),
            dated("March", "2024-03-01"),
            dated("February", "2024-02-01"),
        ]);

        let names: Vec<&str> = store.list().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["March", "February", "January"]);
    }

    #[test]
    fn test_list_ties_keep_order() {
        let store = RecipeStore::new(vec![
            dated("Undated A", ""),
            dated("Same 1", "2024-05-01T10:00:00Z"),
            dated("Undated B", "not a date"),
            dated("Same 2", "2024-05-01T10:00:00Z"),
        ]);

        let names: Vec<&str> = store.list().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Same 1", "Same 2", "Undated A", "Undated B"]);
    }

    #[test]
    fn test_list_does_not_reorder_storage() {
        let store = RecipeStore::new(vec![dated("Old", "2020-01-01"), dated("New", "2024-01-01")]);
        store.list();
        assert_eq!(store.ids().count(), 2);
        assert_eq!(store.recipes[0].name, "Old");
    }

    #[test]
    fn test_find_by_id_or_name() {
        let recipe = dated("Banana Bread", "2024-01-01");
        let id = recipe.id.clone();
        let store = RecipeStore::new(vec![recipe]);

        assert_eq!(store.find(&id).unwrap().name, "Banana Bread");
        assert_eq!(store.find("banana bread").unwrap().id, id);
        assert!(store.find("banana").is_none());
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut store = RecipeStore::new(vec![dated("Soup", "2024-01-01")]);
        let before = store.clone();

        assert!(store.update("missing", RecipeDraft::new("X", "Y")).is_none());
        assert_eq!(store, before);
    }

    #[test]
    fn test_remove() {
        let recipe = dated("Soup", "2024-01-01");
        let id = recipe.id.clone();
        let mut store = RecipeStore::new(vec![recipe]);

        assert!(store.remove("missing").is_none());
        assert_eq!(store.remove(&id).unwrap().name, "Soup");
        assert!(store.is_empty());
    }

    #[test]
    fn test_persist_and_reload_roundtrip() {
        let mut storage = MemoryStore::new();
        let mut grouped = dated("Pizza", "2024-02-01T12:00:00.000Z");
        grouped.ingredients = vec![
            IngredientGroup::new("Dough", vec!["flour".into()]),
            IngredientGroup::new("Topping", vec!["cheese".into()]),
        ];
        let store = RecipeStore::new(vec![dated("Soup", "2024-01-01"), grouped]);

        store.save(&mut storage).unwrap();
        let json = storage.get(StorageKey::Recipes).unwrap().unwrap();

        assert_eq!(RecipeStore::from_json(&json).unwrap(), store);
    }

    #[test]
    fn test_updated_without_ingredients_reloads_equal() {
        let mut storage = MemoryStore::new();
        let recipe = dated("Soup", "2024-01-01");
        let id = recipe.id.clone();
        let mut store = RecipeStore::new(vec![recipe]);
        store.update(&id, RecipeDraft::new("Broth", "1 h"));

        store.save(&mut storage).unwrap();
        let json = storage.get(StorageKey::Recipes).unwrap().unwrap();

        let reloaded = RecipeStore::from_json(&json).unwrap();
        assert_eq!(reloaded, store);
        assert_eq!(
            reloaded.get(&id).unwrap().ingredients,
            vec![IngredientGroup::default()]
        );
    }

    #[test]
    fn test_from_json_normalizes_legacy_ingredients() {
        let json = json!([{
            "id": "legacy",
            "name": "Salad",
            "estimatedTime": "5 min",
            "ingredients": ["lettuce", "tomato"],
            "instructions": ["Toss"],
            "dateAdded": "2023-06-01T00:00:00.000Z",
            "lastCooked": null,
            "lastMarkedAsCooked": null
        }])
        .to_string();

        let store = RecipeStore::from_json(&json).unwrap();
        assert_eq!(
            store.get("legacy").unwrap().ingredients,
            vec![IngredientGroup::ungrouped(vec!["lettuce".into(), "tomato".into()])]
        );
    }

    #[test]
    fn test_from_json_corrupt() {
        let err = RecipeStore::from_json("[{").unwrap_err();
        assert!(matches!(
            err,
            CookbookError::Corrupt {
                key: StorageKey::Recipes,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_load_seeds_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let seed_path = temp_dir.path().join("seed.json");
        std::fs::write(
            &seed_path,
            json!([
                {"name": "Toast", "estimatedTime": "5 min", "ingredients": ["bread"], "instructions": []},
                {"id": "kept", "name": "Tea", "estimatedTime": "3 min",
                 "ingredients": [{"groupName": "", "items": ["tea bag"]}], "instructions": ["Steep"],
                 "dateAdded": "2024-01-01"}
            ])
            .to_string(),
        )
        .unwrap();
        let mut storage = MemoryStore::new();

        let store = RecipeStore::load(&mut storage, &SeedSource::File(seed_path))
            .await
            .unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.contains("kept"));
        let persisted = storage.get(StorageKey::Recipes).unwrap().unwrap();
        assert_eq!(RecipeStore::from_json(&persisted).unwrap(), store);
    }

    #[tokio::test]
    async fn test_load_skips_seed_when_persisted() {
        let mut storage = MemoryStore::new();
        storage.set(StorageKey::Recipes, "[]").unwrap();

        let store = RecipeStore::load(&mut storage, &SeedSource::Bundled)
            .await
            .unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_load_blank_record_seeds() {
        let temp_dir = TempDir::new().unwrap();
        let seed_path = temp_dir.path().join("seed.json");
        std::fs::write(&seed_path, r#"[{"id": "toast", "name": "Toast"}]"#).unwrap();
        let mut storage = MemoryStore::new();
        storage.set(StorageKey::Recipes, "  ").unwrap();

        let store = RecipeStore::load(&mut storage, &SeedSource::File(seed_path))
            .await
            .unwrap();

        assert!(store.contains("toast"));
        let persisted = storage.get(StorageKey::Recipes).unwrap().unwrap();
        assert_eq!(RecipeStore::from_json(&persisted).unwrap(), store);
    }

    #[tokio::test]
    async fn test_load_with_unavailable_seed() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = MemoryStore::new();
        let seed = SeedSource::File(temp_dir.path().join("missing.json"));

        let store = RecipeStore::load(&mut storage, &seed).await.unwrap();

        assert!(store.is_empty());
        assert!(storage.get(StorageKey::Recipes).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_keeps_seed_when_save_fails() {
        let mut storage = MemoryStore::with_quota(8);

        let store = RecipeStore::load(&mut storage, &SeedSource::Bundled)
            .await
            .unwrap();

        assert!(!store.is_empty());
        assert!(storage.get(StorageKey::Recipes).unwrap().is_none());
    }
}
