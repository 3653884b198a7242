//! The cookbook: recipes plus their cook log, kept in step.
//!
//! Every mutating call updates memory first and then writes the affected
//! records in full. When a write fails the call returns the storage error, but
//! the in-memory change stays in place.

use chrono::Utc;

use crate::error::CookbookError;
use crate::models::{CookLogEntry, Recipe, RecipeDraft};
use crate::seed::SeedSource;
use crate::storage::KeyValueStore;
use crate::store::{CookLogStore, RecipeStore};

/// Owns the storage medium and both stores.
pub struct Cookbook<S> {
    storage: S,
    recipes: RecipeStore,
    cook_log: CookLogStore,
}

impl<S: KeyValueStore> Cookbook<S> {
    /// Loads both stores, seeding recipes on first run, and gives every
    /// recipe a cook log entry.
    pub async fn load(mut storage: S, seed: &SeedSource) -> Result<Self, CookbookError> {
        let mut cook_log = CookLogStore::load(&storage)?;
        let recipes = RecipeStore::load(&mut storage, seed).await?;

        let added = cook_log.sync(recipes.ids());
        if added > 0 {
            tracing::debug!("Added {} cook log entr(ies)", added);
            if let Err(e) = cook_log.save(&mut storage) {
                tracing::warn!("Cook log was not saved: {}", e);
            }
        }

        Ok(Self {
            storage,
            recipes,
            cook_log,
        })
    }

    /// All recipes, newest first.
    pub fn list(&self) -> Vec<&Recipe> {
        self.recipes.list()
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    /// Resolves a recipe by id or case-insensitive name.
    pub fn find(&self, query: &str) -> Option<&Recipe> {
        self.recipes.find(query)
    }

    /// The cook log entry for `id`; empty if there is none.
    pub fn cook_log(&self, id: &str) -> CookLogEntry {
        self.cook_log.entry(id)
    }

    /// Adds a new recipe.
    ///
    /// Rejects drafts whose name or estimated time is blank without touching
    /// the collection.
    pub fn create(&mut self, draft: RecipeDraft) -> Result<Recipe, CookbookError> {
        let draft = draft.cleaned();
        draft.validate()?;

        let recipe = Recipe::from_draft(draft);
        self.recipes.insert(recipe.clone());
        self.cook_log.ensure(&recipe.id);
        tracing::info!("Created recipe {} ({})", recipe.name, recipe.id);

        self.recipes.save(&mut self.storage)?;
        self.cook_log.save(&mut self.storage)?;
        Ok(recipe)
    }

    /// Replaces the editable fields of recipe `id`.
    ///
    /// Returns `Ok(None)` and changes nothing when `id` is unknown.
    pub fn update(
        &mut self,
        id: &str,
        draft: RecipeDraft,
    ) -> Result<Option<Recipe>, CookbookError> {
        let draft = draft.cleaned();
        draft.validate()?;

        let Some(recipe) = self.recipes.update(id, draft).cloned() else {
            return Ok(None);
        };
        tracing::info!("Updated recipe {} ({})", recipe.name, recipe.id);

        self.recipes.save(&mut self.storage)?;
        Ok(Some(recipe))
    }

    /// Removes recipe `id` and its cook log entry.
    ///
    /// Returns `Ok(None)` and changes nothing when `id` is unknown.
    pub fn delete(&mut self, id: &str) -> Result<Option<Recipe>, CookbookError> {
        let Some(recipe) = self.recipes.remove(id) else {
            return Ok(None);
        };
        self.cook_log.prune(id);
        tracing::info!("Deleted recipe {} ({})", recipe.name, recipe.id);

        self.recipes.save(&mut self.storage)?;
        self.cook_log.save(&mut self.storage)?;
        Ok(Some(recipe))
    }

    /// Stamps recipe `id` as cooked now.
    ///
    /// Returns `Ok(None)` and changes nothing when `id` is unknown.
    pub fn mark_cooked(&mut self, id: &str) -> Result<Option<CookLogEntry>, CookbookError> {
        if !self.recipes.contains(id) {
            return Ok(None);
        }

        let entry = self.cook_log.mark(id, Utc::now());
        self.cook_log.save(&mut self.storage)?;
        Ok(Some(entry))
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
