//! Seed sources used to populate an empty cookbook on first run.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{generate_id, normalize_ingredients, Recipe};

/// Recipes compiled into the library.
const BUNDLED_SEED: &str = include_str!("../seed/recipes.json");

/// Errors that can occur while fetching a seed document.
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to read seed file {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),

    #[error("Failed to fetch seed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Seed request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse seed document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the first-run recipes come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SeedSource {
    #[default]
    Bundled,
    File(PathBuf),
    Url(String),
}

impl SeedSource {
    /// Interprets a user-supplied location: `bundled`, an http(s) URL, or a path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.is_empty() || location.eq_ignore_ascii_case("bundled") {
            SeedSource::Bundled
        } else if location.starts_with("http://") || location.starts_with("https://") {
            SeedSource::Url(location.to_string())
        } else {
            SeedSource::File(PathBuf::from(location))
        }
    }

    /// Fetches and parses the seed document.
    pub async fn fetch(&self) -> Result<Vec<SeedRecipe>, SeedError> {
        let body = match self {
            SeedSource::Bundled => BUNDLED_SEED.to_string(),
            SeedSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| SeedError::Io(path.clone(), e))?,
            SeedSource::Url(url) => {
                let response = reqwest::get(url).await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(SeedError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                response.text().await?
            }
        };

        Ok(serde_json::from_str(&body)?)
    }
}

impl fmt::Display for SeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedSource::Bundled => write!(f, "bundled recipes"),
            SeedSource::File(path) => write!(f, "{}", path.display()),
            SeedSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// A recipe as it appears in a seed document.
///
/// Only `name` is mandatory; everything else is filled in on import.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRecipe {
    #[serde(default)]
    pub id: Option<Value>,
    pub name: String,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default)]
    pub ingredients: Option<Value>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub date_added: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SeedRecipe {
    /// Converts into a stored recipe, filling a missing id or date.
    pub fn into_recipe(self, now: DateTime<Utc>) -> Recipe {
        let id = match self.id {
            Some(Value::String(id)) if !id.is_empty() => id,
            Some(Value::Number(n)) => n.to_string(),
            _ => generate_id(),
        };
        let date_added = self
            .date_added
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| now.to_rfc3339());
        let mut extra = self.extra;
        // Seeded recipes start uncooked.
        extra.remove("lastCooked");
        extra.remove("lastMarkedAsCooked");

        Recipe {
            id,
            name: self.name,
            estimated_time: self.estimated_time,
            ingredients: normalize_ingredients(self.ingredients.as_ref()),
            instructions: self.instructions,
            date_added,
            last_cooked: None,
            last_marked_as_cooked: None,
            extra,
        }
    }
}

/// Converts a whole seed document, keeping ids unique.
pub fn import_seed(items: Vec<SeedRecipe>) -> Vec<Recipe> {
    let now = Utc::now();
    let mut seen = HashSet::new();

    items
        .into_iter()
        .map(|item| {
            let mut recipe = item.into_recipe(now);
            if !seen.insert(recipe.id.clone()) {
                tracing::warn!(
                    "Duplicate seed id {} for '{}', assigning a new one",
                    recipe.id,
                    recipe.name
                );
                recipe.id = generate_id();
                seen.insert(recipe.id.clone());
            }
            recipe
        })
        .collect()
}
