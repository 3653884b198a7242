use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use super::ingredient::{default_groups, deserialize_grouped, IngredientGroup};

/// Errors raised when recipe input does not pass validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecipeError {
    #[error("Recipe {0} is required")]
    MissingField(&'static str),
}

/// A stored recipe.
///
/// Field names serialize in camelCase so documents stay compatible with the
/// browser version of Cookmate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default = "default_groups", deserialize_with = "deserialize_grouped")]
    pub ingredients: Vec<IngredientGroup>,
    #[serde(default)]
    pub instructions: Vec<String>,
    /// ISO 8601 timestamp, kept as written so older documents round-trip.
    #[serde(default)]
    pub date_added: String,
    // Written as null for older readers; the cook log holds the real values.
    #[serde(default)]
    pub last_cooked: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_marked_as_cooked: Option<DateTime<Utc>>,
    /// Fields this version does not know about, written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recipe {
    /// Builds a brand-new recipe from a draft, assigning identity and date.
    pub fn from_draft(draft: RecipeDraft) -> Self {
        Self {
            id: generate_id(),
            name: draft.name,
            estimated_time: draft.estimated_time,
            ingredients: or_default_groups(draft.ingredients),
            instructions: draft.instructions,
            date_added: Utc::now().to_rfc3339(),
            last_cooked: None,
            last_marked_as_cooked: None,
            extra: Map::new(),
        }
    }

    /// Replaces the editable fields, leaving `id` and `date_added` intact.
    pub fn apply(&mut self, draft: RecipeDraft) {
        self.name = draft.name;
        self.estimated_time = draft.estimated_time;
        self.ingredients = or_default_groups(draft.ingredients);
        self.instructions = draft.instructions;
    }

    /// Parsed `date_added`, accepting full RFC 3339 timestamps or bare dates.
    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date_added)
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredients.iter().map(|g| g.items.len()).sum()
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count()))?;
        writeln!(f, "Estimated time: {}", self.estimated_time)?;

        if self.ingredient_count() > 0 {
            writeln!(f, "\nIngredients:")?;
            for group in self.ingredients.iter().filter(|g| !g.is_empty()) {
                write!(f, "{}", group)?;
            }
        }

        if !self.instructions.is_empty() {
            writeln!(f, "\nInstructions:")?;
            for (i, step) in self.instructions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, step)?;
            }
        }

        Ok(())
    }
}

/// The user-editable part of a recipe, as submitted for create or update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: String,
    pub estimated_time: String,
    pub ingredients: Vec<IngredientGroup>,
    pub instructions: Vec<String>,
}

impl RecipeDraft {
    pub fn new(name: impl Into<String>, estimated_time: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            estimated_time: estimated_time.into(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
        }
    }

    pub fn with_ingredients(mut self, ingredients: Vec<IngredientGroup>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_instructions(mut self, instructions: Vec<String>) -> Self {
        self.instructions = instructions;
        self
    }

    /// Trims every field and drops blank lines and groups.
    ///
    /// At least one ingredient group always remains.
    pub fn cleaned(self) -> Self {
        let ingredients = self
            .ingredients
            .into_iter()
            .map(|group| IngredientGroup::new(group.group_name.trim(), trim_lines(group.items)))
            .filter(|group| !group.is_empty())
            .collect();

        Self {
            name: self.name.trim().to_string(),
            estimated_time: self.estimated_time.trim().to_string(),
            ingredients: or_default_groups(ingredients),
            instructions: trim_lines(self.instructions),
        }
    }

    /// Checks the required fields.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.name.trim().is_empty() {
            return Err(RecipeError::MissingField("name"));
        }
        if self.estimated_time.trim().is_empty() {
            return Err(RecipeError::MissingField("estimated time"));
        }
        Ok(())
    }
}

// An empty list would come back from storage as one empty group.
fn or_default_groups(ingredients: Vec<IngredientGroup>) -> Vec<IngredientGroup> {
    if ingredients.is_empty() {
        default_groups()
    } else {
        ingredients
    }
}

fn trim_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Returns a fresh opaque recipe identity.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parses an RFC 3339 timestamp or a `YYYY-MM-DD` date (taken as midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
