use clap::{Subcommand, ValueEnum};
use cookmate_core::{CookLogEntry, Cookbook, IngredientGroup, KeyValueStore, Recipe, RecipeDraft};
use serde::Serialize;
use std::io::{self, Write};

use crate::display::{format_date_str, format_timestamp, truncate};

/// Separates an ingredient's group name from the item, as in `Dough::500 g flour`.
const GROUP_SEPARATOR: &str = "::";

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum RecipeSubcommand {
    /// List all recipes, newest first
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a recipe's details
    Show {
        /// Recipe ID or name
        identifier: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a new recipe
    Add {
        /// Name of the recipe
        #[arg(long)]
        name: String,

        /// Estimated time, e.g. "45 minutes"
        #[arg(long)]
        time: String,

        /// Ingredient line, optionally prefixed with a group (can be repeated)
        #[arg(long = "ingredient", value_name = "[GROUP::]ITEM")]
        ingredients: Vec<String>,

        /// Instruction step (can be repeated)
        #[arg(long = "step", value_name = "STEP")]
        steps: Vec<String>,
    },

    /// Edit an existing recipe
    Edit {
        /// Recipe ID or name
        identifier: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New estimated time
        #[arg(long)]
        time: Option<String>,

        /// Replace the ingredients (can be repeated)
        #[arg(long = "ingredient", value_name = "[GROUP::]ITEM")]
        ingredients: Vec<String>,

        /// Replace the instructions (can be repeated)
        #[arg(long = "step", value_name = "STEP")]
        steps: Vec<String>,
    },

    /// Delete a recipe
    Delete {
        /// Recipe ID or name
        identifier: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Mark a recipe as cooked now
    Cooked {
        /// Recipe ID or name
        identifier: String,
    },
}

/// A recipe together with its cook log, for JSON output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecipeView<'a> {
    #[serde(flatten)]
    recipe: &'a Recipe,
    cook_log: CookLogEntry,
}

impl RecipeSubcommand {
    pub fn run<S: KeyValueStore>(
        &self,
        cookbook: &mut Cookbook<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            RecipeSubcommand::List { format } => {
                let recipes = cookbook.list();

                if recipes.is_empty() {
                    println!("No recipes found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        let views: Vec<RecipeView> = recipes
                            .into_iter()
                            .map(|recipe| RecipeView {
                                recipe,
                                cook_log: cookbook.cook_log(&recipe.id),
                            })
                            .collect();
                        println!("{}", serde_json::to_string_pretty(&views)?);
                    }
                    OutputFormat::Text => {
                        println!(
                            "{:<36}  {:<30}  {:<16}  LAST COOKED",
                            "ID", "NAME", "TIME"
                        );
                        println!("{}", "-".repeat(100));
                        for recipe in &recipes {
                            let cooked = cookbook.cook_log(&recipe.id).last_cooked;
                            println!(
                                "{:<36}  {:<30}  {:<16}  {}",
                                recipe.id,
                                truncate(&recipe.name, 30),
                                truncate(&recipe.estimated_time, 16),
                                format_timestamp(cooked, false)
                            );
                        }
                        println!("\nTotal: {} recipe(s)", recipes.len());
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Show { identifier, format } => {
                let recipe = find(cookbook, identifier)?;
                let cook_log = cookbook.cook_log(&recipe.id);

                match format {
                    OutputFormat::Json => {
                        let view = RecipeView { recipe, cook_log };
                        println!("{}", serde_json::to_string_pretty(&view)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", recipe);
                        println!();
                        println!("ID: {}", recipe.id);
                        println!("Added: {}", format_date_str(&recipe.date_added, false));
                        println!(
                            "Last cooked: {}",
                            format_timestamp(cook_log.last_cooked, false)
                        );
                        println!(
                            "Last marked as cooked: {}",
                            format_timestamp(cook_log.last_marked_as_cooked, true)
                        );
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Add {
                name,
                time,
                ingredients,
                steps,
            } => {
                let draft = RecipeDraft::new(name.as_str(), time.as_str())
                    .with_ingredients(parse_ingredients(ingredients))
                    .with_instructions(steps.clone());

                let created = cookbook.create(draft).map_err(unsaved_warning)?;
                println!("Created recipe:");
                println!("{}", created);
                println!("ID: {}", created.id);
                Ok(())
            }

            RecipeSubcommand::Edit {
                identifier,
                name,
                time,
                ingredients,
                steps,
            } => {
                let has_updates = name.is_some()
                    || time.is_some()
                    || !ingredients.is_empty()
                    || !steps.is_empty();

                if !has_updates {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let recipe = find(cookbook, identifier)?;
                let id = recipe.id.clone();

                // Omitted fields keep their current value
                let mut draft = RecipeDraft::new(recipe.name.as_str(), recipe.estimated_time.as_str())
                    .with_ingredients(recipe.ingredients.clone())
                    .with_instructions(recipe.instructions.clone());
                if let Some(new_name) = name {
                    draft.name = new_name.clone();
                }
                if let Some(new_time) = time {
                    draft.estimated_time = new_time.clone();
                }
                if !ingredients.is_empty() {
                    draft.ingredients = parse_ingredients(ingredients);
                }
                if !steps.is_empty() {
                    draft.instructions = steps.clone();
                }

                match cookbook.update(&id, draft).map_err(unsaved_warning)? {
                    Some(updated) => {
                        println!("Updated recipe:");
                        println!("{}", updated);
                        Ok(())
                    }
                    None => Err(format!("Recipe not found: {}", identifier).into()),
                }
            }

            RecipeSubcommand::Delete { identifier, force } => {
                let recipe = find(cookbook, identifier)?;
                let (id, name) = (recipe.id.clone(), recipe.name.clone());

                // Confirm deletion unless --force is used
                if !force {
                    print!("Delete recipe '{}'? [y/N] ", name);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                cookbook.delete(&id).map_err(unsaved_warning)?;
                println!("Deleted recipe: {}", name);
                Ok(())
            }

            RecipeSubcommand::Cooked { identifier } => {
                let recipe = find(cookbook, identifier)?;
                let (id, name) = (recipe.id.clone(), recipe.name.clone());

                match cookbook.mark_cooked(&id).map_err(unsaved_warning)? {
                    Some(entry) => {
                        println!("Marked '{}' as cooked", name);
                        println!(
                            "Last cooked: {}",
                            format_timestamp(entry.last_cooked, true)
                        );
                        Ok(())
                    }
                    None => Err(format!("Recipe not found: {}", identifier).into()),
                }
            }
        }
    }
}

fn find<'a, S: KeyValueStore>(
    cookbook: &'a Cookbook<S>,
    identifier: &str,
) -> Result<&'a Recipe, Box<dyn std::error::Error>> {
    cookbook
        .find(identifier)
        .ok_or_else(|| format!("Recipe not found: {}", identifier).into())
}

/// Rewords storage failures: the change was made but could not be saved.
fn unsaved_warning(err: cookmate_core::CookbookError) -> Box<dyn std::error::Error> {
    if err.is_unsaved() {
        tracing::warn!("Write failed: {}", err);
        format!("Warning: changes were not saved ({})", err).into()
    } else {
        err.into()
    }
}

/// Groups `[GROUP::]ITEM` arguments, keeping groups in first-seen order.
fn parse_ingredients(args: &[String]) -> Vec<IngredientGroup> {
    let mut groups: Vec<IngredientGroup> = Vec::new();

    for arg in args {
        let (group_name, item) = match arg.split_once(GROUP_SEPARATOR) {
            Some((group, item)) => (group.trim(), item.trim()),
            None => ("", arg.trim()),
        };

        match groups.iter_mut().find(|g| g.group_name == group_name) {
            Some(group) => group.items.push(item.to_string()),
            None => groups.push(IngredientGroup::new(group_name, vec![item.to_string()])),
        }
    }

    groups
}
