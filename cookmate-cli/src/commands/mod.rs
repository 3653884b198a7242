mod config_cmd;
mod recipe;

pub use config_cmd::ConfigCommand;
pub use recipe::RecipeSubcommand;
