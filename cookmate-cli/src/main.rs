use clap::{Parser, Subcommand};
use cookmate_core::{Cookbook, FileStore};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod display;

use commands::{ConfigCommand, RecipeSubcommand};
use config::Config;

#[derive(Parser)]
#[command(name = "cookmate")]
#[command(version)]
#[command(about = "A local-first recipe manager", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Recipe(RecipeSubcommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Save config path for config commands
    let cli_config_path = cli.config.clone();

    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Recipe(cmd)) => {
            let mut cookbook = open_cookbook(&config)?;
            cmd.run(&mut cookbook)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config, cli_config_path)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

/// Loads the cookbook from the data directory, seeding it on first run.
fn open_cookbook(config: &Config) -> Result<Cookbook<FileStore>, Box<dyn std::error::Error>> {
    let store = FileStore::new(config.data_dir.value.clone());
    let seed = config.seed_source();
    tracing::debug!("Data directory: {}", config.data_dir.value.display());

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let cookbook = rt.block_on(Cookbook::load(store, &seed))?;
    Ok(cookbook)
}
