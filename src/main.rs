use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

use cli::{ingredient::IngredientCommand, recipe::RecipeCommand};

/// mise - nested recipes, shopping lists and recommendations
#[derive(Parser)]
#[command(name = "mise")]
#[command(about = "Flatten nested recipes, aggregate shopping lists, recommend recipes", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Manage ingredients
    Ingredient {
        #[command(subcommand)]
        command: IngredientCommand,
    },
    /// Manage recipes
    Recipe {
        #[command(subcommand)]
        command: RecipeCommand,
    },
    /// Print the base ingredients of a recipe for its default servings
    Flatten { recipe_id: String },
    /// Rebuild flattened views; every recipe when no id is given
    Rebuild { recipe_ids: Vec<String> },
    /// Aggregate a shopping list from <recipe>=<servings> requests
    Shop {
        #[arg(required = true, value_parser = cli::parse_pair)]
        requests: Vec<(String, f64)>,
        /// Ingredient names on hand; enables availability flags
        #[arg(long, value_delimiter = ',')]
        pantry: Option<Vec<String>>,
    },
    /// Recommend recipes for a group
    Recommend {
        #[arg(long)]
        group: String,
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        pantry: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = mise::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    mise::observability::init_observability(
        "mise",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Migrate => mise::migrate::migrate(&config).await,
        Commands::Reset => mise::migrate::reset(&config).await,
        Commands::Ingredient { command } => cli::ingredient::run(config, command).await,
        Commands::Recipe { command } => cli::recipe::run(config, command).await,
        Commands::Flatten { recipe_id } => cli::recipe::flatten(config, recipe_id).await,
        Commands::Rebuild { recipe_ids } => cli::recipe::rebuild(config, recipe_ids).await,
        Commands::Shop { requests, pantry } => cli::shop::run(config, requests, pantry).await,
        Commands::Recommend {
            group,
            tags,
            pantry,
        } => cli::recommend::run(config, group, tags, pantry).await,
    }
}
