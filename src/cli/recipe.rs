use anyhow::Result;
use clap::{Args, Subcommand};
use mise_recipe::{ComponentInput, RecipeInput};
use serde::Serialize;

use mise::Config;

#[derive(Subcommand)]
pub enum RecipeCommand {
    /// Create a recipe; its flattened view is built right away
    Add(RecipeArgs),
    /// Replace a recipe's structure and rebuild its flattened view
    Update {
        id: String,
        #[command(flatten)]
        args: RecipeArgs,
    },
}

#[derive(Args)]
pub struct RecipeArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value_t = 1)]
    servings: u32,
    #[arg(long, default_value = "")]
    instructions: String,
    /// Child ingredient or recipe as <id>=<quantity>, repeatable
    #[arg(long = "component", value_parser = crate::cli::parse_pair)]
    components: Vec<(String, f64)>,
}

impl From<RecipeArgs> for RecipeInput {
    fn from(args: RecipeArgs) -> Self {
        RecipeInput {
            name: args.name,
            default_servings: args.servings,
            instructions: args.instructions,
            components: args
                .components
                .into_iter()
                .map(|(component_id, quantity)| ComponentInput {
                    component_id,
                    quantity,
                })
                .collect(),
        }
    }
}

pub async fn run(config: Config, command: RecipeCommand) -> Result<()> {
    let recipe = crate::cli::recipe_command(&config).await?;

    let saved = match command {
        RecipeCommand::Add(args) => recipe.create_recipe(args.into()).await?,
        RecipeCommand::Update { id, args } => recipe.update_recipe(id, args.into()).await?,
    };

    crate::cli::print_json(&saved)
}

pub async fn flatten(config: Config, recipe_id: String) -> Result<()> {
    let recipe = crate::cli::recipe_command(&config).await?;
    let flattened = recipe.flatten(&recipe_id).await?;

    crate::cli::print_json(&flattened)
}

#[derive(Serialize)]
struct Rebuilt {
    recipe_id: String,
    rows: Option<usize>,
    error: Option<String>,
}

/// Rebuilds the listed recipes, or all of them. Exits with an error when any
/// rebuild failed.
pub async fn rebuild(config: Config, recipe_ids: Vec<String>) -> Result<()> {
    let recipe = crate::cli::recipe_command(&config).await?;
    let outcomes = recipe.rebuild_many(&recipe_ids).await?;

    let rebuilt: Vec<Rebuilt> = outcomes
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(rows) => Rebuilt {
                recipe_id: outcome.recipe_id,
                rows: Some(rows),
                error: None,
            },
            Err(err) => Rebuilt {
                recipe_id: outcome.recipe_id,
                rows: None,
                error: Some(err.to_string()),
            },
        })
        .collect();

    crate::cli::print_json(&rebuilt)?;

    let failed = rebuilt.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        anyhow::bail!("{failed} recipe(s) could not be rebuilt");
    }

    Ok(())
}
