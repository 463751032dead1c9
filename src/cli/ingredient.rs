use anyhow::Result;
use clap::{Args, Subcommand};
use mise_recipe::IngredientInput;
use mise_shared::{IngredientKind, Measure, Nutrition};

use mise::Config;

#[derive(Subcommand)]
pub enum IngredientCommand {
    /// Create an ingredient and print its id
    Add(IngredientArgs),
    /// Replace an existing ingredient
    Update {
        id: String,
        #[command(flatten)]
        args: IngredientArgs,
    },
}

#[derive(Args)]
pub struct IngredientArgs {
    #[arg(long)]
    name: String,
    /// countable or uncountable
    #[arg(long)]
    kind: IngredientKind,
    /// piece, clove, slice, can, bunch, pack / g, kg, ml, l, tsp, tbsp, cup, pinch
    #[arg(long)]
    unit: String,
    /// Dietary or category tag, repeatable
    #[arg(long = "tag")]
    tags: Vec<String>,
    #[arg(long)]
    calories: Option<f64>,
    #[arg(long)]
    protein: Option<f64>,
    #[arg(long)]
    fat: Option<f64>,
    #[arg(long)]
    carbohydrates: Option<f64>,
    #[arg(long)]
    fiber: Option<f64>,
    #[arg(long)]
    sugar: Option<f64>,
    #[arg(long)]
    sodium: Option<f64>,
}

impl IngredientArgs {
    fn into_input(self) -> Result<IngredientInput> {
        let measure = Measure::parse(self.kind, &self.unit)
            .map_err(|_| anyhow::anyhow!("unit `{}` is not a {} unit", self.unit, self.kind))?;

        Ok(IngredientInput {
            name: self.name,
            measure,
            nutrition: Nutrition {
                calories: self.calories,
                protein: self.protein,
                fat: self.fat,
                carbohydrates: self.carbohydrates,
                fiber: self.fiber,
                sugar: self.sugar,
                sodium: self.sodium,
            },
            tags: self.tags.into_iter().collect(),
        })
    }
}

pub async fn run(config: Config, command: IngredientCommand) -> Result<()> {
    let recipe = crate::cli::recipe_command(&config).await?;

    let id = match command {
        IngredientCommand::Add(args) => recipe.create_ingredient(args.into_input()?).await?,
        IngredientCommand::Update { id, args } => {
            recipe.update_ingredient(id, args.into_input()?).await?
        }
    };

    crate::cli::print_json(&serde_json::json!({ "id": id }))
}
