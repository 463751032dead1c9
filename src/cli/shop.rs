use std::collections::HashSet;

use anyhow::Result;
use mise_recipe::SqliteStore;
use mise_shopping::{ShoppingRequest, aggregate};

use mise::Config;

pub async fn run(
    config: Config,
    requests: Vec<(String, f64)>,
    pantry: Option<Vec<String>>,
) -> Result<()> {
    let recipe = crate::cli::recipe_command(&config).await?;
    let requests: Vec<ShoppingRequest> = requests
        .into_iter()
        .map(|(recipe_id, quantity)| ShoppingRequest::new(recipe_id, quantity))
        .collect();
    let pantry: Option<HashSet<String>> = pantry.map(|names| names.into_iter().collect());

    let mut conn = recipe.read_db.acquire().await?;
    let items = aggregate(
        &recipe.flattener,
        &mut SqliteStore::new(&mut conn),
        &requests,
        pantry.as_ref(),
    )
    .await?;

    crate::cli::print_json(&items)
}
