use std::{collections::BTreeSet, str::FromStr};

use mise_recipe::{Command, ComponentInput, IngredientInput, RecipeInput};
use mise_shared::{Measure, Nutrition};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use temp_dir::TempDir;

pub struct TestState {
    pub command: Command,
    _dir: TempDir,
}

pub async fn setup_test_state() -> anyhow::Result<TestState> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    mise_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;

    Ok(TestState {
        command: Command::new(pool.clone(), pool),
        _dir: dir,
    })
}

pub fn ingredient(name: &str, measure: Measure, tags: &[&str]) -> IngredientInput {
    IngredientInput {
        name: name.to_owned(),
        measure,
        nutrition: Nutrition::default(),
        tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
    }
}

pub fn recipe(name: &str, servings: u32, components: &[(&str, f64)]) -> RecipeInput {
    RecipeInput {
        name: name.to_owned(),
        default_servings: servings,
        instructions: format!("Cook {name}."),
        components: components
            .iter()
            .map(|(id, quantity)| ComponentInput {
                component_id: id.to_string(),
                quantity: *quantity,
            })
            .collect(),
    }
}
