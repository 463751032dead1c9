use mise_shared::{ComponentStore, FlatRow, Result};
use sqlx::SqlitePool;

use crate::{
    Flattened, Flattener, IngredientInput, RebuildOutcome, RecipeInput, Resolved, Saved,
    SqliteStore,
};

/// SQLite entry point for the recipe engine.
///
/// Writes go through `write_db`, each inside its own transaction so a
/// structural write and its cache rebuild commit together. Reads use
/// `read_db`.
#[derive(Clone)]
pub struct Command {
    pub write_db: SqlitePool,
    pub read_db: SqlitePool,
    pub flattener: Flattener,
}

impl Command {
    pub fn new(write_db: SqlitePool, read_db: SqlitePool) -> Self {
        Self {
            write_db,
            read_db,
            flattener: Flattener::default(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.flattener = Flattener::new(max_depth);
        self
    }

    pub async fn create_ingredient(&self, input: IngredientInput) -> Result<String> {
        let mut tx = self.write_db.begin().await?;
        let id = crate::create_ingredient(&mut SqliteStore::new(&mut tx), input).await?;
        tx.commit().await?;

        Ok(id)
    }

    pub async fn update_ingredient(
        &self,
        id: impl Into<String>,
        input: IngredientInput,
    ) -> Result<String> {
        let mut tx = self.write_db.begin().await?;
        let id = crate::update_ingredient(&mut SqliteStore::new(&mut tx), id, input).await?;
        tx.commit().await?;

        Ok(id)
    }

    pub async fn create_recipe(&self, input: RecipeInput) -> Result<Saved> {
        let mut tx = self.write_db.begin().await?;
        let saved =
            crate::create_recipe(&self.flattener, &mut SqliteStore::new(&mut tx), input).await?;
        tx.commit().await?;

        Ok(saved)
    }

    pub async fn update_recipe(&self, id: impl Into<String>, input: RecipeInput) -> Result<Saved> {
        let mut tx = self.write_db.begin().await?;
        let saved =
            crate::update_recipe(&self.flattener, &mut SqliteStore::new(&mut tx), id, input)
                .await?;
        tx.commit().await?;

        Ok(saved)
    }

    /// Standalone rebuild. Unlike the save path, failures are returned.
    pub async fn rebuild_cache(&self, recipe_id: &str) -> Result<Vec<FlatRow>> {
        let mut tx = self.write_db.begin().await?;
        let rows =
            crate::rebuild_cache(&self.flattener, &mut SqliteStore::new(&mut tx), recipe_id)
                .await?;
        tx.commit().await?;

        Ok(rows)
    }

    /// Rebuilds the listed recipes, or every recipe when `recipe_ids` is empty.
    pub async fn rebuild_many(&self, recipe_ids: &[String]) -> Result<Vec<RebuildOutcome>> {
        let mut conn = self.write_db.acquire().await?;
        let mut store = SqliteStore::new(&mut conn);

        let recipe_ids = if recipe_ids.is_empty() {
            store.recipe_ids().await?
        } else {
            recipe_ids.to_vec()
        };

        Ok(crate::rebuild_many(&self.flattener, &mut store, &recipe_ids).await)
    }

    pub async fn flatten(&self, recipe_id: &str) -> Result<Flattened> {
        let mut conn = self.read_db.acquire().await?;

        self.flattener
            .flatten(&mut SqliteStore::new(&mut conn), recipe_id)
            .await
    }

    pub async fn resolve(&self, recipe_id: &str) -> Result<Resolved> {
        let mut conn = self.read_db.acquire().await?;

        crate::resolve(&self.flattener, &mut SqliteStore::new(&mut conn), recipe_id).await
    }
}
