use crate::{Component, FlatRow, Ingredient, Recipe, Result};

/// Narrow persistence contract the engine reads and writes through.
///
/// A store handle is one unit of work: implementations backed by a database
/// wrap a single connection or an open transaction, so every call made
/// through the same handle runs under the caller's transaction.
#[async_trait::async_trait]
pub trait ComponentStore: Send {
    /// Single lookup over the shared ingredient/recipe id space.
    async fn component(&mut self, id: &str) -> Result<Option<Component>>;

    async fn recipe_ids(&mut self) -> Result<Vec<String>>;

    async fn put_ingredient(&mut self, ingredient: &Ingredient) -> Result<()>;

    async fn put_recipe(&mut self, recipe: &Recipe) -> Result<()>;

    async fn flattened(&mut self, recipe_id: &str) -> Result<Option<Vec<FlatRow>>>;

    /// Replaces the whole flattened row of `recipe_id`.
    async fn put_flattened(&mut self, recipe_id: &str, rows: &[FlatRow]) -> Result<()>;

    async fn recipe(&mut self, id: &str) -> Result<Option<Recipe>> {
        match self.component(id).await? {
            Some(Component::Recipe(recipe)) => Ok(Some(recipe)),
            _ => Ok(None),
        }
    }

    async fn ingredient(&mut self, id: &str) -> Result<Option<Ingredient>> {
        match self.component(id).await? {
            Some(Component::Ingredient(ingredient)) => Ok(Some(ingredient)),
            _ => Ok(None),
        }
    }
}
