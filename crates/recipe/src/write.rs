use std::collections::BTreeSet;

use mise_shared::{
    ComponentStore, Error, Ingredient, Measure, Nutrition, Recipe, RecipeComponent, Result,
    TagCode,
};
use serde::Serialize;
use validator::Validate;

use crate::{Flattener, rebuild_cache};

#[derive(Validate, Clone, Debug)]
pub struct IngredientInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub measure: Measure,
    pub nutrition: Nutrition,
    pub tags: BTreeSet<TagCode>,
}

#[derive(Validate, Clone, Debug)]
pub struct ComponentInput {
    #[validate(length(min = 1))]
    pub component_id: String,
    #[validate(range(exclusive_min = 0.0))]
    pub quantity: f64,
}

#[derive(Validate, Clone, Debug)]
pub struct RecipeInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub default_servings: u32,
    pub instructions: String,
    #[validate(nested)]
    pub components: Vec<ComponentInput>,
}

/// State of the flattened view after a structural write.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CacheStatus {
    Rebuilt { rows: usize },
    /// The write was kept but the flattened row could not be refreshed.
    Stale { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Saved {
    pub recipe_id: String,
    pub cache: CacheStatus,
}

pub async fn create_ingredient<S: ComponentStore + ?Sized>(
    store: &mut S,
    input: IngredientInput,
) -> Result<String> {
    let id = ulid::Ulid::new().to_string();
    save_ingredient(store, id, input).await
}

pub async fn update_ingredient<S: ComponentStore + ?Sized>(
    store: &mut S,
    id: impl Into<String>,
    input: IngredientInput,
) -> Result<String> {
    let id = id.into();
    if store.ingredient(&id).await?.is_none() {
        return Err(Error::not_found(id));
    }

    save_ingredient(store, id, input).await
}

/// Ingredient edits never touch recipe structure, so no rebuild happens:
/// flattened rows reference ingredients by id and are joined at read time.
async fn save_ingredient<S: ComponentStore + ?Sized>(
    store: &mut S,
    id: String,
    input: IngredientInput,
) -> Result<String> {
    input.validate()?;

    let ingredient = Ingredient {
        id,
        name: input.name.trim().to_owned(),
        measure: input.measure,
        nutrition: input.nutrition,
        tags: input.tags,
    };

    store.put_ingredient(&ingredient).await?;

    tracing::info!(ingredient_id = %ingredient.id, name = %ingredient.name, "ingredient saved");

    Ok(ingredient.id)
}

pub async fn create_recipe<S: ComponentStore + ?Sized>(
    flattener: &Flattener,
    store: &mut S,
    input: RecipeInput,
) -> Result<Saved> {
    let id = ulid::Ulid::new().to_string();
    save_recipe(flattener, store, build_recipe(id, input)?).await
}

pub async fn update_recipe<S: ComponentStore + ?Sized>(
    flattener: &Flattener,
    store: &mut S,
    id: impl Into<String>,
    input: RecipeInput,
) -> Result<Saved> {
    let id = id.into();
    if store.recipe(&id).await?.is_none() {
        return Err(Error::not_found(id));
    }

    save_recipe(flattener, store, build_recipe(id, input)?).await
}

fn build_recipe(id: String, input: RecipeInput) -> Result<Recipe> {
    input.validate()?;

    Ok(Recipe {
        id,
        name: input.name.trim().to_owned(),
        default_servings: input.default_servings,
        instructions: input.instructions,
        components: input
            .components
            .into_iter()
            .map(|c| RecipeComponent {
                component_id: c.component_id,
                quantity: c.quantity,
            })
            .collect(),
    })
}

/// Writes a recipe's structure and refreshes its flattened row.
///
/// Only the recipe itself is rebuilt. A rebuild failure (cache write,
/// depth limit, ...) is logged and reported as [`CacheStatus::Stale`]; the
/// structural write is kept.
#[tracing::instrument(skip(flattener, store, recipe), fields(recipe_id = %recipe.id))]
pub async fn save_recipe<S: ComponentStore + ?Sized>(
    flattener: &Flattener,
    store: &mut S,
    recipe: Recipe,
) -> Result<Saved> {
    if recipe.default_servings == 0 {
        mise_shared::bail_integrity!("recipe {} must have at least one default serving", recipe.name);
    }

    if recipe.references_itself() {
        mise_shared::bail_integrity!("recipe {} cannot list itself as a component", recipe.name);
    }

    if let Some(component) = recipe
        .components
        .iter()
        .find(|c| !c.quantity.is_finite() || c.quantity <= 0.0)
    {
        return Err(Error::Validate(format!(
            "quantity of {} must be a positive number",
            component.component_id
        )));
    }

    let mut missing = Vec::new();
    for component in recipe.components.iter() {
        if missing.contains(&component.component_id) {
            continue;
        }

        if store.component(&component.component_id).await?.is_none() {
            missing.push(component.component_id.to_owned());
        }
    }

    if !missing.is_empty() {
        return Err(Error::NotFound(missing));
    }

    store.put_recipe(&recipe).await?;

    let cache = match rebuild_cache(flattener, store, &recipe.id).await {
        Ok(rows) => CacheStatus::Rebuilt { rows: rows.len() },
        Err(err) => {
            tracing::warn!(error = %err, "recipe saved with stale flattened cache");
            CacheStatus::Stale {
                reason: err.to_string(),
            }
        }
    };

    tracing::info!(name = %recipe.name, "recipe saved");

    Ok(Saved {
        recipe_id: recipe.id,
        cache,
    })
}
