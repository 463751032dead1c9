use std::collections::{HashMap, HashSet};

use mise_recipe::{Flattener, resolve};
use mise_shared::{ComponentStore, Error, Ingredient, Result};
use serde::Serialize;
use validator::Validate;

/// Servings of one recipe to shop for.
#[derive(Validate, Debug, Clone)]
pub struct ShoppingRequest {
    #[validate(length(min = 1))]
    pub recipe_id: String,
    #[validate(range(exclusive_min = 0.0))]
    pub quantity: f64,
}

impl ShoppingRequest {
    pub fn new(recipe_id: impl Into<String>, quantity: f64) -> Self {
        Self {
            recipe_id: recipe_id.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingItem {
    pub ingredient_id: String,
    pub ingredient: Ingredient,
    pub total_quantity: f64,
    /// `None` when availability was not checked.
    pub available: Option<bool>,
}

struct Total {
    ingredient: Ingredient,
    contributions: Vec<f64>,
}

/// Merges the scaled flattened lists of every request into one shopping list.
///
/// Each request contributes `row quantity * requested / default_servings`.
/// When `pantry` is given, every item is annotated with whether its
/// ingredient name is in the set. Items are sorted by ingredient name.
///
/// Recipes that cannot be found are collected across all requests and
/// reported together as one [`Error::NotFound`]; any other failure is
/// returned as soon as it happens.
#[tracing::instrument(skip_all, fields(requests = requests.len()))]
pub async fn aggregate<S: ComponentStore + ?Sized>(
    flattener: &Flattener,
    store: &mut S,
    requests: &[ShoppingRequest],
    pantry: Option<&HashSet<String>>,
) -> Result<Vec<ShoppingItem>> {
    let mut totals: HashMap<String, Total> = HashMap::new();
    let mut missing: Vec<String> = Vec::new();

    for request in requests {
        request.validate()?;
        if !request.quantity.is_finite() {
            return Err(Error::Validate(format!(
                "requested quantity of {} must be finite",
                request.recipe_id
            )));
        }

        let resolved = match resolve(flattener, store, &request.recipe_id).await {
            Ok(resolved) => resolved,
            Err(Error::NotFound(ids)) => {
                tracing::debug!(recipe_id = %request.recipe_id, unresolved = ?ids, "recipe not found");
                if !missing.contains(&request.recipe_id) {
                    missing.push(request.recipe_id.to_owned());
                }
                continue;
            }
            Err(err) => return Err(err),
        };

        if resolved.default_servings == 0 {
            mise_shared::bail_integrity!(
                "recipe {} has zero default servings",
                resolved.recipe_id
            );
        }

        let scale = request.quantity / f64::from(resolved.default_servings);

        for entry in resolved.entries {
            let quantity = entry.quantity * scale;
            totals
                .entry(entry.ingredient.id.to_owned())
                .and_modify(|total| total.contributions.push(quantity))
                .or_insert(Total {
                    ingredient: entry.ingredient,
                    contributions: vec![quantity],
                });
        }
    }

    if !missing.is_empty() {
        return Err(Error::NotFound(missing));
    }

    let mut items: Vec<ShoppingItem> = totals
        .into_iter()
        .map(|(ingredient_id, total)| ShoppingItem {
            available: pantry.map(|pantry| pantry.contains(&total.ingredient.name)),
            total_quantity: sum_sorted(total.contributions),
            ingredient_id,
            ingredient: total.ingredient,
        })
        .collect();

    items.sort_by(|a, b| {
        a.ingredient
            .name
            .cmp(&b.ingredient.name)
            .then_with(|| a.ingredient_id.cmp(&b.ingredient_id))
    });

    tracing::debug!(items = items.len(), "shopping list aggregated");

    Ok(items)
}

/// Sums in ascending order so the total does not depend on request order.
fn sum_sorted(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}
