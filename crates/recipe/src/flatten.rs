use std::collections::BTreeMap;

use mise_shared::{Component, ComponentStore, Error, FlatRow, Ingredient, Recipe, Result};
use serde::Serialize;

pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Base ingredient reached by a flattening walk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatEntry {
    pub ingredient: Ingredient,
    pub quantity: f64,
}

/// Ingredient id -> total quantity per default serving count of the root recipe.
pub type Flattened = BTreeMap<String, FlatEntry>;

pub fn to_rows(flattened: &Flattened) -> Vec<FlatRow> {
    flattened
        .values()
        .map(|entry| FlatRow {
            ingredient_id: entry.ingredient.id.to_owned(),
            quantity: entry.quantity,
            measure: entry.ingredient.measure,
            kind: entry.ingredient.kind(),
        })
        .collect()
}

struct Frame {
    recipe: Recipe,
    multiplier: f64,
    depth: usize,
}

/// Recursive recipe expansion with a depth guard.
///
/// Deep cycles (A -> B -> A) are not detected structurally; a walk that nests
/// deeper than `max_depth` recipes fails with [`Error::CycleDetected`].
#[derive(Debug, Clone, Copy)]
pub struct Flattener {
    pub max_depth: usize,
}

impl Default for Flattener {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Flattener {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Expands `recipe_id` into its base ingredients.
    ///
    /// An ingredient child adds `multiplier * quantity`. A recipe child is
    /// walked with `multiplier * quantity / child.default_servings`, since
    /// `quantity` servings of the child are needed and the child's list is
    /// expressed for its own default servings.
    #[tracing::instrument(skip(self, store))]
    pub async fn flatten<S: ComponentStore + ?Sized>(
        &self,
        store: &mut S,
        recipe_id: &str,
    ) -> Result<Flattened> {
        let root = store
            .recipe(recipe_id)
            .await?
            .ok_or_else(|| Error::not_found(recipe_id))?;

        let mut flattened = Flattened::new();
        let mut stack = vec![Frame {
            recipe: root,
            multiplier: 1.0,
            depth: 0,
        }];

        while let Some(frame) = stack.pop() {
            for component in frame.recipe.components.iter() {
                if component.component_id == frame.recipe.id {
                    mise_shared::bail_integrity!(
                        "recipe {} lists itself as a component",
                        frame.recipe.id
                    );
                }

                if !component.quantity.is_finite() || component.quantity < 0.0 {
                    mise_shared::bail_integrity!(
                        "recipe {} has invalid quantity {} for {}",
                        frame.recipe.id,
                        component.quantity,
                        component.component_id
                    );
                }

                let child = store
                    .component(&component.component_id)
                    .await?
                    .ok_or_else(|| Error::not_found(&component.component_id))?;

                match child {
                    Component::Ingredient(ingredient) => {
                        let quantity = frame.multiplier * component.quantity;
                        flattened
                            .entry(ingredient.id.to_owned())
                            .and_modify(|entry| entry.quantity += quantity)
                            .or_insert(FlatEntry {
                                ingredient,
                                quantity,
                            });
                    }
                    Component::Recipe(child) => {
                        if child.default_servings == 0 {
                            mise_shared::bail_integrity!(
                                "recipe {} has zero default servings",
                                child.id
                            );
                        }

                        let depth = frame.depth + 1;
                        if depth > self.max_depth {
                            return Err(Error::CycleDetected {
                                recipe_id: recipe_id.to_owned(),
                                limit: self.max_depth,
                            });
                        }

                        let multiplier = frame.multiplier * component.quantity
                            / f64::from(child.default_servings);

                        stack.push(Frame {
                            recipe: child,
                            multiplier,
                            depth,
                        });
                    }
                }
            }
        }

        tracing::debug!(recipe_id, ingredients = flattened.len(), "recipe flattened");

        Ok(flattened)
    }
}
