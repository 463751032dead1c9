use std::collections::HashMap;

use mise_shared::{Component, ComponentStore, FlatRow, Ingredient, Recipe, Result};

/// In-process component store.
///
/// Enforces the same uniqueness rules as the SQLite schema: ingredient
/// name + unit per kind, and recipe names.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    components: HashMap<String, Component>,
    flattened: HashMap<String, Vec<FlatRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a component without any validation or cache
    /// maintenance. Intended for seeding.
    pub fn insert(&mut self, component: Component) {
        self.components
            .insert(component.id().to_owned(), component);
    }

    pub fn remove(&mut self, id: &str) -> Option<Component> {
        self.components.remove(id)
    }

    pub fn evict_flattened(&mut self, recipe_id: &str) -> Option<Vec<FlatRow>> {
        self.flattened.remove(recipe_id)
    }

    pub fn is_cached(&self, recipe_id: &str) -> bool {
        self.flattened.contains_key(recipe_id)
    }
}

#[async_trait::async_trait]
impl ComponentStore for MemoryStore {
    async fn component(&mut self, id: &str) -> Result<Option<Component>> {
        Ok(self.components.get(id).cloned())
    }

    async fn recipe_ids(&mut self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self
            .components
            .values()
            .filter_map(|c| match c {
                Component::Recipe(recipe) => Some(recipe.id.to_owned()),
                Component::Ingredient(_) => None,
            })
            .collect();
        ids.sort();

        Ok(ids)
    }

    async fn put_ingredient(&mut self, ingredient: &Ingredient) -> Result<()> {
        for component in self.components.values() {
            match component {
                Component::Recipe(recipe) if recipe.id == ingredient.id => {
                    mise_shared::bail_integrity!("id {} already belongs to a recipe", recipe.id);
                }
                Component::Ingredient(other)
                    if other.id != ingredient.id
                        && other.name == ingredient.name
                        && other.measure == ingredient.measure =>
                {
                    mise_shared::bail_integrity!(
                        "ingredient {} ({}) already exists",
                        other.name,
                        other.measure
                    );
                }
                _ => {}
            }
        }

        self.insert(Component::Ingredient(ingredient.clone()));

        Ok(())
    }

    async fn put_recipe(&mut self, recipe: &Recipe) -> Result<()> {
        for component in self.components.values() {
            match component {
                Component::Ingredient(ingredient) if ingredient.id == recipe.id => {
                    mise_shared::bail_integrity!(
                        "id {} already belongs to an ingredient",
                        ingredient.id
                    );
                }
                Component::Recipe(other) if other.id != recipe.id && other.name == recipe.name => {
                    mise_shared::bail_integrity!("recipe name {} already exists", other.name);
                }
                _ => {}
            }
        }

        self.insert(Component::Recipe(recipe.clone()));

        Ok(())
    }

    async fn flattened(&mut self, recipe_id: &str) -> Result<Option<Vec<FlatRow>>> {
        Ok(self.flattened.get(recipe_id).cloned())
    }

    async fn put_flattened(&mut self, recipe_id: &str, rows: &[FlatRow]) -> Result<()> {
        self.flattened.insert(recipe_id.to_owned(), rows.to_vec());

        Ok(())
    }
}
