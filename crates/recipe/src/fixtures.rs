use std::collections::BTreeSet;

use mise_shared::{
    Component, ComponentStore, CountableUnit, FlatRow, Ingredient, Measure, Nutrition, Recipe,
    RecipeComponent, Result, UncountableUnit,
};

use crate::MemoryStore;

pub fn countable(id: &str, name: &str, tags: &[&str]) -> Component {
    Component::Ingredient(Ingredient {
        id: id.to_owned(),
        name: name.to_owned(),
        measure: Measure::Countable(CountableUnit::Piece),
        nutrition: Nutrition::default(),
        tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
    })
}

pub fn uncountable(id: &str, name: &str, tags: &[&str]) -> Component {
    Component::Ingredient(Ingredient {
        id: id.to_owned(),
        name: name.to_owned(),
        measure: Measure::Uncountable(UncountableUnit::G),
        nutrition: Nutrition::default(),
        tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
    })
}

pub fn recipe(id: &str, default_servings: u32, components: &[(&str, f64)]) -> Component {
    Component::Recipe(Recipe {
        id: id.to_owned(),
        name: id.to_owned(),
        default_servings,
        instructions: String::new(),
        components: components
            .iter()
            .map(|(component_id, quantity)| RecipeComponent {
                component_id: component_id.to_string(),
                quantity: *quantity,
            })
            .collect(),
    })
}

/// Soup (2 servings) = 4 A + 1 B; Feast (1 serving) = 2 Soup.
pub fn soup_and_feast() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.insert(countable("a", "carrot", &["vegan"]));
    store.insert(uncountable("b", "flour", &[]));
    store.insert(recipe("soup", 2, &[("a", 4.0), ("b", 1.0)]));
    store.insert(recipe("feast", 1, &[("soup", 2.0)]));
    store
}

/// Delegates to a memory store but refuses cache writes.
pub struct ReadOnlyCache(pub MemoryStore);

#[async_trait::async_trait]
impl ComponentStore for ReadOnlyCache {
    async fn component(&mut self, id: &str) -> Result<Option<Component>> {
        self.0.component(id).await
    }

    async fn recipe_ids(&mut self) -> Result<Vec<String>> {
        self.0.recipe_ids().await
    }

    async fn put_ingredient(&mut self, ingredient: &Ingredient) -> Result<()> {
        self.0.put_ingredient(ingredient).await
    }

    async fn put_recipe(&mut self, recipe: &Recipe) -> Result<()> {
        self.0.put_recipe(recipe).await
    }

    async fn flattened(&mut self, recipe_id: &str) -> Result<Option<Vec<FlatRow>>> {
        self.0.flattened(recipe_id).await
    }

    async fn put_flattened(&mut self, _recipe_id: &str, _rows: &[FlatRow]) -> Result<()> {
        Err(anyhow::anyhow!("disk full").into())
    }
}
