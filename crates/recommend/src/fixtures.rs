use std::collections::BTreeSet;

use mise_recipe::MemoryStore;
use mise_shared::{
    Component, CountableUnit, Ingredient, Measure, Nutrition, Recipe, RecipeComponent,
};

use crate::GroupSnapshot;

pub fn ingredient(id: &str, name: &str, tags: &[&str]) -> Ingredient {
    Ingredient {
        id: id.to_owned(),
        name: name.to_owned(),
        measure: Measure::Countable(CountableUnit::Piece),
        nutrition: Nutrition::default(),
        tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
    }
}

pub fn recipe(id: &str, servings: u32, components: &[(&str, f64)]) -> Component {
    Component::Recipe(Recipe {
        id: id.to_owned(),
        name: id.to_owned(),
        default_servings: servings,
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

pub fn snapshot(tags: &[&str], pantry: &[&str]) -> GroupSnapshot {
    GroupSnapshot {
        tags: tags.iter().map(|t| t.to_string()).collect(),
        pantry: pantry.iter().map(|p| p.to_string()).collect(),
    }
}

/// soup = carrot + flour, satay = tofu + carrot + peanut, steak = beef,
/// salad = carrot + tofu.
pub fn kitchen() -> MemoryStore {
    let mut store = MemoryStore::new();
    for ingredient in [
        ingredient("a", "carrot", &["vegan"]),
        ingredient("b", "flour", &[]),
        ingredient("t", "tofu", &["vegan"]),
        ingredient("p", "peanut", &["nuts"]),
        ingredient("m", "beef", &["meat"]),
    ] {
        store.insert(Component::Ingredient(ingredient));
    }

    store.insert(recipe("soup", 2, &[("a", 4.0), ("b", 1.0)]));
    store.insert(recipe("satay", 2, &[("t", 1.0), ("a", 2.0), ("p", 1.0)]));
    store.insert(recipe("steak", 1, &[("m", 1.0)]));
    store.insert(recipe("salad", 1, &[("a", 1.0), ("t", 1.0)]));
    store
}
