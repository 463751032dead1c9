use std::collections::BTreeSet;

use mise_recipe::MemoryStore;
use mise_shared::{
    Component, CountableUnit, Ingredient, Measure, Nutrition, Recipe, RecipeComponent,
    UncountableUnit,
};

pub fn ingredient(id: &str, name: &str, measure: Measure) -> Component {
    Component::Ingredient(Ingredient {
        id: id.to_owned(),
        name: name.to_owned(),
        measure,
        nutrition: Nutrition::default(),
        tags: BTreeSet::new(),
    })
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

/// A = carrot (piece), B = flour (g), C = onion (piece);
/// soup (2) = 4 A + 1 B; feast (1) = 2 soup; stew (3) = 1 soup + 5 A + 2 C;
/// salad (4) = 3 C.
pub fn kitchen() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.insert(ingredient("a", "carrot", Measure::Countable(CountableUnit::Piece)));
    store.insert(ingredient("b", "flour", Measure::Uncountable(UncountableUnit::G)));
    store.insert(ingredient("c", "onion", Measure::Countable(CountableUnit::Piece)));
    store.insert(recipe("soup", 2, &[("a", 4.0), ("b", 1.0)]));
    store.insert(recipe("feast", 1, &[("soup", 2.0)]));
    store.insert(recipe("stew", 3, &[("soup", 1.0), ("a", 5.0), ("c", 2.0)]));
    store.insert(recipe("salad", 4, &[("c", 3.0)]));
    store
}
