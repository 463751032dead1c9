use std::collections::BTreeSet;
use std::fmt;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Opaque dietary/category tag code, e.g. `vegan` or `contains_nuts`.
pub type TagCode = String;

#[derive(
    Encode,
    Decode,
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IngredientKind {
    Countable,
    Uncountable,
}

#[derive(
    EnumString, Display, AsRefStr, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    CountableIngredient,
    UncountableIngredient,
    Recipe,
}

impl From<IngredientKind> for ComponentKind {
    fn from(value: IngredientKind) -> Self {
        match value {
            IngredientKind::Countable => ComponentKind::CountableIngredient,
            IngredientKind::Uncountable => ComponentKind::UncountableIngredient,
        }
    }
}

#[derive(
    Encode,
    Decode,
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CountableUnit {
    #[default]
    Piece,
    Clove,
    Slice,
    Can,
    Bunch,
    Pack,
}

#[derive(
    Encode,
    Decode,
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UncountableUnit {
    #[default]
    G,
    Kg,
    Ml,
    L,
    Tsp,
    Tbsp,
    Cup,
    Pinch,
}

/// Unit of an ingredient. The variant decides whether the ingredient is
/// countable, so kind and unit can never disagree.
#[derive(Encode, Decode, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "unit", rename_all = "snake_case")]
pub enum Measure {
    Countable(CountableUnit),
    Uncountable(UncountableUnit),
}

impl Measure {
    pub fn kind(&self) -> IngredientKind {
        match self {
            Measure::Countable(_) => IngredientKind::Countable,
            Measure::Uncountable(_) => IngredientKind::Uncountable,
        }
    }

    pub fn unit(&self) -> &str {
        match self {
            Measure::Countable(unit) => unit.as_ref(),
            Measure::Uncountable(unit) => unit.as_ref(),
        }
    }

    /// Parses a unit string within the unit set of `kind`.
    pub fn parse(kind: IngredientKind, unit: &str) -> Result<Self, strum::ParseError> {
        let unit = unit.trim().to_lowercase();

        match kind {
            IngredientKind::Countable => unit.parse().map(Measure::Countable),
            IngredientKind::Uncountable => unit.parse().map(Measure::Uncountable),
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.unit())
    }
}

/// Nutritional attributes per one unit of the ingredient.
#[derive(Encode, Decode, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub sodium: Option<f64>,
}

#[derive(Encode, Decode, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub measure: Measure,
    #[serde(default)]
    pub nutrition: Nutrition,
    #[serde(default)]
    pub tags: BTreeSet<TagCode>,
}

impl Ingredient {
    pub fn kind(&self) -> IngredientKind {
        self.measure.kind()
    }
}

#[derive(Encode, Decode, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeComponent {
    pub component_id: String,
    /// Amount of the child needed for `default_servings` of the parent.
    pub quantity: f64,
}

#[derive(Encode, Decode, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub default_servings: u32,
    #[serde(default)]
    pub instructions: String,
    pub components: Vec<RecipeComponent>,
}

impl Recipe {
    /// Shallow guard only: true when the recipe lists itself as a direct child.
    pub fn references_itself(&self) -> bool {
        self.components.iter().any(|c| c.component_id == self.id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Component {
    Ingredient(Ingredient),
    Recipe(Recipe),
}

impl Component {
    pub fn id(&self) -> &str {
        match self {
            Component::Ingredient(ingredient) => &ingredient.id,
            Component::Recipe(recipe) => &recipe.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Component::Ingredient(ingredient) => &ingredient.name,
            Component::Recipe(recipe) => &recipe.name,
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Ingredient(ingredient) => ingredient.kind().into(),
            Component::Recipe(_) => ComponentKind::Recipe,
        }
    }
}

/// One row of a recipe's flattened view.
#[derive(Encode, Decode, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    pub ingredient_id: String,
    /// Quantity per default serving count of the owning recipe.
    pub quantity: f64,
    pub measure: Measure,
    pub kind: IngredientKind,
}
