use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum Ingredient {
    Table,
    Id,
    Kind,
    Name,
    Unit,
    Nutrition,
    Tags,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Recipe {
    Table,
    Id,
    Name,
    DefaultServings,
    Instructions,
    Components,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum RecipeFlattened {
    Table,
    RecipeId,
    Rows,
    UpdatedAt,
}
