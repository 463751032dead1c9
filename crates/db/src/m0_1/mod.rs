mod ingredient;
mod recipe;
mod recipe_flattened;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "mise",
    "m0_1",
    vec_box![],
    vec_box![
        ingredient::CreateTable,
        ingredient::CreateUk1,
        recipe::CreateTable,
        recipe::CreateUk1,
        recipe_flattened::CreateTable
    ]
);
