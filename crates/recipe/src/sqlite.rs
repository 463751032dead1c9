use mise_db::table;
use mise_shared::{
    Component, ComponentStore, Error, FlatRow, Ingredient, IngredientKind, Measure, Recipe,
    Result,
};
use sea_query::{Expr, ExprTrait, OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, prelude::FromRow};
use time::OffsetDateTime;

#[derive(FromRow)]
struct IngredientRow {
    id: String,
    kind: String,
    name: String,
    unit: String,
    nutrition: Vec<u8>,
    tags: Vec<u8>,
}

impl TryFrom<IngredientRow> for Ingredient {
    type Error = Error;

    fn try_from(row: IngredientRow) -> Result<Self> {
        let kind: IngredientKind = row.kind.parse().map_err(|_| {
            Error::DataIntegrity(format!("ingredient {} has unknown kind {}", row.id, row.kind))
        })?;

        let measure = Measure::parse(kind, &row.unit).map_err(|_| {
            Error::DataIntegrity(format!(
                "ingredient {} has unit {} outside of its kind {}",
                row.id, row.unit, kind
            ))
        })?;

        Ok(Ingredient {
            measure,
            nutrition: bitcode::decode(&row.nutrition)?,
            tags: bitcode::decode(&row.tags)?,
            id: row.id,
            name: row.name,
        })
    }
}

#[derive(FromRow)]
struct RecipeRow {
    id: String,
    name: String,
    default_servings: i64,
    instructions: String,
    components: Vec<u8>,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = Error;

    fn try_from(row: RecipeRow) -> Result<Self> {
        let default_servings = u32::try_from(row.default_servings).map_err(|_| {
            Error::DataIntegrity(format!(
                "recipe {} has invalid default servings {}",
                row.id, row.default_servings
            ))
        })?;

        Ok(Recipe {
            default_servings,
            components: bitcode::decode(&row.components)?,
            id: row.id,
            name: row.name,
            instructions: row.instructions,
        })
    }
}

#[derive(FromRow)]
struct FlattenedRow {
    rows: Vec<u8>,
}

/// [`ComponentStore`] over one SQLite connection.
///
/// Pass a `Transaction` (deref'd to its connection) to make a sequence of
/// calls atomic.
pub struct SqliteStore<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    async fn find_ingredient(&mut self, id: &str) -> Result<Option<Ingredient>> {
        let statement = Query::select()
            .columns([
                table::Ingredient::Id,
                table::Ingredient::Kind,
                table::Ingredient::Name,
                table::Ingredient::Unit,
                table::Ingredient::Nutrition,
                table::Ingredient::Tags,
            ])
            .from(table::Ingredient::Table)
            .and_where(Expr::col(table::Ingredient::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, IngredientRow, _>(&sql, values)
            .fetch_optional(&mut *self.conn)
            .await?;

        row.map(Ingredient::try_from).transpose()
    }

    async fn find_recipe(&mut self, id: &str) -> Result<Option<Recipe>> {
        let statement = Query::select()
            .columns([
                table::Recipe::Id,
                table::Recipe::Name,
                table::Recipe::DefaultServings,
                table::Recipe::Instructions,
                table::Recipe::Components,
            ])
            .from(table::Recipe::Table)
            .and_where(Expr::col(table::Recipe::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_optional(&mut *self.conn)
            .await?;

        row.map(Recipe::try_from).transpose()
    }
}

fn unique_violation(err: sqlx::Error, message: impl FnOnce() -> String) -> Error {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => Error::DataIntegrity(message()),
        err => err.into(),
    }
}

#[async_trait::async_trait]
impl ComponentStore for SqliteStore<'_> {
    async fn component(&mut self, id: &str) -> Result<Option<Component>> {
        if let Some(ingredient) = self.find_ingredient(id).await? {
            return Ok(Some(Component::Ingredient(ingredient)));
        }

        Ok(self.find_recipe(id).await?.map(Component::Recipe))
    }

    async fn recipe_ids(&mut self) -> Result<Vec<String>> {
        let statement = Query::select()
            .column(table::Recipe::Id)
            .from(table::Recipe::Table)
            .order_by(table::Recipe::Id, sea_query::Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let ids = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    async fn put_ingredient(&mut self, ingredient: &Ingredient) -> Result<()> {
        if self.find_recipe(&ingredient.id).await?.is_some() {
            mise_shared::bail_integrity!("id {} already belongs to a recipe", ingredient.id);
        }

        let statement = Query::insert()
            .into_table(table::Ingredient::Table)
            .columns([
                table::Ingredient::Id,
                table::Ingredient::Kind,
                table::Ingredient::Name,
                table::Ingredient::Unit,
                table::Ingredient::Nutrition,
                table::Ingredient::Tags,
                table::Ingredient::CreatedAt,
            ])
            .values_panic([
                ingredient.id.to_owned().into(),
                ingredient.kind().to_string().into(),
                ingredient.name.to_owned().into(),
                ingredient.measure.unit().to_owned().into(),
                bitcode::encode(&ingredient.nutrition).into(),
                bitcode::encode(&ingredient.tags).into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .on_conflict(
                OnConflict::column(table::Ingredient::Id)
                    .update_columns([
                        table::Ingredient::Kind,
                        table::Ingredient::Name,
                        table::Ingredient::Unit,
                        table::Ingredient::Nutrition,
                        table::Ingredient::Tags,
                    ])
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&mut *self.conn)
            .await
            .map_err(|err| {
                unique_violation(err, || {
                    format!(
                        "ingredient {} ({}) already exists",
                        ingredient.name, ingredient.measure
                    )
                })
            })?;

        Ok(())
    }

    async fn put_recipe(&mut self, recipe: &Recipe) -> Result<()> {
        if self.find_ingredient(&recipe.id).await?.is_some() {
            mise_shared::bail_integrity!("id {} already belongs to an ingredient", recipe.id);
        }

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let statement = Query::insert()
            .into_table(table::Recipe::Table)
            .columns([
                table::Recipe::Id,
                table::Recipe::Name,
                table::Recipe::DefaultServings,
                table::Recipe::Instructions,
                table::Recipe::Components,
                table::Recipe::CreatedAt,
            ])
            .values_panic([
                recipe.id.to_owned().into(),
                recipe.name.to_owned().into(),
                recipe.default_servings.into(),
                recipe.instructions.to_owned().into(),
                bitcode::encode(&recipe.components).into(),
                now.into(),
            ])
            .on_conflict(
                OnConflict::column(table::Recipe::Id)
                    .update_columns([
                        table::Recipe::Name,
                        table::Recipe::DefaultServings,
                        table::Recipe::Instructions,
                        table::Recipe::Components,
                    ])
                    .value(table::Recipe::UpdatedAt, now)
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&mut *self.conn)
            .await
            .map_err(|err| {
                unique_violation(err, || format!("recipe name {} already exists", recipe.name))
            })?;

        Ok(())
    }

    async fn flattened(&mut self, recipe_id: &str) -> Result<Option<Vec<FlatRow>>> {
        let statement = Query::select()
            .column(table::RecipeFlattened::Rows)
            .from(table::RecipeFlattened::Table)
            .and_where(Expr::col(table::RecipeFlattened::RecipeId).eq(recipe_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, FlattenedRow, _>(&sql, values)
            .fetch_optional(&mut *self.conn)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(bitcode::decode(&row.rows)?))
    }

    async fn put_flattened(&mut self, recipe_id: &str, rows: &[FlatRow]) -> Result<()> {
        let statement = Query::insert()
            .into_table(table::RecipeFlattened::Table)
            .columns([
                table::RecipeFlattened::RecipeId,
                table::RecipeFlattened::Rows,
                table::RecipeFlattened::UpdatedAt,
            ])
            .values_panic([
                recipe_id.to_owned().into(),
                bitcode::encode(&rows.to_vec()).into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .on_conflict(
                OnConflict::column(table::RecipeFlattened::RecipeId)
                    .update_columns([
                        table::RecipeFlattened::Rows,
                        table::RecipeFlattened::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&mut *self.conn)
            .await?;

        Ok(())
    }
}
