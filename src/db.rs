//! # Database Module
//!
//! PostgreSQL persistence for the recipe catalog and user pantries.
//!
//! ## Tables
//!
//! - `ingredients`: canonical names, unique, with their category
//! - `recipes`: dataset metadata
//! - `recipe_ingredients`: links, unique per pair, with the token position
//!   so a recipe's ingredient order survives a round trip
//! - `user_pantry`: owned ingredient ids per user

use anyhow::{Context, Result};
use log::{debug, info};
use sqlx::postgres::PgRow;
use sqlx::{Executor, PgPool, Postgres, Row};
use std::collections::{HashMap, HashSet};

use crate::catalog_model::{
    CanonicalIngredient, CatalogIngredient, IngredientId, Recipe, RecipeDetail, RecipeId,
    RecipeWithIngredients, Recommendation,
};
use crate::category::IngredientCategory;
use crate::ingestion::{NewRecipe, PreparedRecipe};
use crate::recommendation::{build_ingredient_detail, recommend};

// Last write wins on category
const UPSERT_INGREDIENT_SQL: &str = "INSERT INTO ingredients (name, category) VALUES ($1, $2)
     ON CONFLICT (name) DO UPDATE SET category = EXCLUDED.category
     RETURNING id";

const INSERT_RECIPE_SQL: &str = "INSERT INTO recipes
     (title, instructions, image_url, category, is_vegetarian, prep_time, cuisine)
     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id";

const LINK_INGREDIENT_SQL: &str =
    "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, position)
     VALUES ($1, $2, $3) ON CONFLICT DO NOTHING";

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS ingredients (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            category TEXT NOT NULL DEFAULT 'All'
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create ingredients table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipes (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            instructions TEXT,
            image_url TEXT,
            category TEXT,
            is_vegetarian BOOLEAN NOT NULL DEFAULT FALSE,
            prep_time TEXT,
            cuisine TEXT
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create recipes table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipe_ingredients (
            recipe_id BIGINT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            ingredient_id BIGINT NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
            position INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (recipe_id, ingredient_id)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create recipe_ingredients table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS user_pantry (
            user_id BIGINT NOT NULL,
            ingredient_id BIGINT NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
            PRIMARY KEY (user_id, ingredient_id)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create user_pantry table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Insert an ingredient, or overwrite the category of the existing row with
/// the same name; returns the ingredient id either way
pub async fn upsert_ingredient(
    pool: &PgPool,
    name: &str,
    category: IngredientCategory,
) -> Result<IngredientId> {
    let row = sqlx::query(UPSERT_INGREDIENT_SQL)
        .bind(name)
        .bind(category.as_str())
        .fetch_one(pool)
        .await
        .context("Failed to upsert ingredient")?;

    Ok(row.try_get("id")?)
}

/// Create a recipe row
pub async fn create_recipe(pool: &PgPool, recipe: &NewRecipe) -> Result<RecipeId> {
    let recipe_id = insert_recipe(pool, recipe).await?;
    debug!("Recipe '{}' created with ID: {}", recipe.title, recipe_id);
    Ok(recipe_id)
}

// Runs on the pool or inside an open transaction
async fn insert_recipe<'e, E>(executor: E, recipe: &NewRecipe) -> Result<RecipeId>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(INSERT_RECIPE_SQL)
        .bind(&recipe.title)
        .bind(&recipe.instructions)
        .bind(&recipe.image_url)
        .bind(&recipe.category)
        .bind(recipe.is_vegetarian)
        .bind(&recipe.prep_time)
        .bind(&recipe.cuisine)
        .fetch_one(executor)
        .await
        .context("Failed to insert recipe")?;

    Ok(row.try_get("id")?)
}

/// Link an ingredient to a recipe; returns `false` if the link already existed
pub async fn link_recipe_ingredient(
    pool: &PgPool,
    recipe_id: RecipeId,
    ingredient_id: IngredientId,
    position: i32,
) -> Result<bool> {
    let result = sqlx::query(LINK_INGREDIENT_SQL)
        .bind(recipe_id)
        .bind(ingredient_id)
        .bind(position)
        .execute(pool)
        .await
        .context("Failed to link ingredient to recipe")?;

    Ok(result.rows_affected() > 0)
}

/// Store a prepared recipe and its ingredients in one transaction
pub async fn store_prepared_recipe(pool: &PgPool, prepared: &PreparedRecipe) -> Result<RecipeId> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;
    let recipe = &prepared.recipe;

    let recipe_id = insert_recipe(&mut *tx, recipe).await?;

    for (position, ingredient) in prepared.ingredients.iter().enumerate() {
        let ingredient_id: IngredientId = sqlx::query(UPSERT_INGREDIENT_SQL)
            .bind(&ingredient.name)
            .bind(ingredient.category.as_str())
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("Failed to upsert ingredient '{}'", ingredient.name))?
            .try_get("id")?;

        sqlx::query(LINK_INGREDIENT_SQL)
            .bind(recipe_id)
            .bind(ingredient_id)
            .bind(i32::try_from(position).unwrap_or(i32::MAX))
            .execute(&mut *tx)
            .await
            .context("Failed to link ingredient to recipe")?;
    }

    tx.commit().await.context("Failed to commit recipe")?;
    debug!(
        "Stored recipe '{}' (ID {}) with {} ingredients",
        recipe.title,
        recipe_id,
        prepared.ingredients.len()
    );
    Ok(recipe_id)
}

fn ingredient_from_row(row: &PgRow) -> Result<CanonicalIngredient> {
    let category: String = row.try_get("category")?;
    Ok(CanonicalIngredient {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category: category.parse().map_err(anyhow::Error::msg)?,
    })
}

fn recipe_from_row(row: &PgRow) -> Result<Recipe> {
    let text = |column: &str| -> Result<String> {
        Ok(row.try_get::<Option<String>, _>(column)?.unwrap_or_default())
    };
    Ok(Recipe {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        instructions: text("instructions")?,
        image_url: text("image_url")?,
        category: text("category")?,
        is_vegetarian: row.try_get("is_vegetarian")?,
        prep_time: text("prep_time")?,
        cuisine: text("cuisine")?,
    })
}

/// All ingredients ordered by category, then name
pub async fn list_ingredients(pool: &PgPool) -> Result<Vec<CanonicalIngredient>> {
    let rows = sqlx::query("SELECT id, name, category FROM ingredients ORDER BY category, name")
        .fetch_all(pool)
        .await
        .context("Failed to list ingredients")?;

    rows.iter().map(ingredient_from_row).collect()
}

/// Look up an ingredient by canonical name
pub async fn get_ingredient_by_name(
    pool: &PgPool,
    name: &str,
) -> Result<Option<CanonicalIngredient>> {
    let row = sqlx::query("SELECT id, name, category FROM ingredients WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
        .context("Failed to read ingredient")?;

    row.as_ref().map(ingredient_from_row).transpose()
}

/// Number of ingredients per category label
pub async fn category_counts(pool: &PgPool) -> Result<Vec<(String, i64)>> {
    let rows = sqlx::query(
        "SELECT category, COUNT(*) AS count FROM ingredients GROUP BY category ORDER BY category",
    )
    .fetch_all(pool)
    .await
    .context("Failed to count ingredient categories")?;

    rows.iter()
        .map(|row| -> Result<(String, i64)> {
            Ok((row.try_get("category")?, row.try_get("count")?))
        })
        .collect()
}

async fn recipe_ingredients(
    pool: &PgPool,
    recipe_id: Option<RecipeId>,
) -> Result<HashMap<RecipeId, Vec<CatalogIngredient>>> {
    let rows = sqlx::query(
        "SELECT ri.recipe_id, i.id, i.name
         FROM recipe_ingredients ri
         JOIN ingredients i ON i.id = ri.ingredient_id
         WHERE $1::BIGINT IS NULL OR ri.recipe_id = $1
         ORDER BY ri.recipe_id, ri.position",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await
    .context("Failed to read recipe ingredients")?;

    let mut grouped: HashMap<RecipeId, Vec<CatalogIngredient>> = HashMap::new();
    for row in &rows {
        let recipe_id: RecipeId = row.try_get("recipe_id")?;
        grouped.entry(recipe_id).or_default().push(CatalogIngredient {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        });
    }
    Ok(grouped)
}

/// Load every recipe with its ordered ingredients
pub async fn load_catalog(pool: &PgPool) -> Result<Vec<RecipeWithIngredients>> {
    let rows = sqlx::query("SELECT * FROM recipes ORDER BY id")
        .fetch_all(pool)
        .await
        .context("Failed to load recipes")?;
    let mut ingredients = recipe_ingredients(pool, None).await?;

    let catalog = rows
        .iter()
        .map(|row| -> Result<RecipeWithIngredients> {
            let recipe = recipe_from_row(row)?;
            let ingredients = ingredients.remove(&recipe.id).unwrap_or_default();
            Ok(RecipeWithIngredients { recipe, ingredients })
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Loaded catalog with {} recipes", catalog.len());
    Ok(catalog)
}

/// Read one recipe with its ordered ingredients
pub async fn get_recipe(
    pool: &PgPool,
    recipe_id: RecipeId,
) -> Result<Option<RecipeWithIngredients>> {
    let row = sqlx::query("SELECT * FROM recipes WHERE id = $1")
        .bind(recipe_id)
        .fetch_optional(pool)
        .await
        .context("Failed to read recipe")?;

    let Some(row) = row else {
        info!("No recipe found with ID: {}", recipe_id);
        return Ok(None);
    };

    let recipe = recipe_from_row(&row)?;
    let ingredients = recipe_ingredients(pool, Some(recipe_id))
        .await?
        .remove(&recipe_id)
        .unwrap_or_default();
    Ok(Some(RecipeWithIngredients { recipe, ingredients }))
}

/// Ingredient ids in a user's pantry
pub async fn get_owned_ingredient_ids(
    pool: &PgPool,
    user_id: i64,
) -> Result<HashSet<IngredientId>> {
    let rows = sqlx::query("SELECT ingredient_id FROM user_pantry WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("Failed to read pantry")?;

    rows.iter()
        .map(|row| -> Result<IngredientId> { Ok(row.try_get("ingredient_id")?) })
        .collect()
}

/// Pantry ingredients with names and categories
pub async fn get_pantry(pool: &PgPool, user_id: i64) -> Result<Vec<CanonicalIngredient>> {
    let rows = sqlx::query(
        "SELECT i.id, i.name, i.category
         FROM ingredients i
         JOIN user_pantry up ON i.id = up.ingredient_id
         WHERE up.user_id = $1
         ORDER BY i.name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to read pantry ingredients")?;

    rows.iter().map(ingredient_from_row).collect()
}

/// Replace a user's pantry with the given ingredient ids
pub async fn replace_pantry(
    pool: &PgPool,
    user_id: i64,
    ingredient_ids: &[IngredientId],
) -> Result<()> {
    info!(
        "Replacing pantry for user {} with {} ingredients",
        user_id,
        ingredient_ids.len()
    );
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    sqlx::query("DELETE FROM user_pantry WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear pantry")?;

    for ingredient_id in ingredient_ids {
        sqlx::query(
            "INSERT INTO user_pantry (user_id, ingredient_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(*ingredient_id)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to add ingredient {ingredient_id} to pantry"))?;
    }

    tx.commit().await.context("Failed to commit pantry")?;
    Ok(())
}

/// Recommendations for a user's current pantry
pub async fn recommend_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Recommendation>> {
    let owned = get_owned_ingredient_ids(pool, user_id).await?;
    if owned.is_empty() {
        return Ok(Vec::new());
    }
    let catalog = load_catalog(pool).await?;
    Ok(recommend(&owned, &catalog))
}

/// Recipe detail annotated against a user's pantry
pub async fn recipe_detail_for_user(
    pool: &PgPool,
    recipe_id: RecipeId,
    user_id: i64,
) -> Result<Option<RecipeDetail>> {
    let Some(entry) = get_recipe(pool, recipe_id).await? else {
        return Ok(None);
    };
    let owned = get_owned_ingredient_ids(pool, user_id).await?;
    let ingredients = build_ingredient_detail(&entry, &owned);
    Ok(Some(RecipeDetail {
        recipe: entry.recipe,
        ingredients,
    }))
}
