//! Database query functions for the `recipes` table.
//!
//! Recipes are whole documents: create and update always replace the full
//! JSONB ingredient and step lists, never patch them.

use anyhow::{Context, Result};
use serde::Deserialize;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::{Category, Recipe, RecipeIngredient};

/// Fields for a new or replacement recipe document.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    pub category: Category,
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

/// Insert a new recipe row. Returns the inserted recipe with
/// server-generated defaults (id, created_at, updated_at).
pub async fn insert_recipe(pool: &PgPool, new: &NewRecipe) -> Result<Recipe> {
    let recipe = sqlx::query_as::<_, Recipe>(
        "INSERT INTO recipes (title, category, ingredients, steps, notes) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING *",
    )
    .bind(&new.title)
    .bind(new.category)
    .bind(Json(&new.ingredients))
    .bind(Json(&new.steps))
    .bind(&new.notes)
    .fetch_one(pool)
    .await
    .context("failed to insert recipe")?;

    Ok(recipe)
}

/// Fetch a recipe by its ID.
pub async fn get_recipe(pool: &PgPool, id: Uuid) -> Result<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch recipe")?;

    Ok(recipe)
}

/// List all recipes, ordered by title.
pub async fn list_recipes(pool: &PgPool) -> Result<Vec<Recipe>> {
    let recipes = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes ORDER BY title, id")
        .fetch_all(pool)
        .await
        .context("failed to list recipes")?;

    Ok(recipes)
}

/// Replace a recipe document wholesale. Returns the updated recipe, or
/// `None` if no row matched.
pub async fn update_recipe(pool: &PgPool, id: Uuid, new: &NewRecipe) -> Result<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>(
        "UPDATE recipes \
         SET title = $1, category = $2, ingredients = $3, steps = $4, notes = $5, \
             updated_at = now() \
         WHERE id = $6 \
         RETURNING *",
    )
    .bind(&new.title)
    .bind(new.category)
    .bind(Json(&new.ingredients))
    .bind(Json(&new.steps))
    .bind(&new.notes)
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("failed to update recipe")?;

    Ok(recipe)
}

/// Delete a recipe by ID. Returns `false` if no row matched.
///
/// Weekly-plan entries referencing the deleted recipe are left in place; the
/// aggregator and planner skip dangling references silently.
pub async fn delete_recipe(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete recipe")?;

    Ok(result.rows_affected() > 0)
}
