//! Database query functions for the `ingredients` table.

use anyhow::{Context, Result};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Ingredient, Unit};

/// Fields for a new catalog ingredient.
#[derive(Debug, Clone, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub unit: Unit,
    #[serde(default)]
    pub exclude_from_list: bool,
}

/// Insert a new ingredient row. Returns the inserted ingredient with
/// server-generated defaults (id, created_at).
///
/// There is no unique constraint on `name`; the duplicate-name guard lives
/// in the catalog service as a read-then-check.
pub async fn insert_ingredient(pool: &PgPool, new: &NewIngredient) -> Result<Ingredient> {
    let ingredient = sqlx::query_as::<_, Ingredient>(
        "INSERT INTO ingredients (name, unit, exclude_from_list) \
         VALUES ($1, $2, $3) \
         RETURNING *",
    )
    .bind(&new.name)
    .bind(new.unit)
    .bind(new.exclude_from_list)
    .fetch_one(pool)
    .await
    .context("failed to insert ingredient")?;

    Ok(ingredient)
}

/// Fetch an ingredient by its ID.
pub async fn get_ingredient(pool: &PgPool, id: Uuid) -> Result<Option<Ingredient>> {
    let ingredient = sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch ingredient")?;

    Ok(ingredient)
}

/// List the full catalog, ordered by registration time (oldest first).
pub async fn list_ingredients(pool: &PgPool) -> Result<Vec<Ingredient>> {
    let ingredients =
        sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients ORDER BY created_at, id")
            .fetch_all(pool)
            .await
            .context("failed to list ingredients")?;

    Ok(ingredients)
}

/// Delete an ingredient by ID. Returns `false` if no row matched.
pub async fn delete_ingredient(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete ingredient")?;

    Ok(result.rows_affected() > 0)
}
