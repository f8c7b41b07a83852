//! PostgreSQL-backed [`Store`] implementation, delegating to the query
//! functions in `larder-db`.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use larder_db::models::{Ingredient, Recipe, WeeklyPlan};
use larder_db::queries::ingredients::{self, NewIngredient};
use larder_db::queries::recipes::{self, NewRecipe};
use larder_db::queries::weekly_plans;

use super::Store;

/// Production store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for callers that need raw access (migrations).
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
        ingredients::list_ingredients(&self.pool).await
    }

    async fn get_ingredient(&self, id: Uuid) -> Result<Option<Ingredient>> {
        ingredients::get_ingredient(&self.pool, id).await
    }

    async fn insert_ingredient(&self, new: &NewIngredient) -> Result<Ingredient> {
        ingredients::insert_ingredient(&self.pool, new).await
    }

    async fn delete_ingredient(&self, id: Uuid) -> Result<bool> {
        ingredients::delete_ingredient(&self.pool, id).await
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        recipes::list_recipes(&self.pool).await
    }

    async fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>> {
        recipes::get_recipe(&self.pool, id).await
    }

    async fn insert_recipe(&self, new: &NewRecipe) -> Result<Recipe> {
        recipes::insert_recipe(&self.pool, new).await
    }

    async fn update_recipe(&self, id: Uuid, new: &NewRecipe) -> Result<Option<Recipe>> {
        recipes::update_recipe(&self.pool, id, new).await
    }

    async fn delete_recipe(&self, id: Uuid) -> Result<bool> {
        recipes::delete_recipe(&self.pool, id).await
    }

    async fn get_plan(&self, id: &str) -> Result<Option<WeeklyPlan>> {
        weekly_plans::get_plan(&self.pool, id).await
    }

    async fn save_plan(&self, plan: &WeeklyPlan) -> Result<WeeklyPlan> {
        weekly_plans::save_plan(&self.pool, plan).await
    }

    async fn update_memo(&self, id: &str, memo: &str) -> Result<()> {
        weekly_plans::update_memo(&self.pool, id, memo).await
    }
}
