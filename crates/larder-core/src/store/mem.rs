//! In-memory [`Store`] implementation.
//!
//! Backs the service tests (no database required) and mirrors the
//! production store's semantics: inserts assign fresh ids, plan saves are
//! full-document upserts, and nothing enforces name uniqueness.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use larder_db::models::{Ingredient, Recipe, WeeklyPlan};
use larder_db::queries::ingredients::NewIngredient;
use larder_db::queries::recipes::NewRecipe;

use super::Store;

#[derive(Debug, Default)]
struct Inner {
    ingredients: Vec<Ingredient>,
    recipes: Vec<Recipe>,
    plans: HashMap<String, WeeklyPlan>,
    /// Number of memo writes observed, for debounce tests.
    memo_writes: u64,
}

/// In-memory store for tests and offline use.
#[derive(Debug, Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| anyhow!("store mutex poisoned"))
    }

    /// How many memo writes have reached the store.
    pub fn memo_write_count(&self) -> u64 {
        self.inner.lock().map(|inner| inner.memo_writes).unwrap_or(0)
    }
}

#[async_trait]
impl Store for MemStore {
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
        Ok(self.lock()?.ingredients.clone())
    }

    async fn get_ingredient(&self, id: Uuid) -> Result<Option<Ingredient>> {
        Ok(self.lock()?.ingredients.iter().find(|i| i.id == id).cloned())
    }

    async fn insert_ingredient(&self, new: &NewIngredient) -> Result<Ingredient> {
        let ingredient = Ingredient {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            unit: new.unit,
            exclude_from_list: new.exclude_from_list,
            created_at: Utc::now(),
        };
        self.lock()?.ingredients.push(ingredient.clone());
        Ok(ingredient)
    }

    async fn delete_ingredient(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.lock()?;
        let before = inner.ingredients.len();
        inner.ingredients.retain(|i| i.id != id);
        Ok(inner.ingredients.len() < before)
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        Ok(self.lock()?.recipes.clone())
    }

    async fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>> {
        Ok(self.lock()?.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn insert_recipe(&self, new: &NewRecipe) -> Result<Recipe> {
        let now = Utc::now();
        let recipe = Recipe {
            id: Uuid::new_v4(),
            title: new.title.clone(),
            category: new.category,
            ingredients: Json(new.ingredients.clone()),
            steps: Json(new.steps.clone()),
            notes: new.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        self.lock()?.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn update_recipe(&self, id: Uuid, new: &NewRecipe) -> Result<Option<Recipe>> {
        let mut inner = self.lock()?;
        let Some(recipe) = inner.recipes.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        recipe.title = new.title.clone();
        recipe.category = new.category;
        recipe.ingredients = Json(new.ingredients.clone());
        recipe.steps = Json(new.steps.clone());
        recipe.notes = new.notes.clone();
        recipe.updated_at = Utc::now();
        Ok(Some(recipe.clone()))
    }

    async fn delete_recipe(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.lock()?;
        let before = inner.recipes.len();
        inner.recipes.retain(|r| r.id != id);
        Ok(inner.recipes.len() < before)
    }

    async fn get_plan(&self, id: &str) -> Result<Option<WeeklyPlan>> {
        Ok(self.lock()?.plans.get(id).cloned())
    }

    async fn save_plan(&self, plan: &WeeklyPlan) -> Result<WeeklyPlan> {
        let mut stored = plan.clone();
        stored.updated_at = Utc::now();
        self.lock()?.plans.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn update_memo(&self, id: &str, memo: &str) -> Result<()> {
        let mut inner = self.lock()?;
        let plan = inner
            .plans
            .entry(id.to_string())
            .or_insert_with(|| WeeklyPlan::empty(id));
        plan.memo = memo.to_string();
        plan.updated_at = Utc::now();
        inner.memo_writes += 1;
        Ok(())
    }
}
