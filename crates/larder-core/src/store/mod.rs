//! Repository abstraction over the document collections.
//!
//! The application state lives in three collections: the ingredient catalog,
//! the recipe repository, and the weekly-plan document. [`Store`] exposes
//! the capability set the services need (list, get, insert, update, delete
//! per collection) without committing them to a concrete backend.
//!
//! [`PgStore`] is the production implementation; [`MemStore`] backs tests
//! and offline use.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use larder_db::models::{Ingredient, Recipe, WeeklyPlan};
use larder_db::queries::ingredients::NewIngredient;
use larder_db::queries::recipes::NewRecipe;

mod mem;
mod pg;

pub use mem::MemStore;
pub use pg::PgStore;

/// Capability set over the three backing collections.
///
/// Writes carry no cross-document guarantees: read-then-write sequences
/// (the duplicate-name guard, the plan load-modify-save cycle) can race
/// between sessions, and the last write observed by the store wins.
#[async_trait]
pub trait Store: Send + Sync {
    // Ingredient catalog.
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>>;
    async fn get_ingredient(&self, id: Uuid) -> Result<Option<Ingredient>>;
    async fn insert_ingredient(&self, new: &NewIngredient) -> Result<Ingredient>;
    async fn delete_ingredient(&self, id: Uuid) -> Result<bool>;

    // Recipe repository.
    async fn list_recipes(&self) -> Result<Vec<Recipe>>;
    async fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>>;
    async fn insert_recipe(&self, new: &NewRecipe) -> Result<Recipe>;
    async fn update_recipe(&self, id: Uuid, new: &NewRecipe) -> Result<Option<Recipe>>;
    async fn delete_recipe(&self, id: Uuid) -> Result<bool>;

    // Weekly plan document.
    async fn get_plan(&self, id: &str) -> Result<Option<WeeklyPlan>>;
    async fn save_plan(&self, plan: &WeeklyPlan) -> Result<WeeklyPlan>;
    async fn update_memo(&self, id: &str, memo: &str) -> Result<()>;
}
