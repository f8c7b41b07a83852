//! Weekly menu plan service.
//!
//! The plan is one document keyed by slot (`"{day}-{slot}-{category}"`).
//! Every edit follows the same cycle: load the document (defaulting to
//! empty), overwrite the targeted entry, write the whole document back.
//! Last write wins; there is no optimistic concurrency.

use anyhow::Result;
use thiserror::Error;
use uuid::Uuid;

use larder_db::models::{Category, PlanKey, WeeklyPlan};

use crate::store::Store;

pub mod autosave;

pub use autosave::MemoAutosave;

/// Fixed id of the single plan document.
pub const CURRENT_PLAN_ID: &str = "current";

/// Errors from plan edits.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("recipe {0} not found")]
    UnknownRecipe(Uuid),
    #[error("recipe {title:?} is a {actual} dish and cannot fill a {expected} slot")]
    CategoryMismatch {
        title: String,
        actual: Category,
        expected: Category,
    },
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Load the current plan, defaulting to an empty document when none exists.
pub async fn load_plan(store: &dyn Store) -> Result<WeeklyPlan> {
    let plan = store
        .get_plan(CURRENT_PLAN_ID)
        .await?
        .unwrap_or_else(|| WeeklyPlan::empty(CURRENT_PLAN_ID));
    Ok(plan)
}

/// Assign a recipe to one plan slot and persist the full document.
///
/// The recipe must exist and its category must match the slot's lane, so
/// plan entries always reference a dish that belongs where it is placed.
pub async fn set_slot(
    store: &dyn Store,
    key: PlanKey,
    recipe_id: Uuid,
) -> Result<WeeklyPlan, MenuError> {
    let recipe = store
        .get_recipe(recipe_id)
        .await?
        .ok_or(MenuError::UnknownRecipe(recipe_id))?;

    if recipe.category != key.category {
        return Err(MenuError::CategoryMismatch {
            title: recipe.title,
            actual: recipe.category,
            expected: key.category,
        });
    }

    let mut plan = load_plan(store).await?;
    plan.entries.0.insert(key.to_string(), recipe_id);
    let stored = store.save_plan(&plan).await?;
    Ok(stored)
}

/// Empty one plan slot and persist the full document.
pub async fn clear_slot(store: &dyn Store, key: PlanKey) -> Result<WeeklyPlan> {
    let mut plan = load_plan(store).await?;
    plan.entries.0.remove(&key.to_string());
    let stored = store.save_plan(&plan).await?;
    Ok(stored)
}

/// Reset the whole plan document: all entries and the memo.
///
/// Callers are responsible for user confirmation before invoking this.
pub async fn clear_plan(store: &dyn Store) -> Result<WeeklyPlan> {
    let stored = store.save_plan(&WeeklyPlan::empty(CURRENT_PLAN_ID)).await?;
    Ok(stored)
}

/// Write the memo immediately, bypassing the autosave debounce.
pub async fn set_memo(store: &dyn Store, memo: &str) -> Result<()> {
    store.update_memo(CURRENT_PLAN_ID, memo).await
}
