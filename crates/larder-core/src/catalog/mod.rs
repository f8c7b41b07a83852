//! Ingredient catalog service.
//!
//! Registration runs the duplicate-name guard: the full catalog is fetched
//! and scanned for a whitespace-trimmed, case-sensitive exact match before
//! inserting. This is a read-then-write check with no transactional
//! guarantee -- two racing sessions can both pass it -- which matches the
//! backing store's lack of a unique constraint.

use std::collections::HashSet;

use anyhow::Result;
use thiserror::Error;
use uuid::Uuid;

use larder_db::models::{Ingredient, Unit};
use larder_db::queries::ingredients::NewIngredient;

use crate::store::Store;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("ingredient name must not be empty")]
    EmptyName,
    #[error("an ingredient named {0:?} is already registered")]
    Duplicate(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Register a new ingredient, rejecting trimmed-equal duplicate names.
///
/// The stored name is the trimmed form. Matching is case-sensitive:
/// `"Salt"` and `"salt"` are distinct catalog entries.
pub async fn register_ingredient(
    store: &dyn Store,
    name: &str,
    unit: Unit,
    exclude_from_list: bool,
) -> Result<Ingredient, CatalogError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::EmptyName);
    }

    let existing = store.list_ingredients().await?;
    if existing.iter().any(|i| i.name.trim() == trimmed) {
        return Err(CatalogError::Duplicate(trimmed.to_owned()));
    }

    let ingredient = store
        .insert_ingredient(&NewIngredient {
            name: trimmed.to_owned(),
            unit,
            exclude_from_list,
        })
        .await?;

    Ok(ingredient)
}

/// Delete an ingredient by id. Returns `false` when no such entry exists.
///
/// Recipes keep their denormalized copy of the label and unit, so deleting
/// a catalog entry does not touch existing recipe documents.
pub async fn remove_ingredient(store: &dyn Store, id: Uuid) -> Result<bool> {
    store.delete_ingredient(id).await
}

/// The set of ingredient names flagged to be left off the shopping list.
pub async fn exclusion_set(store: &dyn Store) -> Result<HashSet<String>> {
    let ingredients = store.list_ingredients().await?;
    Ok(ingredients
        .into_iter()
        .filter(|i| i.exclude_from_list)
        .map(|i| i.name)
        .collect())
}
