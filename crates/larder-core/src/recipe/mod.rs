//! Recipe repository service.
//!
//! Recipes enter the system either from a TOML file (ingredient lines
//! reference the catalog by name) or over HTTP (lines reference by id).
//! Both paths resolve against the catalog and denormalize each line's
//! label and unit into the recipe document, so rendering and aggregation
//! never need a catalog join.

use anyhow::Result;
use thiserror::Error;
use uuid::Uuid;

use larder_db::models::{Category, Ingredient, Mark, Recipe, RecipeIngredient};
use larder_db::queries::recipes::NewRecipe;

use crate::store::Store;

pub mod toml_format;

pub use toml_format::{IngredientToml, RecipeToml, parse_recipe_toml};

/// Errors from recipe operations.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("unknown ingredient {0:?}; register it in the catalog first")]
    UnknownIngredient(String),
    #[error("unknown ingredient id {0}")]
    UnknownIngredientId(Uuid),
    #[error("quantity {quantity} for {label:?} is invalid (must be positive)")]
    InvalidQuantity { label: String, quantity: f64 },
    #[error("recipe {0} not found")]
    NotFound(Uuid),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

// ---------------------------------------------------------------------------
// Quantity vocabulary
// ---------------------------------------------------------------------------

/// The quantity values offered by the UI: 0.5 steps up to 20, then 10
/// steps from 30 to 1000. Values off this grid are accepted with a warning.
pub fn quantity_steps() -> Vec<f64> {
    let mut steps: Vec<f64> = (1..=40).map(|i| f64::from(i) * 0.5).collect();
    steps.extend((0..98).map(|i| 30.0 + f64::from(i) * 10.0));
    steps
}

/// Whether `quantity` lies on the standard step grid.
pub fn is_standard_quantity(quantity: f64) -> bool {
    if !(quantity.is_finite() && quantity > 0.0) {
        return false;
    }
    if (0.5..=20.0).contains(&quantity) {
        return (quantity * 2.0).fract() == 0.0;
    }
    if (30.0..=1000.0).contains(&quantity) {
        return quantity % 10.0 == 0.0;
    }
    false
}

// ---------------------------------------------------------------------------
// Line resolution
// ---------------------------------------------------------------------------

/// A recipe ingredient line referencing the catalog by id, as submitted
/// over HTTP.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct IngredientLine {
    pub ingredient_id: Uuid,
    pub quantity: f64,
    #[serde(default)]
    pub mark: Mark,
}

/// Resolve id-referenced lines against the catalog, denormalizing label
/// and unit. Quantities must be positive and finite; off-grid values
/// produce warnings, not errors.
fn resolve_lines_by_id(
    catalog: &[Ingredient],
    lines: &[IngredientLine],
) -> Result<(Vec<RecipeIngredient>, Vec<String>), RecipeError> {
    let mut resolved = Vec::with_capacity(lines.len());
    let mut warnings = Vec::new();

    for line in lines {
        let ingredient = catalog
            .iter()
            .find(|i| i.id == line.ingredient_id)
            .ok_or(RecipeError::UnknownIngredientId(line.ingredient_id))?;

        if line.quantity <= 0.0 || !line.quantity.is_finite() {
            return Err(RecipeError::InvalidQuantity {
                label: ingredient.name.clone(),
                quantity: line.quantity,
            });
        }

        if !is_standard_quantity(line.quantity) {
            warnings.push(format!(
                "quantity {} for {:?} is off the standard step grid",
                line.quantity, ingredient.name
            ));
        }

        resolved.push(RecipeIngredient {
            ingredient_id: ingredient.id,
            label: ingredient.name.clone(),
            unit: ingredient.unit,
            quantity: line.quantity,
            mark: line.mark,
        });
    }

    Ok((resolved, warnings))
}

/// Resolve name-referenced TOML lines to ids, then denormalize as above.
/// Names match the trimmed catalog name exactly (case-sensitive).
fn resolve_toml_lines(
    catalog: &[Ingredient],
    lines: &[IngredientToml],
) -> Result<(Vec<RecipeIngredient>, Vec<String>), RecipeError> {
    let mut by_id = Vec::with_capacity(lines.len());
    for line in lines {
        let name = line.ingredient.trim();
        let ingredient = catalog
            .iter()
            .find(|i| i.name.trim() == name)
            .ok_or_else(|| RecipeError::UnknownIngredient(name.to_owned()))?;
        by_id.push(IngredientLine {
            ingredient_id: ingredient.id,
            quantity: line.quantity,
            mark: line.mark,
        });
    }
    resolve_lines_by_id(catalog, &by_id)
}

/// Trim steps and drop blank entries. Applied on every write path so the
/// stored document never carries empty steps.
fn normalize_steps(steps: &[String]) -> Vec<String> {
    steps
        .iter()
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

fn document_from_toml(
    catalog: &[Ingredient],
    recipe: &RecipeToml,
) -> Result<(NewRecipe, Vec<String>), RecipeError> {
    let (ingredients, warnings) = resolve_toml_lines(catalog, &recipe.ingredients)?;
    let steps = normalize_steps(&recipe.steps);

    Ok((
        NewRecipe {
            title: recipe.title.trim().to_owned(),
            category: recipe.category,
            ingredients,
            steps,
            notes: recipe.notes.trim().to_owned(),
        },
        warnings,
    ))
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Create a recipe from a parsed TOML definition.
///
/// Any ingredient name missing from the catalog fails the whole operation;
/// nothing is written. Returns the stored recipe and non-fatal warnings.
pub async fn create_recipe_from_toml(
    store: &dyn Store,
    recipe: &RecipeToml,
) -> Result<(Recipe, Vec<String>), RecipeError> {
    let catalog = store.list_ingredients().await?;
    let (new, warnings) = document_from_toml(&catalog, recipe)?;
    let stored = store.insert_recipe(&new).await?;
    Ok((stored, warnings))
}

/// Replace an existing recipe with a parsed TOML definition.
pub async fn update_recipe_from_toml(
    store: &dyn Store,
    id: Uuid,
    recipe: &RecipeToml,
) -> Result<(Recipe, Vec<String>), RecipeError> {
    let catalog = store.list_ingredients().await?;
    let (new, warnings) = document_from_toml(&catalog, recipe)?;
    let stored = store
        .update_recipe(id, &new)
        .await?
        .ok_or(RecipeError::NotFound(id))?;
    Ok((stored, warnings))
}

/// Create a recipe from id-referenced lines (the HTTP path).
pub async fn create_recipe(
    store: &dyn Store,
    title: &str,
    category: Category,
    lines: &[IngredientLine],
    steps: Vec<String>,
    notes: String,
) -> Result<(Recipe, Vec<String>), RecipeError> {
    let catalog = store.list_ingredients().await?;
    let (ingredients, warnings) = resolve_lines_by_id(&catalog, lines)?;
    let stored = store
        .insert_recipe(&NewRecipe {
            title: title.trim().to_owned(),
            category,
            ingredients,
            steps: normalize_steps(&steps),
            notes,
        })
        .await?;
    Ok((stored, warnings))
}

/// Replace a recipe from id-referenced lines (the HTTP path).
pub async fn update_recipe(
    store: &dyn Store,
    id: Uuid,
    title: &str,
    category: Category,
    lines: &[IngredientLine],
    steps: Vec<String>,
    notes: String,
) -> Result<(Recipe, Vec<String>), RecipeError> {
    let catalog = store.list_ingredients().await?;
    let (ingredients, warnings) = resolve_lines_by_id(&catalog, lines)?;
    let stored = store
        .update_recipe(
            id,
            &NewRecipe {
                title: title.trim().to_owned(),
                category,
                ingredients,
                steps: normalize_steps(&steps),
                notes,
            },
        )
        .await?
        .ok_or(RecipeError::NotFound(id))?;
    Ok((stored, warnings))
}

/// Materialize a stored recipe back to its TOML file form.
pub async fn materialize_recipe(store: &dyn Store, id: Uuid) -> Result<String, RecipeError> {
    let recipe = store.get_recipe(id).await?.ok_or(RecipeError::NotFound(id))?;

    let toml_doc = RecipeToml {
        title: recipe.title,
        category: recipe.category,
        notes: recipe.notes,
        steps: recipe.steps.0,
        ingredients: recipe
            .ingredients
            .0
            .into_iter()
            .map(|line| IngredientToml {
                ingredient: line.label,
                quantity: line.quantity,
                mark: line.mark,
            })
            .collect(),
    };

    let text = toml::to_string_pretty(&toml_doc)
        .map_err(|e| RecipeError::Store(anyhow::Error::new(e).context("failed to serialize recipe")))?;
    Ok(text)
}

/// Filter recipes by category and case-insensitive title keyword.
///
/// Mirrors the list view: both filters are optional and compose.
pub fn search_recipes<'a>(
    recipes: &'a [Recipe],
    category: Option<Category>,
    keyword: Option<&str>,
) -> Vec<&'a Recipe> {
    let keyword = keyword.map(str::to_lowercase);
    recipes
        .iter()
        .filter(|r| category.is_none_or(|c| r.category == c))
        .filter(|r| {
            keyword
                .as_deref()
                .is_none_or(|k| r.title.to_lowercase().contains(k))
        })
        .collect()
}
