//! TOML format types for recipe files.
//!
//! These types map directly to the `recipe.toml` on-disk format and are
//! deserialized via `serde` + the `toml` crate. Ingredient lines reference
//! catalog entries by name; resolution to ids happens in the service layer.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use larder_db::models::{Category, Mark};

/// Top-level structure of a `recipe.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeToml {
    /// Recipe title shown in lists and the planner.
    pub title: String,
    /// Category lane: "main", "side", or "soup".
    pub category: Category,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    /// Preparation steps, in order.
    #[serde(default)]
    pub steps: Vec<String>,
    /// Ingredient lines, in order.
    #[serde(default)]
    pub ingredients: Vec<IngredientToml>,
}

/// A single `[[ingredients]]` entry in the recipe TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientToml {
    /// Catalog ingredient name.
    pub ingredient: String,
    /// Quantity in the ingredient's catalog unit. Must be positive.
    pub quantity: f64,
    /// Decorative mark: "none", "star", "double_circle", or "heart".
    #[serde(default)]
    pub mark: Mark,
}

/// Parse and validate a recipe TOML document.
///
/// Validation covers structure only (non-empty title, positive quantities,
/// no blank ingredient names); catalog resolution happens later.
pub fn parse_recipe_toml(content: &str) -> Result<RecipeToml> {
    let recipe: RecipeToml = toml::from_str(content).context("failed to parse recipe TOML")?;

    if recipe.title.trim().is_empty() {
        bail!("recipe title must not be empty");
    }

    for line in &recipe.ingredients {
        if line.ingredient.trim().is_empty() {
            bail!("ingredient name must not be empty");
        }
        if line.quantity <= 0.0 || !line.quantity.is_finite() {
            bail!(
                "ingredient {:?} has invalid quantity {} (must be positive)",
                line.ingredient,
                line.quantity
            );
        }
    }

    Ok(recipe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_minimal_recipe() {
        let toml_str = r#"
title = "Miso Soup"
category = "soup"
"#;
        let recipe = parse_recipe_toml(toml_str).expect("should parse");
        assert_eq!(recipe.title, "Miso Soup");
        assert_eq!(recipe.category, Category::Soup);
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.steps.is_empty());
        assert!(recipe.notes.is_empty());
    }

    #[test]
    fn deserialize_full_recipe() {
        let toml_str = r#"
title = "Curry"
category = "main"
notes = "Medium spice."
steps = ["Chop the vegetables.", "Simmer for 20 minutes."]

[[ingredients]]
ingredient = "potato"
quantity = 2.0
mark = "star"

[[ingredients]]
ingredient = "onion"
quantity = 1.0
"#;
        let recipe = parse_recipe_toml(toml_str).expect("should parse");
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].ingredient, "potato");
        assert_eq!(recipe.ingredients[0].mark, Mark::Star);
        assert_eq!(recipe.ingredients[1].mark, Mark::None); // default
        assert_eq!(recipe.steps.len(), 2);
    }

    #[test]
    fn reject_empty_title() {
        let toml_str = r#"
title = "  "
category = "main"
"#;
        let err = parse_recipe_toml(toml_str).unwrap_err();
        assert!(err.to_string().contains("title"), "unexpected: {err}");
    }

    #[test]
    fn reject_non_positive_quantity() {
        let toml_str = r#"
title = "Curry"
category = "main"

[[ingredients]]
ingredient = "potato"
quantity = 0.0
"#;
        let err = parse_recipe_toml(toml_str).unwrap_err();
        assert!(err.to_string().contains("quantity"), "unexpected: {err}");
    }

    #[test]
    fn reject_unknown_category() {
        let toml_str = r#"
title = "Pudding"
category = "dessert"
"#;
        assert!(parse_recipe_toml(toml_str).is_err());
    }

    #[test]
    fn serialize_roundtrip() {
        let recipe = RecipeToml {
            title: "Curry".to_string(),
            category: Category::Main,
            notes: String::new(),
            steps: vec!["Simmer.".to_string()],
            ingredients: vec![IngredientToml {
                ingredient: "potato".to_string(),
                quantity: 2.0,
                mark: Mark::None,
            }],
        };
        let text = toml::to_string_pretty(&recipe).expect("should serialize");
        let parsed = parse_recipe_toml(&text).expect("should reparse");
        assert_eq!(parsed, recipe);
    }
}
