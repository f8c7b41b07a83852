//! `larder ingredient` subcommands.

use anyhow::{Context, Result};
use uuid::Uuid;

use larder_core::catalog;
use larder_core::store::Store;
use larder_db::models::Unit;

use crate::IngredientCommands;

pub async fn run_ingredient_command(
    command: IngredientCommands,
    store: &dyn Store,
) -> Result<()> {
    match command {
        IngredientCommands::Add {
            name,
            unit,
            exclude,
        } => {
            let unit: Unit = unit.parse()?;
            let ingredient = catalog::register_ingredient(store, &name, unit, exclude).await?;
            println!(
                "Registered ingredient {:?} ({}) [{}]",
                ingredient.name, ingredient.unit, ingredient.id
            );
            if ingredient.exclude_from_list {
                println!("  (excluded from shopping lists)");
            }
        }
        IngredientCommands::List => {
            let ingredients = store.list_ingredients().await?;
            if ingredients.is_empty() {
                println!("No ingredients registered. Add one with `larder ingredient add`.");
                return Ok(());
            }
            println!("{:<38} {:<24} {:<12} {}", "ID", "NAME", "UNIT", "EXCLUDED");
            for i in &ingredients {
                println!(
                    "{:<38} {:<24} {:<12} {}",
                    i.id,
                    i.name,
                    i.unit.to_string(),
                    if i.exclude_from_list { "yes" } else { "" }
                );
            }
            println!("\n{} ingredient(s).", ingredients.len());
        }
        IngredientCommands::Delete { id } => {
            let id = Uuid::parse_str(&id).with_context(|| format!("invalid ingredient ID: {id}"))?;
            if catalog::remove_ingredient(store, id).await? {
                println!("Ingredient {id} deleted.");
                println!("Existing recipes keep their own copy of the name and unit.");
            } else {
                println!("No ingredient with ID {id}.");
            }
        }
    }
    Ok(())
}
