//! `larder recipe` subcommands.

use anyhow::{Context, Result};
use uuid::Uuid;

use larder_core::recipe::{self, parse_recipe_toml, search_recipes};
use larder_core::store::Store;
use larder_db::models::{Category, Mark, Recipe};

use crate::RecipeCommands;

pub async fn run_recipe_command(command: RecipeCommands, store: &dyn Store) -> Result<()> {
    match command {
        RecipeCommands::Create { file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read recipe file {file}"))?;
            let parsed = parse_recipe_toml(&contents)?;
            let (stored, warnings) = recipe::create_recipe_from_toml(store, &parsed).await?;
            print_warnings(&warnings);
            println!("Created recipe {:?} [{}]", stored.title, stored.id);
        }
        RecipeCommands::List { category, query } => {
            let category = category
                .as_deref()
                .map(str::parse::<Category>)
                .transpose()?;
            let recipes = store.list_recipes().await?;
            let matched = search_recipes(&recipes, category, query.as_deref());
            if matched.is_empty() {
                println!("No recipes matched.");
                return Ok(());
            }
            println!("{:<38} {:<8} {}", "ID", "LANE", "TITLE");
            for r in &matched {
                println!("{:<38} {:<8} {}", r.id, r.category.to_string(), r.title);
            }
            println!("\n{} recipe(s).", matched.len());
        }
        RecipeCommands::Show { id } => {
            let id = parse_recipe_id(&id)?;
            let recipe = store
                .get_recipe(id)
                .await?
                .with_context(|| format!("no recipe with ID {id}"))?;
            print_recipe(&recipe);
        }
        RecipeCommands::Update { id, file } => {
            let id = parse_recipe_id(&id)?;
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read recipe file {file}"))?;
            let parsed = parse_recipe_toml(&contents)?;
            let (stored, warnings) = recipe::update_recipe_from_toml(store, id, &parsed).await?;
            print_warnings(&warnings);
            println!("Updated recipe {:?} [{}]", stored.title, stored.id);
        }
        RecipeCommands::Export { id, output } => {
            let id = parse_recipe_id(&id)?;
            let text = recipe::materialize_recipe(store, id).await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &text)
                        .with_context(|| format!("failed to write {path}"))?;
                    println!("Recipe exported to {path}");
                }
                None => print!("{text}"),
            }
        }
        RecipeCommands::Delete { id } => {
            let id = parse_recipe_id(&id)?;
            if store.delete_recipe(id).await? {
                println!("Recipe {id} deleted.");
                println!("Plan slots still pointing at it are skipped when building lists.");
            } else {
                println!("No recipe with ID {id}.");
            }
        }
    }
    Ok(())
}

fn parse_recipe_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).with_context(|| format!("invalid recipe ID: {id}"))
}

fn print_warnings(warnings: &[String]) {
    for w in warnings {
        println!("warning: {w}");
    }
}

fn mark_symbol(mark: Mark) -> &'static str {
    match mark {
        Mark::None => " ",
        Mark::Star => "☆",
        Mark::DoubleCircle => "◎",
        Mark::Heart => "♡",
    }
}

fn print_recipe(recipe: &Recipe) {
    println!("{} [{}]", recipe.title, recipe.category);
    println!("ID: {}", recipe.id);
    if !recipe.notes.is_empty() {
        println!("\n{}", recipe.notes);
    }
    if !recipe.ingredients.0.is_empty() {
        println!("\nIngredients:");
        for line in &recipe.ingredients.0 {
            println!(
                "  {} {:<24} {} {}",
                mark_symbol(line.mark),
                line.label,
                line.quantity,
                line.unit
            );
        }
    }
    if !recipe.steps.0.is_empty() {
        println!("\nSteps:");
        for (n, step) in recipe.steps.0.iter().enumerate() {
            println!("  {}. {step}", n + 1);
        }
    }
}
