//! `larder plan` subcommands.

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use uuid::Uuid;

use larder_core::menu;
use larder_core::store::Store;
use larder_db::models::{Category, Day, PlanKey, Slot};

use crate::PlanCommands;

const LANES: [Category; 3] = [Category::Main, Category::Side, Category::Soup];

pub async fn run_plan_command(command: PlanCommands, store: &dyn Store) -> Result<()> {
    match command {
        PlanCommands::Set { slot, recipe_id } => {
            let key: PlanKey = slot.parse()?;
            let id = Uuid::parse_str(&recipe_id)
                .with_context(|| format!("invalid recipe ID: {recipe_id}"))?;
            menu::set_slot(store, key, id).await?;
            println!("Slot {key} set.");
        }
        PlanCommands::Unset { slot } => {
            let key: PlanKey = slot.parse()?;
            menu::clear_slot(store, key).await?;
            println!("Slot {key} cleared.");
        }
        PlanCommands::Show => {
            show_plan(store).await?;
        }
        PlanCommands::Clear { yes } => {
            if !yes {
                bail!("this removes every slot assignment and the memo; pass --yes to confirm");
            }
            menu::clear_plan(store).await?;
            println!("Plan cleared.");
        }
        PlanCommands::Memo { text } => {
            menu::set_memo(store, &text).await?;
            println!("Memo saved.");
        }
    }
    Ok(())
}

async fn show_plan(store: &dyn Store) -> Result<()> {
    let plan = menu::load_plan(store).await?;

    // Resolve titles once; dangling references render as the raw id.
    let recipes = store.list_recipes().await?;
    let titles: HashMap<Uuid, &str> = recipes
        .iter()
        .map(|r| (r.id, r.title.as_str()))
        .collect();

    if plan.entries.0.is_empty() {
        println!("The plan is empty.");
    } else {
        for day in &Day::ALL {
            for slot in &Slot::ALL {
                let mut lines = Vec::new();
                for lane in &LANES {
                    let key = PlanKey::new(*day, *slot, *lane);
                    if let Some(id) = plan.entries.0.get(&key.to_string()) {
                        let title = titles
                            .get(id)
                            .copied()
                            .map(str::to_owned)
                            .unwrap_or_else(|| format!("(deleted {id})"));
                        lines.push(format!("  {:<6} {title}", lane.to_string()));
                    }
                }
                if !lines.is_empty() {
                    println!("{day} {slot}:");
                    for line in lines {
                        println!("{line}");
                    }
                }
            }
        }
    }

    if !plan.memo.is_empty() {
        println!("\nMemo:\n{}", plan.memo);
    }
    if !plan.entries.0.is_empty() || !plan.memo.is_empty() {
        let local = plan.updated_at.with_timezone(&chrono::Local);
        println!("\nLast updated {}", local.format("%Y-%m-%d %H:%M"));
    }
    Ok(())
}
