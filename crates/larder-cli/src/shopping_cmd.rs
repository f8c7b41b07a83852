//! `larder shopping` command: aggregate the current plan into a list.

use anyhow::Result;

use larder_core::menu::CURRENT_PLAN_ID;
use larder_core::shopping;
use larder_core::store::Store;

pub async fn run_shopping(store: &dyn Store) -> Result<()> {
    let entries = shopping::build_from_store(store, CURRENT_PLAN_ID).await?;

    if entries.is_empty() {
        println!("Nothing to buy. The plan is empty (or everything is excluded).");
        return Ok(());
    }

    for entry in &entries {
        println!("{:<28} {} {}", entry.label, entry.quantity, entry.unit);
    }
    println!("\n{} item(s).", entries.len());
    Ok(())
}
