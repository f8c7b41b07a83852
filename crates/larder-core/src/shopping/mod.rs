//! Shopping-list aggregation.
//!
//! [`build_shopping_list`] is a pure function over a plan snapshot, the
//! recipe repository, and the exclusion set, so it is testable without any
//! store. [`build_from_store`] is the thin store-backed wrapper the CLI and
//! HTTP handlers call.
//!
//! Quantity semantics: every plan slot that references a recipe contributes
//! that recipe's ingredients once, so a recipe planned in two slots counts
//! twice.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use serde::Serialize;
use uuid::Uuid;

use larder_db::models::{Recipe, Unit, WeeklyPlan};

use crate::catalog;
use crate::store::Store;

/// One aggregated line of the shopping list.
///
/// `label` is the ingredient name, or `"name (unit)"` when the same name
/// occurs with more than one unit and needs a disambiguated entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingListEntry {
    pub label: String,
    pub quantity: f64,
    pub unit: Unit,
}

/// Aggregate ingredient quantities across the recipes referenced by the plan.
///
/// - Plan entries are visited in slot-key order; entries referencing a
///   recipe that no longer exists are skipped silently.
/// - Ingredient lines whose label is in `excluded` are dropped.
/// - Lines merge by label when the unit matches; a differing unit opens a
///   separate `"label (unit)"` entry so quantities are never summed across
///   units.
/// - Output preserves first-seen order.
pub fn build_shopping_list(
    plan: &WeeklyPlan,
    recipes: &[Recipe],
    excluded: &HashSet<String>,
) -> Vec<ShoppingListEntry> {
    let by_id: HashMap<Uuid, &Recipe> = recipes.iter().map(|r| (r.id, r)).collect();

    let mut entries: Vec<ShoppingListEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for recipe_id in plan.entries.0.values() {
        let Some(recipe) = by_id.get(recipe_id) else {
            // Recipe was deleted after being planned.
            continue;
        };

        for line in &recipe.ingredients.0 {
            if excluded.contains(&line.label) {
                continue;
            }

            match index.get(&line.label) {
                Some(&i) if entries[i].unit == line.unit => {
                    entries[i].quantity += line.quantity;
                }
                Some(_) => {
                    // Same label, different unit: track under "label (unit)".
                    let key = format!("{} ({})", line.label, line.unit);
                    match index.get(&key) {
                        Some(&i) => entries[i].quantity += line.quantity,
                        None => {
                            index.insert(key.clone(), entries.len());
                            entries.push(ShoppingListEntry {
                                label: key,
                                quantity: line.quantity,
                                unit: line.unit,
                            });
                        }
                    }
                }
                None => {
                    index.insert(line.label.clone(), entries.len());
                    entries.push(ShoppingListEntry {
                        label: line.label.clone(),
                        quantity: line.quantity,
                        unit: line.unit,
                    });
                }
            }
        }
    }

    entries
}

/// Fetch the plan, recipe repository, and exclusion set, then aggregate.
///
/// The three reads are independent round-trips with no snapshot guarantee
/// across them; a concurrent edit may be reflected in one read and not
/// another. A missing plan document aggregates as empty.
pub async fn build_from_store(store: &dyn Store, plan_id: &str) -> Result<Vec<ShoppingListEntry>> {
    let plan = store
        .get_plan(plan_id)
        .await?
        .unwrap_or_else(|| WeeklyPlan::empty(plan_id));
    let recipes = store.list_recipes().await?;
    let excluded = catalog::exclusion_set(store).await?;

    Ok(build_shopping_list(&plan, &recipes, &excluded))
}
