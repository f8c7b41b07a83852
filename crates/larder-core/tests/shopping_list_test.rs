//! Properties of the shopping-list aggregator.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use larder_core::shopping::{ShoppingListEntry, build_from_store, build_shopping_list};
use larder_core::store::{MemStore, Store};
use larder_db::models::{Category, Mark, Recipe, RecipeIngredient, Unit, WeeklyPlan};
use larder_db::queries::ingredients::NewIngredient;
use larder_db::queries::recipes::NewRecipe;

fn line(label: &str, unit: Unit, quantity: f64) -> RecipeIngredient {
    RecipeIngredient {
        ingredient_id: Uuid::new_v4(),
        label: label.to_string(),
        unit,
        quantity,
        mark: Mark::None,
    }
}

fn recipe(title: &str, category: Category, lines: Vec<RecipeIngredient>) -> Recipe {
    let now = Utc::now();
    Recipe {
        id: Uuid::new_v4(),
        title: title.to_string(),
        category,
        ingredients: Json(lines),
        steps: Json(vec![]),
        notes: String::new(),
        created_at: now,
        updated_at: now,
    }
}

fn plan(slots: &[(&str, Uuid)]) -> WeeklyPlan {
    let entries: BTreeMap<String, Uuid> = slots
        .iter()
        .map(|(key, id)| (key.to_string(), *id))
        .collect();
    WeeklyPlan {
        id: "current".to_string(),
        entries: Json(entries),
        memo: String::new(),
        updated_at: Utc::now(),
    }
}

fn find<'a>(entries: &'a [ShoppingListEntry], label: &str) -> &'a ShoppingListEntry {
    entries
        .iter()
        .find(|e| e.label == label)
        .unwrap_or_else(|| panic!("no entry labeled {label:?} in {entries:?}"))
}

#[test]
fn empty_plan_yields_empty_list() {
    let out = build_shopping_list(&plan(&[]), &[], &HashSet::new());
    assert!(out.is_empty());
}

#[test]
fn excluded_labels_never_appear() {
    let curry = recipe(
        "Curry",
        Category::Main,
        vec![
            line("potato", Unit::Piece, 2.0),
            line("salt", Unit::Pinch, 1.0),
        ],
    );
    let p = plan(&[("mon-dinner-main", curry.id)]);

    let excluded: HashSet<String> = ["salt".to_string()].into();
    let out = build_shopping_list(&p, &[curry], &excluded);

    assert_eq!(out.len(), 1);
    assert!(out.iter().all(|e| e.label != "salt"));
    assert_eq!(find(&out, "potato").quantity, 2.0);
}

#[test]
fn same_unit_labels_sum() {
    let curry = recipe("Curry", Category::Main, vec![line("onion", Unit::Piece, 1.0)]);
    let soup = recipe("Soup", Category::Soup, vec![line("onion", Unit::Piece, 2.0)]);
    let p = plan(&[
        ("mon-dinner-main", curry.id),
        ("mon-dinner-soup", soup.id),
    ]);

    let out = build_shopping_list(&p, &[curry, soup], &HashSet::new());

    assert_eq!(out.len(), 1);
    let onion = find(&out, "onion");
    assert_eq!(onion.quantity, 3.0);
    assert_eq!(onion.unit, Unit::Piece);
}

#[test]
fn differing_units_split_into_distinct_entries() {
    let stew = recipe(
        "Stew",
        Category::Main,
        vec![line("ginger", Unit::Piece, 1.0)],
    );
    let marinade = recipe(
        "Marinade",
        Category::Side,
        vec![line("ginger", Unit::Gram, 15.0)],
    );
    let p = plan(&[
        ("tue-dinner-main", stew.id),
        ("tue-dinner-side", marinade.id),
    ]);

    let out = build_shopping_list(&p, &[stew, marinade], &HashSet::new());

    assert_eq!(out.len(), 2);
    let first = find(&out, "ginger");
    assert_eq!(first.quantity, 1.0);
    assert_eq!(first.unit, Unit::Piece);
    let split = find(&out, "ginger (gram)");
    assert_eq!(split.quantity, 15.0);
    assert_eq!(split.unit, Unit::Gram);
}

#[test]
fn repeated_differing_unit_lines_sum_under_the_split_key() {
    let a = recipe("A", Category::Main, vec![line("ginger", Unit::Piece, 1.0)]);
    let b = recipe("B", Category::Side, vec![line("ginger", Unit::Gram, 10.0)]);
    let c = recipe("C", Category::Soup, vec![line("ginger", Unit::Gram, 5.0)]);
    let p = plan(&[
        ("wed-lunch-main", a.id),
        ("wed-lunch-side", b.id),
        ("wed-lunch-soup", c.id),
    ]);

    let out = build_shopping_list(&p, &[a, b, c], &HashSet::new());

    assert_eq!(out.len(), 2);
    assert_eq!(find(&out, "ginger (gram)").quantity, 15.0);
}

#[test]
fn recipe_planned_in_two_slots_counts_twice() {
    // Locked semantic: quantities multiply per slot occurrence.
    let curry = recipe(
        "Curry",
        Category::Main,
        vec![
            line("potato", Unit::Piece, 2.0),
            line("onion", Unit::Piece, 1.0),
        ],
    );
    let soup = recipe("Soup", Category::Soup, vec![line("onion", Unit::Piece, 1.0)]);
    let p = plan(&[
        ("mon-dinner-main", curry.id),
        ("wed-lunch-main", curry.id),
        ("mon-dinner-soup", soup.id),
    ]);

    let out = build_shopping_list(&p, &[curry, soup], &HashSet::new());

    assert_eq!(find(&out, "potato").quantity, 4.0);
    assert_eq!(find(&out, "onion").quantity, 3.0);
}

#[test]
fn deleted_recipe_reference_is_skipped() {
    let curry = recipe("Curry", Category::Main, vec![line("potato", Unit::Piece, 2.0)]);
    let p = plan(&[
        ("mon-dinner-main", curry.id),
        ("tue-dinner-main", Uuid::new_v4()), // dangling reference
    ]);

    let out = build_shopping_list(&p, &[curry], &HashSet::new());

    assert_eq!(out.len(), 1);
    assert_eq!(find(&out, "potato").quantity, 2.0);
}

#[test]
fn aggregation_is_idempotent() {
    let curry = recipe(
        "Curry",
        Category::Main,
        vec![
            line("potato", Unit::Piece, 2.0),
            line("onion", Unit::Piece, 1.0),
        ],
    );
    let p = plan(&[
        ("mon-dinner-main", curry.id),
        ("thu-lunch-main", curry.id),
    ]);
    let recipes = vec![curry];

    let first = build_shopping_list(&p, &recipes, &HashSet::new());
    let second = build_shopping_list(&p, &recipes, &HashSet::new());
    assert_eq!(first, second);
}

#[test]
fn output_preserves_first_seen_order() {
    let breakfast = recipe(
        "Breakfast",
        Category::Main,
        vec![
            line("egg", Unit::Piece, 2.0),
            line("bread", Unit::Slice, 2.0),
        ],
    );
    let salad = recipe(
        "Salad",
        Category::Side,
        vec![
            line("lettuce", Unit::Head, 0.5),
            line("egg", Unit::Piece, 1.0),
        ],
    );
    let p = plan(&[
        ("fri-lunch-main", breakfast.id),
        ("fri-lunch-side", salad.id),
    ]);

    let out = build_shopping_list(&p, &[breakfast, salad], &HashSet::new());

    let labels: Vec<&str> = out.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, ["egg", "bread", "lettuce"]);
    assert_eq!(find(&out, "egg").quantity, 3.0);
}

#[tokio::test]
async fn store_backed_build_applies_exclusions() {
    let store = MemStore::new();

    store
        .insert_ingredient(&NewIngredient {
            name: "salt".to_string(),
            unit: Unit::Pinch,
            exclude_from_list: true,
        })
        .await
        .expect("insert should succeed");

    let curry = store
        .insert_recipe(&NewRecipe {
            title: "Curry".to_string(),
            category: Category::Main,
            ingredients: vec![
                line("potato", Unit::Piece, 2.0),
                line("salt", Unit::Pinch, 1.0),
            ],
            steps: vec![],
            notes: String::new(),
        })
        .await
        .expect("insert should succeed");

    let mut p = WeeklyPlan::empty("current");
    p.entries.0.insert("sun-dinner-main".to_string(), curry.id);
    store.save_plan(&p).await.expect("save should succeed");

    let out = build_from_store(&store, "current")
        .await
        .expect("build should succeed");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].label, "potato");
}

#[tokio::test]
async fn store_backed_build_with_no_plan_document() {
    let store = MemStore::new();
    let out = build_from_store(&store, "current")
        .await
        .expect("build should succeed");
    assert!(out.is_empty());
}
