//! Integration tests for the flows behind the `larder` CLI commands.
//!
//! These exercise the catalog, recipe, plan, and shopping services against a
//! real PostgreSQL instance, end to end in the order an operator would run
//! them. Each test creates an isolated temporary database and drops it on
//! completion.

use larder_core::catalog::{self, CatalogError};
use larder_core::menu::{self, CURRENT_PLAN_ID};
use larder_core::recipe::{self, parse_recipe_toml};
use larder_core::shopping;
use larder_core::store::{PgStore, Store};
use larder_db::models::{Category, Day, PlanKey, Slot, Unit};
use larder_test_utils::{create_test_db, drop_test_db};

const CURRY_TOML: &str = r#"
title = "Curry"
category = "main"
steps = ["Chop the vegetables.", "Simmer for 20 minutes."]

[[ingredients]]
ingredient = "potato"
quantity = 2.0
mark = "star"

[[ingredients]]
ingredient = "onion"
quantity = 1.0

[[ingredients]]
ingredient = "salt"
quantity = 1.0
"#;

#[tokio::test]
async fn register_plan_and_build_shopping_list() {
    let (pool, db_name) = create_test_db().await;
    let store = PgStore::new(pool.clone());

    // Catalog setup, the way `larder ingredient add` does it.
    catalog::register_ingredient(&store, "potato", Unit::Piece, false)
        .await
        .expect("register potato");
    catalog::register_ingredient(&store, "onion", Unit::Piece, false)
        .await
        .expect("register onion");
    catalog::register_ingredient(&store, "salt", Unit::Pinch, true)
        .await
        .expect("register salt");

    // `larder recipe create curry.toml`.
    let parsed = parse_recipe_toml(CURRY_TOML).expect("parse recipe TOML");
    let (curry, warnings) = recipe::create_recipe_from_toml(&store, &parsed)
        .await
        .expect("create recipe");
    assert!(warnings.is_empty());
    assert_eq!(curry.ingredients.0.len(), 3);

    // `larder plan set`, twice for the same recipe.
    menu::set_slot(
        &store,
        PlanKey::new(Day::Mon, Slot::Dinner, Category::Main),
        curry.id,
    )
    .await
    .expect("set mon slot");
    menu::set_slot(
        &store,
        PlanKey::new(Day::Wed, Slot::Lunch, Category::Main),
        curry.id,
    )
    .await
    .expect("set wed slot");

    // `larder shopping`: quantities doubled, salt excluded.
    let entries = shopping::build_from_store(&store, CURRENT_PLAN_ID)
        .await
        .expect("build list");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].label, "potato");
    assert_eq!(entries[0].quantity, 4.0);
    assert_eq!(entries[1].label, "onion");
    assert_eq!(entries[1].quantity, 2.0);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn duplicate_guard_holds_over_pg() {
    let (pool, db_name) = create_test_db().await;
    let store = PgStore::new(pool.clone());

    catalog::register_ingredient(&store, "salt", Unit::Pinch, true)
        .await
        .expect("first registration");

    let err = catalog::register_ingredient(&store, " salt ", Unit::Gram, false)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Duplicate(_)));

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn recipe_export_roundtrips_over_pg() {
    let (pool, db_name) = create_test_db().await;
    let store = PgStore::new(pool.clone());

    catalog::register_ingredient(&store, "potato", Unit::Piece, false)
        .await
        .expect("register potato");
    catalog::register_ingredient(&store, "onion", Unit::Piece, false)
        .await
        .expect("register onion");
    catalog::register_ingredient(&store, "salt", Unit::Pinch, true)
        .await
        .expect("register salt");

    let parsed = parse_recipe_toml(CURRY_TOML).expect("parse recipe TOML");
    let (curry, _) = recipe::create_recipe_from_toml(&store, &parsed)
        .await
        .expect("create recipe");

    // `larder recipe export`.
    let exported = recipe::materialize_recipe(&store, curry.id)
        .await
        .expect("export recipe");
    let reparsed = parse_recipe_toml(&exported).expect("reparse export");
    assert_eq!(reparsed, parsed);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn clear_plan_resets_entries_and_memo_over_pg() {
    let (pool, db_name) = create_test_db().await;
    let store = PgStore::new(pool.clone());

    catalog::register_ingredient(&store, "potato", Unit::Piece, false)
        .await
        .expect("register potato");
    let parsed = parse_recipe_toml(
        r#"
title = "Baked Potato"
category = "side"

[[ingredients]]
ingredient = "potato"
quantity = 1.0
"#,
    )
    .expect("parse recipe TOML");
    let (baked, _) = recipe::create_recipe_from_toml(&store, &parsed)
        .await
        .expect("create recipe");

    menu::set_slot(
        &store,
        PlanKey::new(Day::Fri, Slot::Dinner, Category::Side),
        baked.id,
    )
    .await
    .expect("set slot");
    menu::set_memo(&store, "don't forget butter")
        .await
        .expect("set memo");

    menu::clear_plan(&store).await.expect("clear plan");

    let plan = store
        .get_plan(CURRENT_PLAN_ID)
        .await
        .expect("get plan")
        .expect("plan row exists");
    assert!(plan.entries.0.is_empty());
    assert!(plan.memo.is_empty());

    pool.close().await;
    drop_test_db(&db_name).await;
}
