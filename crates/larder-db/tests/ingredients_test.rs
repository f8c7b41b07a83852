//! CRUD tests for the `ingredients` table.

use larder_db::models::Unit;
use larder_db::queries::ingredients::{
    NewIngredient, delete_ingredient, get_ingredient, insert_ingredient, list_ingredients,
};
use larder_test_utils::{create_test_db, drop_test_db};

fn new_ingredient(name: &str, unit: Unit, exclude: bool) -> NewIngredient {
    NewIngredient {
        name: name.to_string(),
        unit,
        exclude_from_list: exclude,
    }
}

#[tokio::test]
async fn insert_and_get_ingredient() {
    let (pool, db_name) = create_test_db().await;

    let inserted = insert_ingredient(&pool, &new_ingredient("potato", Unit::Piece, false))
        .await
        .expect("insert should succeed");
    assert_eq!(inserted.name, "potato");
    assert_eq!(inserted.unit, Unit::Piece);
    assert!(!inserted.exclude_from_list);

    let fetched = get_ingredient(&pool, inserted.id)
        .await
        .expect("get should succeed")
        .expect("ingredient should exist");
    assert_eq!(fetched.id, inserted.id);
    assert_eq!(fetched.unit, Unit::Piece);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn get_missing_ingredient_returns_none() {
    let (pool, db_name) = create_test_db().await;

    let fetched = get_ingredient(&pool, uuid::Uuid::new_v4())
        .await
        .expect("get should succeed");
    assert!(fetched.is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn list_preserves_registration_order() {
    let (pool, db_name) = create_test_db().await;

    for name in ["zucchini", "apple", "miso"] {
        insert_ingredient(&pool, &new_ingredient(name, Unit::Gram, false))
            .await
            .expect("insert should succeed");
    }

    let all = list_ingredients(&pool).await.expect("list should succeed");
    let names: Vec<&str> = all.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["zucchini", "apple", "miso"]);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn delete_ingredient_by_id() {
    let (pool, db_name) = create_test_db().await;

    let inserted = insert_ingredient(&pool, &new_ingredient("salt", Unit::Pinch, true))
        .await
        .expect("insert should succeed");

    let deleted = delete_ingredient(&pool, inserted.id)
        .await
        .expect("delete should succeed");
    assert!(deleted);

    let fetched = get_ingredient(&pool, inserted.id)
        .await
        .expect("get should succeed");
    assert!(fetched.is_none());

    // Second delete is a no-op.
    let deleted_again = delete_ingredient(&pool, inserted.id)
        .await
        .expect("delete should succeed");
    assert!(!deleted_again);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn duplicate_names_are_allowed_at_the_table_level() {
    // Uniqueness is enforced by the catalog service, not the schema; two
    // racing sessions can both insert. The table must accept that.
    let (pool, db_name) = create_test_db().await;

    insert_ingredient(&pool, &new_ingredient("onion", Unit::Piece, false))
        .await
        .expect("first insert should succeed");
    insert_ingredient(&pool, &new_ingredient("onion", Unit::Piece, false))
        .await
        .expect("second insert should also succeed");

    let all = list_ingredients(&pool).await.expect("list should succeed");
    assert_eq!(all.iter().filter(|i| i.name == "onion").count(), 2);

    pool.close().await;
    drop_test_db(&db_name).await;
}
