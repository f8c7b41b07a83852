//! Sanity checks for the embedded migrations.

use larder_test_utils::{create_test_db, drop_test_db};

#[tokio::test]
async fn migrations_create_expected_tables() {
    let (pool, db_name) = create_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT tablename::text FROM pg_tables \
         WHERE schemaname = 'public' ORDER BY tablename",
    )
    .fetch_all(&pool)
    .await
    .expect("should list tables");

    let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
    assert!(names.contains(&"ingredients"), "tables: {names:?}");
    assert!(names.contains(&"recipes"), "tables: {names:?}");
    assert!(names.contains(&"weekly_plans"), "tables: {names:?}");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let (pool, db_name) = create_test_db().await;

    // create_test_db already ran them once; a second run must be a no-op.
    larder_db::pool::run_migrations(&pool)
        .await
        .expect("second run should succeed");

    pool.close().await;
    drop_test_db(&db_name).await;
}
