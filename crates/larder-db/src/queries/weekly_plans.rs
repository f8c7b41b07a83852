//! Database query functions for the `weekly_plans` table.
//!
//! The plan is a single document row. Writes are full-document upserts with
//! last-write-wins semantics: there is no optimistic concurrency, matching
//! the document store this table replaces.

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::types::Json;

use crate::models::WeeklyPlan;

/// Fetch a plan document by its ID.
pub async fn get_plan(pool: &PgPool, id: &str) -> Result<Option<WeeklyPlan>> {
    let plan = sqlx::query_as::<_, WeeklyPlan>("SELECT * FROM weekly_plans WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch weekly plan")?;

    Ok(plan)
}

/// Write a plan document wholesale (entries and memo), inserting the row if
/// it does not exist yet. Returns the stored plan.
pub async fn save_plan(pool: &PgPool, plan: &WeeklyPlan) -> Result<WeeklyPlan> {
    let stored = sqlx::query_as::<_, WeeklyPlan>(
        "INSERT INTO weekly_plans (id, entries, memo, updated_at) \
         VALUES ($1, $2, $3, now()) \
         ON CONFLICT (id) DO UPDATE \
         SET entries = EXCLUDED.entries, memo = EXCLUDED.memo, updated_at = now() \
         RETURNING *",
    )
    .bind(&plan.id)
    .bind(Json(&plan.entries.0))
    .bind(&plan.memo)
    .fetch_one(pool)
    .await
    .context("failed to save weekly plan")?;

    Ok(stored)
}

/// Overwrite only the memo field of a plan document, creating the row with
/// empty entries if it does not exist yet.
pub async fn update_memo(pool: &PgPool, id: &str, memo: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO weekly_plans (id, memo, updated_at) \
         VALUES ($1, $2, now()) \
         ON CONFLICT (id) DO UPDATE \
         SET memo = EXCLUDED.memo, updated_at = now()",
    )
    .bind(id)
    .bind(memo)
    .execute(pool)
    .await
    .context("failed to update plan memo")?;

    Ok(())
}
