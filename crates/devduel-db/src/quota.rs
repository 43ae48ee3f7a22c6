//! Database operations for the `api_quota` daily counter.
//!
//! The counter is the only mutable state shared across concurrent comparison
//! requests. All writes go through [`try_commit_quota`], a single conditional
//! upsert, so two requests racing past the admission check can never push the
//! counter above the configured daily limit.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `api_quota` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QuotaRow {
    pub day: NaiveDate,
    pub count: i32,
}

/// Returns the current count for `day`, or `0` if no row exists yet.
///
/// The row is created lazily by the first successful commit of the day, so
/// an absent row simply means no runs have completed yet.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_quota_count(pool: &PgPool, day: NaiveDate) -> Result<i32, DbError> {
    let row = sqlx::query_as::<_, QuotaRow>("SELECT day, count FROM api_quota WHERE day = $1")
        .bind(day)
        .fetch_optional(pool)
        .await?;

    Ok(row.map_or(0, |r| r.count))
}

/// Atomically increments the counter for `day` if it is still below `limit`.
///
/// Returns `Some(new_count)` when the increment was applied, `None` when the
/// counter was already at (or above) `limit` — the caller must treat `None`
/// as a quota denial, even post-hoc.
///
/// The increment-if-below-limit is a single statement, so concurrent callers
/// cannot interleave a read and a write: at `count = limit - 1`, exactly one
/// of two racing commits gets the last slot.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn try_commit_quota(
    pool: &PgPool,
    day: NaiveDate,
    limit: i64,
) -> Result<Option<i32>, DbError> {
    let count = sqlx::query_scalar::<_, i32>(
        "INSERT INTO api_quota (day, count) VALUES ($1, 1) \
         ON CONFLICT (day) DO UPDATE \
         SET count = api_quota.count + 1, updated_at = NOW() \
         WHERE api_quota.count < $2 \
         RETURNING count",
    )
    .bind(day)
    .bind(limit)
    .fetch_optional(pool)
    .await?;

    Ok(count)
}
