//! Vouch Repository

use super::{RepoError, RepoResult};
use shared::models::{ReputationSummary, Vouch, VouchKind};
use sqlx::SqlitePool;

const VOUCH_SELECT: &str = "SELECT id, from_user_id, to_user_id, trade_id, kind, rating, message, created_at FROM vouch";

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &SqlitePool,
    from_user_id: i64,
    to_user_id: i64,
    trade_id: i64,
    kind: VouchKind,
    rating: i64,
    message: Option<String>,
) -> RepoResult<Vouch> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    // UNIQUE (from_user_id, to_user_id) makes the ledger write-once per
    // pair; surfaces as RepoError::Duplicate.
    sqlx::query(
        "INSERT INTO vouch (id, from_user_id, to_user_id, trade_id, kind, rating, message, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(id)
    .bind(from_user_id)
    .bind(to_user_id)
    .bind(trade_id)
    .bind(kind)
    .bind(rating)
    .bind(&message)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create vouch".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Vouch>> {
    let sql = format!("{VOUCH_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Vouch>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list_received(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Vouch>> {
    let sql = format!("{VOUCH_SELECT} WHERE to_user_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Vouch>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn reputation(pool: &SqlitePool, user_id: i64) -> RepoResult<ReputationSummary> {
    let summary = sqlx::query_as::<_, ReputationSummary>(
        "SELECT COUNT(*) AS vouch_count, AVG(rating) AS average_rating FROM vouch WHERE to_user_id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(summary)
}
