//! Listing Repository

use super::{RepoError, RepoResult};
use shared::models::{Listing, ListingCreate, ListingStatus};
use sqlx::SqlitePool;

const LISTING_SELECT: &str =
    "SELECT id, owner_id, title, status, price, stock, created_at, updated_at FROM listing";

pub async fn create(pool: &SqlitePool, owner_id: i64, data: ListingCreate) -> RepoResult<Listing> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO listing (id, owner_id, title, status, price, stock, created_at, updated_at) VALUES (?1, ?2, ?3, 'AVAILABLE', ?4, ?5, ?6, ?6)",
    )
    .bind(id)
    .bind(owner_id)
    .bind(&data.title)
    .bind(data.price)
    .bind(data.stock)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create listing".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Listing>> {
    let sql = format!("{LISTING_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Listing>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// AVAILABLE listings count one quota slot each
pub async fn count_active_for_owner(pool: &SqlitePool, owner_id: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM listing WHERE owner_id = ? AND status = 'AVAILABLE'",
    )
    .bind(owner_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn set_status(pool: &SqlitePool, id: i64, status: ListingStatus) -> RepoResult<Listing> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE listing SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Listing {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Listing {id} not found")))
}

/// Guarded SOLD claim, run inside the trade-completion transaction.
///
/// Returns false when the listing can no longer be sold (already SOLD,
/// BANNED or DELETED); the caller rolls back and rejects.
pub async fn claim_sold(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    listing_id: i64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE listing SET status = 'SOLD', updated_at = ?1 WHERE id = ?2 AND status NOT IN ('SOLD', 'BANNED', 'DELETED')",
    )
    .bind(now)
    .bind(listing_id)
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected() > 0)
}
