//! Trade Repository
//!
//! All lifecycle writes are guarded UPDATEs: the current status is part of
//! the WHERE clause, so a row that moved on concurrently simply matches
//! nothing and the caller sees `false` / `None` instead of a lost update.

use super::{RepoError, RepoResult};
use shared::models::Trade;
use sqlx::SqlitePool;

const TRADE_SELECT: &str = "SELECT id, buyer_id, seller_id, listing_id, price, status, buyer_confirmed, seller_confirmed, created_at, updated_at, completed_at, cancelled_at FROM trade";

pub async fn create(
    pool: &SqlitePool,
    buyer_id: i64,
    seller_id: i64,
    listing_id: i64,
    price: i64,
) -> RepoResult<Trade> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    // The partial unique index on (buyer_id, listing_id) rejects a second
    // live trade for the pair; surfaces as RepoError::Duplicate.
    sqlx::query(
        "INSERT INTO trade (id, buyer_id, seller_id, listing_id, price, status, buyer_confirmed, seller_confirmed, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 'PENDING', 0, 0, ?6, ?6)",
    )
    .bind(id)
    .bind(buyer_id)
    .bind(seller_id)
    .bind(listing_id)
    .bind(price)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create trade".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Trade>> {
    let sql = format!("{TRADE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Trade>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Trade>> {
    let sql = format!("{TRADE_SELECT} WHERE buyer_id = ?1 OR seller_id = ?1 ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Trade>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Flip one party's confirmation flag while the trade is still PENDING.
///
/// First statement of the completion transaction: the UPDATE takes the
/// write lock before anything is read, so the returned flag pair is the
/// serialized truth. `None` means the trade left PENDING concurrently
/// (or never existed).
pub async fn flip_confirmation(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    trade_id: i64,
    is_buyer: bool,
    now: i64,
) -> RepoResult<Option<(bool, bool)>> {
    let column = if is_buyer {
        "buyer_confirmed"
    } else {
        "seller_confirmed"
    };
    let sql = format!(
        "UPDATE trade SET {column} = NOT {column}, updated_at = ?1 WHERE id = ?2 AND status = 'PENDING' RETURNING buyer_confirmed, seller_confirmed"
    );
    let flags = sqlx::query_as::<_, (bool, bool)>(&sql)
        .bind(now)
        .bind(trade_id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(flags)
}

/// Promote to COMPLETED; only possible while PENDING with both flags set.
pub async fn claim_completed(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    trade_id: i64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE trade SET status = 'COMPLETED', completed_at = ?1, updated_at = ?1 WHERE id = ?2 AND status = 'PENDING' AND buyer_confirmed = 1 AND seller_confirmed = 1",
    )
    .bind(now)
    .bind(trade_id)
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Move to CANCELLED; only possible while PENDING. Single-statement, needs
/// no enclosing transaction.
pub async fn claim_cancelled(pool: &SqlitePool, trade_id: i64, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE trade SET status = 'CANCELLED', cancelled_at = ?1, updated_at = ?1 WHERE id = ?2 AND status = 'PENDING'",
    )
    .bind(now)
    .bind(trade_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
