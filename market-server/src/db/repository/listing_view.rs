//! Listing View Repository
//!
//! The nudge cooldown is enforced here as a conditional claim UPDATE:
//! whichever request matches the WHERE clause first owns the nudge, every
//! other concurrent request sees zero rows. No read-modify-write window.

use super::RepoResult;
use shared::models::{ListingView, ListingViewer};
use sqlx::SqlitePool;

/// Record (or refresh) a view. Idempotent per (viewer, listing) pair.
pub async fn upsert_view(
    pool: &SqlitePool,
    viewer_id: i64,
    listing_id: i64,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO listing_view (viewer_id, listing_id, viewed_at) VALUES (?1, ?2, ?3) ON CONFLICT(viewer_id, listing_id) DO UPDATE SET viewed_at = excluded.viewed_at",
    )
    .bind(viewer_id)
    .bind(listing_id)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find(
    pool: &SqlitePool,
    viewer_id: i64,
    listing_id: i64,
) -> RepoResult<Option<ListingView>> {
    let row = sqlx::query_as::<_, ListingView>(
        "SELECT viewer_id, listing_id, viewed_at, last_nudged_at FROM listing_view WHERE viewer_id = ?1 AND listing_id = ?2",
    )
    .bind(viewer_id)
    .bind(listing_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Claim the nudge slot if the cooldown window has passed.
///
/// Returns false when a nudge inside the window already holds the slot.
pub async fn claim_nudge(
    pool: &SqlitePool,
    viewer_id: i64,
    listing_id: i64,
    now: i64,
    cooldown_ms: i64,
) -> RepoResult<bool> {
    let threshold = now - cooldown_ms;
    let rows = sqlx::query(
        "UPDATE listing_view SET last_nudged_at = ?1 WHERE viewer_id = ?2 AND listing_id = ?3 AND (last_nudged_at IS NULL OR last_nudged_at <= ?4)",
    )
    .bind(now)
    .bind(viewer_id)
    .bind(listing_id)
    .bind(threshold)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn list_for_listing(pool: &SqlitePool, listing_id: i64) -> RepoResult<Vec<ListingViewer>> {
    let rows = sqlx::query_as::<_, ListingViewer>(
        "SELECT v.viewer_id, u.username, u.display_name, v.viewed_at, v.last_nudged_at FROM listing_view v JOIN user u ON v.viewer_id = u.id WHERE v.listing_id = ? ORDER BY v.viewed_at DESC",
    )
    .bind(listing_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
