//! Subscription Repository
//!
//! The quota guard only reads here. Writes come from the billing boundary
//! (and test fixtures); lapsed rows are downgraded by an external sweep,
//! never by this service.

use super::RepoResult;
use shared::models::{Subscription, SubscriptionTier};
use sqlx::SqlitePool;

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Option<Subscription>> {
    let row = sqlx::query_as::<_, Subscription>(
        "SELECT user_id, tier, expires_at, updated_at FROM subscription WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn upsert(
    pool: &SqlitePool,
    user_id: i64,
    tier: SubscriptionTier,
    expires_at: Option<i64>,
) -> RepoResult<Subscription> {
    let now = shared::util::now_millis();
    let row = sqlx::query_as::<_, Subscription>(
        "INSERT INTO subscription (user_id, tier, expires_at, updated_at) VALUES (?1, ?2, ?3, ?4) ON CONFLICT(user_id) DO UPDATE SET tier = excluded.tier, expires_at = excluded.expires_at, updated_at = excluded.updated_at RETURNING user_id, tier, expires_at, updated_at",
    )
    .bind(user_id)
    .bind(tier)
    .bind(expires_at)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
