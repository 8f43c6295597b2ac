//! Notification Repository

use super::{RepoError, RepoResult};
use shared::models::{Notification, NotificationKind};
use sqlx::SqlitePool;

const NOTIFICATION_SELECT: &str =
    "SELECT id, user_id, kind, title, body, link, is_read, created_at FROM notification";

pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    kind: NotificationKind,
    title: &str,
    body: &str,
    link: Option<String>,
) -> RepoResult<Notification> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO notification (id, user_id, kind, title, body, link, is_read, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
    )
    .bind(id)
    .bind(user_id)
    .bind(kind)
    .bind(title)
    .bind(body)
    .bind(&link)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create notification".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Notification>> {
    let sql = format!("{NOTIFICATION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Notification>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Notification>> {
    let sql = format!("{NOTIFICATION_SELECT} WHERE user_id = ? ORDER BY created_at DESC LIMIT 100");
    let rows = sqlx::query_as::<_, Notification>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn unread_count(pool: &SqlitePool, user_id: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notification WHERE user_id = ? AND is_read = 0",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Scoped to the recipient: marking someone else's notification matches
/// nothing. Idempotent for already-read rows.
pub async fn mark_read(pool: &SqlitePool, user_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE notification SET is_read = 1 WHERE id = ?1 AND user_id = ?2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn mark_all_read(pool: &SqlitePool, user_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE notification SET is_read = 1 WHERE user_id = ? AND is_read = 0")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
