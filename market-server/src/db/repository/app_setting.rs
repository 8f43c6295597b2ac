//! App Setting Repository

use super::RepoResult;
use shared::models::AppSetting;
use sqlx::SqlitePool;

pub async fn get(pool: &SqlitePool, key: &str) -> RepoResult<Option<AppSetting>> {
    let row = sqlx::query_as::<_, AppSetting>(
        "SELECT key, value, updated_at FROM app_setting WHERE key = ?",
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn set(pool: &SqlitePool, key: &str, value: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO app_setting (key, value, updated_at) VALUES (?1, ?2, ?3) ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}
