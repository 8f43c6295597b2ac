//! Notification Dispatcher
//!
//! Persists in-app notifications and republishes them on a broadcast
//! channel for the realtime delivery layer to pick up. Business flows call
//! [`Notifier::dispatch`] after their own state is committed: a failed
//! notification is logged and dropped, it never fails the operation that
//! triggered it.

use shared::models::{Notification, NotificationKind};
use sqlx::SqlitePool;
use tokio::sync::broadcast;

use crate::db::repository::{notification, user};
use crate::utils::{AppError, AppResult};

const BROADCAST_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct Notifier {
    pool: SqlitePool,
    sender: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(pool: SqlitePool) -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { pool, sender }
    }

    /// Subscribe to the live notification stream
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Create a notification for `user_id`.
    ///
    /// The recipient must exist; the broadcast send is best-effort (no
    /// subscribers is not an error).
    pub async fn notify(
        &self,
        user_id: i64,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
        link: Option<String>,
    ) -> AppResult<Notification> {
        if !user::exists(&self.pool, user_id).await? {
            return Err(AppError::UserNotFound(user_id));
        }
        let created =
            notification::create(&self.pool, user_id, kind, &title.into(), &body.into(), link)
                .await?;
        let _ = self.sender.send(created.clone());
        Ok(created)
    }

    /// Fire-and-forget variant used as a post-commit side effect.
    pub async fn dispatch(
        &self,
        user_id: i64,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
        link: Option<String>,
    ) {
        if let Err(e) = self.notify(user_id, kind, title, body, link).await {
            tracing::warn!(user_id, error = %e, "Notification dispatch failed");
        }
    }

    // ========== Recipient-facing operations ==========

    pub async fn list(&self, user_id: i64) -> AppResult<Vec<Notification>> {
        Ok(notification::list_for_user(&self.pool, user_id).await?)
    }

    pub async fn unread_count(&self, user_id: i64) -> AppResult<i64> {
        Ok(notification::unread_count(&self.pool, user_id).await?)
    }

    pub async fn mark_read(&self, user_id: i64, notification_id: i64) -> AppResult<()> {
        if !notification::mark_read(&self.pool, user_id, notification_id).await? {
            return Err(AppError::not_found(format!(
                "Notification {notification_id}"
            )));
        }
        Ok(())
    }

    /// Returns how many notifications were flipped to read.
    pub async fn mark_all_read(&self, user_id: i64) -> AppResult<u64> {
        Ok(notification::mark_all_read(&self.pool, user_id).await?)
    }
}
