//! Notification API Handlers
//!
//! Everything here is scoped to the authenticated recipient; there is no
//! cross-user read.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::core::ServerState;
use crate::identity::CurrentUser;
use crate::utils::AppResult;
use shared::models::Notification;

/// GET /api/notifications - my notifications, newest first
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = state.notifier.list(user.id()).await?;
    Ok(Json(notifications))
}

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UnreadCountResponse>> {
    let unread = state.notifier.unread_count(user.id()).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.notifier.mark_read(user.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<MarkAllReadResponse>> {
    let updated = state.notifier.mark_all_read(user.id()).await?;
    Ok(Json(MarkAllReadResponse { updated }))
}
