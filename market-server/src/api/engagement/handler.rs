//! Engagement API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::identity::CurrentUser;
use crate::utils::AppResult;
use shared::models::{ListingViewer, NudgeReceipt, NudgeRequest};

/// POST /api/listings/{id}/view - leave a view footprint
pub async fn record_view(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.engagement.record_view(user.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/listings/{id}/viewers - who viewed my listing (owner only)
pub async fn list_viewers(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<ListingViewer>>> {
    let viewers = state.engagement.list_viewers(user.id(), id).await?;
    Ok(Json(viewers))
}

/// POST /api/listings/{id}/nudge - nudge a viewer (owner only, cooldown)
pub async fn nudge(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<NudgeRequest>,
) -> AppResult<Json<NudgeReceipt>> {
    let receipt = state
        .engagement
        .nudge(user.id(), id, payload.viewer_id)
        .await?;
    Ok(Json(receipt))
}
