//! Vouch API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::identity::CurrentUser;
use crate::utils::AppResult;
use shared::models::{ReputationSummary, Vouch, VouchCreate};

/// POST /api/vouches - vouch for my counterparty on a completed trade
pub async fn submit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<VouchCreate>,
) -> AppResult<Json<Vouch>> {
    let vouch = state.vouches.submit(user.id(), payload).await?;
    Ok(Json(vouch))
}

/// GET /api/users/{id}/vouches - vouches a user has received
pub async fn list_received(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Vouch>>> {
    let vouches = state.vouches.list_received(id).await?;
    Ok(Json(vouches))
}

/// GET /api/users/{id}/reputation - vouch count and average rating
pub async fn reputation(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ReputationSummary>> {
    let summary = state.vouches.reputation(id).await?;
    Ok(Json(summary))
}
