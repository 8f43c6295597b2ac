//! Trade API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::identity::CurrentUser;
use crate::utils::AppResult;
use shared::models::{Trade, TradeCreate};

/// POST /api/trades - open a trade as the buyer
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<TradeCreate>,
) -> AppResult<Json<Trade>> {
    let trade = state.trades.create(user.id(), payload).await?;
    Ok(Json(trade))
}

/// GET /api/trades - all trades I participate in
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Trade>>> {
    let trades = state.trades.list_for_user(user.id()).await?;
    Ok(Json(trades))
}

/// GET /api/trades/{id} - trade detail (parties only)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Trade>> {
    let trade = state.trades.get(id, user.id()).await?;
    Ok(Json(trade))
}

/// POST /api/trades/{id}/confirm - toggle my confirmation flag
pub async fn confirm(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Trade>> {
    let trade = state.trades.toggle_confirmation(id, user.id()).await?;
    Ok(Json(trade))
}

/// POST /api/trades/{id}/cancel - cancel a pending trade
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Trade>> {
    let trade = state.trades.cancel(id, user.id()).await?;
    Ok(Json(trade))
}
