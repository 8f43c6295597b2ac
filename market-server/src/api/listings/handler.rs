//! Listing API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::identity::CurrentUser;
use crate::utils::AppResult;
use shared::models::{Listing, ListingCreate, ListingStatusUpdate};

/// POST /api/listings - create a listing (quota-guarded)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ListingCreate>,
) -> AppResult<Json<Listing>> {
    let listing = state.listings.create(user.id(), payload).await?;
    Ok(Json(listing))
}

/// GET /api/listings/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Listing>> {
    let listing = state.listings.get(id).await?;
    Ok(Json(listing))
}

/// PUT /api/listings/{id}/status - owner status change
pub async fn set_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ListingStatusUpdate>,
) -> AppResult<Json<Listing>> {
    let listing = state.listings.set_status(user.id(), id, payload.status).await?;
    Ok(Json(listing))
}
