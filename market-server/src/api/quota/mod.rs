//! Quota API module

use axum::{Json, Router, extract::State, routing::get};

use crate::core::ServerState;
use crate::identity::CurrentUser;
use crate::utils::AppResult;
use shared::models::QuotaStatus;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/quota", get(my_quota))
}

/// GET /api/quota - my listing quota readout
async fn my_quota(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<QuotaStatus>> {
    let status = state.quota.check(user.id()).await?;
    Ok(Json(status))
}
