//! Engagement API module
//!
//! Lives under the listing prefix: views, the owner's viewer panel, nudges.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/listings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}/view", post(handler::record_view))
        .route("/{id}/viewers", get(handler::list_viewers))
        .route("/{id}/nudge", post(handler::nudge))
}
