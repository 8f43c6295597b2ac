//! Vouch API module
//!
//! Mounts both the submission endpoint and the per-user reputation reads.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/vouches", vouch_routes())
        .nest("/api/users", user_routes())
}

fn vouch_routes() -> Router<ServerState> {
    Router::new().route("/", post(handler::submit))
}

fn user_routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}/vouches", get(handler::list_received))
        .route("/{id}/reputation", get(handler::reputation))
}
