//! Unified error handling
//!
//! Application-level error type and response envelope:
//! - [`AppError`] - one variant per public failure category
//! - [`AppResponse`] - API error envelope
//!
//! Success responses are plain JSON bodies; the envelope is only used for
//! errors. `code` is a stable machine-readable category string, `data`
//! carries retry information for the categories that have it.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// API error envelope
///
/// ```json
/// {
///   "code": "COOLDOWN_ACTIVE",
///   "message": "Nudge cooldown active",
///   "data": { "canNudgeAgainAt": 1756100000000 }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Identity (401/403) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== Lookup failures (404) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("User {0} not found")]
    UserNotFound(i64),

    #[error("User {viewer_id} has not viewed listing {listing_id}")]
    ViewerNotFound { viewer_id: i64, listing_id: i64 },

    // ========== Lifecycle conflicts (409) ==========
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("An active trade for this buyer and listing already exists")]
    DuplicateActiveTrade,

    #[error("A vouch for this user already exists")]
    DuplicateVouch,

    #[error("Resource already exists: {0}")]
    Conflict(String),

    // ========== Input rejections (400) ==========
    #[error("Rating must be an integer between 1 and 5, got {0}")]
    InvalidRating(i64),

    #[error("Validation failed: {0}")]
    Validation(String),

    // ========== Business rule violations (422) ==========
    #[error("Buyer and seller must be different users")]
    SelfTradeForbidden,

    #[error("Listing unavailable: {0}")]
    ListingUnavailable(String),

    #[error("Trade is not completed")]
    TradeNotCompleted,

    #[error("Listing quota exceeded ({used}/{max})")]
    QuotaExceeded { max: i64, used: i64 },

    // ========== Rate limiting (429) ==========
    #[error("Nudge cooldown active")]
    CooldownActive { can_nudge_again_at: i64 },

    // ========== System errors (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code, message, data) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message, None),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN", message, None),

            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
            AppError::UserNotFound(_) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND", message, None),
            AppError::ViewerNotFound { .. } => {
                (StatusCode::NOT_FOUND, "VIEWER_NOT_FOUND", message, None)
            }

            AppError::InvalidState(_) => (StatusCode::CONFLICT, "INVALID_STATE", message, None),
            AppError::DuplicateActiveTrade => {
                (StatusCode::CONFLICT, "DUPLICATE_ACTIVE_TRADE", message, None)
            }
            AppError::DuplicateVouch => (StatusCode::CONFLICT, "DUPLICATE_VOUCH", message, None),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT", message, None),

            AppError::InvalidRating(_) => (StatusCode::BAD_REQUEST, "INVALID_RATING", message, None),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION", message, None),

            AppError::SelfTradeForbidden => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "SELF_TRADE_FORBIDDEN",
                message,
                None,
            ),
            AppError::ListingUnavailable(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "LISTING_UNAVAILABLE",
                message,
                None,
            ),
            AppError::TradeNotCompleted => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "TRADE_NOT_COMPLETED",
                message,
                None,
            ),
            AppError::QuotaExceeded { max, used } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "QUOTA_EXCEEDED",
                message,
                Some(serde_json::json!({ "max": max, "used": used })),
            ),

            AppError::CooldownActive { can_nudge_again_at } => (
                StatusCode::TOO_MANY_REQUESTS,
                "COOLDOWN_ACTIVE",
                message,
                Some(serde_json::json!({ "canNudgeAgainAt": can_nudge_again_at })),
            ),

            // Details are logged, never surfaced
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(AppResponse {
            code: code.to_string(),
            message,
            data,
        });

        (status, body).into_response()
    }
}

/// Storage errors keep their category; contextual translation (duplicate →
/// DuplicateActiveTrade etc.) happens at the call sites that know the context.
impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Database(msg) => AppError::Database(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
