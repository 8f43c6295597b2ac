//! User Model
//!
//! The core never resolves sessions or credentials; it only needs a stable
//! user row to reference as trade party, vouch endpoint and notification
//! recipient. Rows are written by the identity layer upstream.

use serde::{Deserialize, Serialize};

/// User entity (identity projection)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub created_at: i64,
}

/// Create user payload (fixtures and the identity sync boundary)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub display_name: String,
}
