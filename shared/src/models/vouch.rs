//! Vouch Model
//!
//! A write-once reputation ledger entry. Unique per (from_user, to_user)
//! pair system-wide, not per trade.

use serde::{Deserialize, Serialize};

/// Role the receiver played in the referenced trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum VouchKind {
    Buyer,
    Seller,
}

/// Vouch entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Vouch {
    pub id: i64,
    pub from_user_id: i64,
    pub to_user_id: i64,
    pub trade_id: i64,
    pub kind: VouchKind,
    /// Integer rating in [1, 5]
    pub rating: i64,
    pub message: Option<String>,
    pub created_at: i64,
}

/// Submit vouch payload (rater identity comes from the request context)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VouchCreate {
    pub trade_id: i64,
    pub rating: i64,
    pub message: Option<String>,
}

/// Aggregated reputation for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReputationSummary {
    pub vouch_count: i64,
    /// NULL (None) until the first vouch arrives
    pub average_rating: Option<f64>,
}
