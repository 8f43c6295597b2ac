//! Subscription Model
//!
//! Read-only from the core's perspective: billing writes the rows, a
//! periodic sweep downgrades lapsed tiers. A missing row means FREE.

use serde::{Deserialize, Serialize};

/// Subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SubscriptionTier {
    Free,
    Pro,
    Elite,
}

impl SubscriptionTier {
    /// Tier name as stored in the database and in settings keys
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "FREE",
            SubscriptionTier::Pro => "PRO",
            SubscriptionTier::Elite => "ELITE",
        }
    }
}

/// Subscription entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Subscription {
    pub user_id: i64,
    pub tier: SubscriptionTier,
    /// None = does not lapse (lifetime / FREE)
    pub expires_at: Option<i64>,
    pub updated_at: i64,
}

/// Quota check result for display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    pub tier: SubscriptionTier,
    pub max_listings: i64,
    pub used: i64,
    pub remaining: i64,
    pub allowed: bool,
}
