//! Viewer Interest Models
//!
//! One row per (viewer, listing) pair. `viewed_at` is refreshed on every
//! visit; `last_nudged_at` drives the owner-side nudge cooldown.

use serde::{Deserialize, Serialize};

/// View record entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ListingView {
    pub viewer_id: i64,
    pub listing_id: i64,
    pub viewed_at: i64,
    pub last_nudged_at: Option<i64>,
}

/// Viewer entry for the owner's "who viewed this" panel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ListingViewer {
    pub viewer_id: i64,
    pub username: String,
    pub display_name: String,
    pub viewed_at: i64,
    pub last_nudged_at: Option<i64>,
}

/// Successful nudge receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NudgeReceipt {
    pub viewer_id: i64,
    pub listing_id: i64,
    pub nudged_at: i64,
    /// When the same viewer may be nudged again for this listing
    pub next_allowed_at: i64,
}

/// Nudge request payload (owner identity comes from the request context)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NudgeRequest {
    pub viewer_id: i64,
}
