//! Listing Model

use serde::{Deserialize, Serialize};

/// Listing availability status
///
/// `Sold` is only ever set by the trade engine as the side effect of a trade
/// completing, and is never reversed automatically. `Banned` is a moderation
/// state written outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ListingStatus {
    Available,
    Hidden,
    Pending,
    Sold,
    Banned,
    Deleted,
}

/// Listing entity: a sellable unit (item or currency)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Listing {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub status: ListingStatus,
    /// Price in minor units (cents / credits)
    pub price: i64,
    pub stock: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create listing payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingCreate {
    pub title: String,
    pub price: i64,
    #[serde(default = "default_stock")]
    pub stock: i64,
}

fn default_stock() -> i64 {
    1
}

/// Owner-initiated status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingStatusUpdate {
    pub status: ListingStatus,
}
