//! Trade Model
//!
//! A trade records a proposed exchange between a buyer and the owner of a
//! listing. `Pending` is the only non-terminal state; the two confirmation
//! flags are independent boolean sub-state underneath it.

use serde::{Deserialize, Serialize};

/// Trade lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TradeStatus {
    Pending,
    Completed,
    Cancelled,
}

impl TradeStatus {
    /// Completed and Cancelled are terminal: no further mutation
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TradeStatus::Pending)
    }
}

/// Trade entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Trade {
    pub id: i64,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub listing_id: i64,
    /// Agreed price in minor units; negotiated in chat, may differ from the
    /// listing's asking price
    pub price: i64,
    pub status: TradeStatus,
    pub buyer_confirmed: bool,
    pub seller_confirmed: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub completed_at: Option<i64>,
    pub cancelled_at: Option<i64>,
}

impl Trade {
    /// Whether `user_id` is one of the two counterparties
    pub fn is_party(&self, user_id: i64) -> bool {
        self.buyer_id == user_id || self.seller_id == user_id
    }

    /// The other party relative to `user_id` (caller must be a party)
    pub fn counterparty(&self, user_id: i64) -> i64 {
        if self.buyer_id == user_id {
            self.seller_id
        } else {
            self.buyer_id
        }
    }
}

/// Create trade payload (buyer identity comes from the request context)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeCreate {
    pub listing_id: i64,
    pub price: i64,
}
