//! TradeEngine - Trade lifecycle and completion atomicity
//!
//! This module handles:
//! - Trade creation against an AVAILABLE listing
//! - The dual confirmation toggle (buyer + seller, either order)
//! - Atomic completion when both confirmations hold
//! - Cancellation while PENDING
//! - Post-commit notification fan-out
//!
//! # Completion Flow
//!
//! ```text
//! toggle_confirmation(trade_id, acting_user)
//!     ├─ 1. Load trade, check the actor is a party     (plain read, no tx)
//!     ├─ 2. BEGIN
//!     ├─ 3. Flip the actor's flag WHERE status=PENDING (takes the write
//!     │       lock, RETURNING both flags)
//!     ├─ 4. Both flags set?
//!     │       ├─ claim listing SOLD   (guarded; miss → ROLLBACK, reject)
//!     │       └─ claim trade COMPLETED (guarded)
//!     ├─ 5. COMMIT
//!     └─ 6. Notify: completion → both parties, plain toggle → counterparty
//! ```
//!
//! Every status write re-checks its preconditions in the WHERE clause, so
//! two racing togglers serialize on the flip in step 3 and only one of them
//! can see the second flag come up: COMPLETED and the listing's SOLD flip
//! happen exactly once per trade.

use shared::models::{ListingStatus, Notification, NotificationKind, Trade, TradeCreate};
use sqlx::SqlitePool;
use tokio::sync::broadcast;

use crate::db::repository::{RepoError, listing, trade};
use crate::notify::Notifier;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct TradeEngine {
    pool: SqlitePool,
    notifier: Notifier,
}

impl TradeEngine {
    pub fn new(pool: SqlitePool, notifier: Notifier) -> Self {
        Self { pool, notifier }
    }

    /// Subscribe to the live notification stream fed by this engine
    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    /// Open a PENDING trade for `buyer_id` on a listing.
    ///
    /// The price is the out-of-band agreed amount, not necessarily the
    /// listing's asking price. A second live trade for the same
    /// (buyer, listing) pair is rejected by the storage-level unique index,
    /// not by a lookup that could race.
    pub async fn create(&self, buyer_id: i64, data: TradeCreate) -> AppResult<Trade> {
        if data.price < 0 {
            return Err(AppError::validation("Trade price must not be negative"));
        }

        let listing = listing::find_by_id(&self.pool, data.listing_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Listing {}", data.listing_id)))?;

        if listing.owner_id == buyer_id {
            return Err(AppError::SelfTradeForbidden);
        }
        if listing.status != ListingStatus::Available {
            return Err(AppError::ListingUnavailable(format!(
                "Listing {} is {:?}",
                listing.id, listing.status
            )));
        }

        let created =
            match trade::create(&self.pool, buyer_id, listing.owner_id, listing.id, data.price)
                .await
            {
                Ok(t) => t,
                Err(RepoError::Duplicate(_)) => return Err(AppError::DuplicateActiveTrade),
                Err(e) => return Err(e.into()),
            };

        tracing::info!(
            trade_id = created.id,
            buyer_id,
            seller_id = created.seller_id,
            listing_id = created.listing_id,
            "Trade created"
        );

        self.notifier
            .dispatch(
                created.seller_id,
                NotificationKind::OrderNew,
                "New trade request",
                format!("A buyer wants to trade for \"{}\"", listing.title),
                Some(format!("/trades/{}", created.id)),
            )
            .await;

        Ok(created)
    }

    /// Flip the acting party's confirmation flag; complete the trade when
    /// both flags hold afterwards.
    ///
    /// Toggle semantics: confirming a second time withdraws the
    /// confirmation, as long as the trade is still PENDING.
    pub async fn toggle_confirmation(&self, trade_id: i64, acting_user_id: i64) -> AppResult<Trade> {
        // Party membership never changes after creation, so authorization
        // can stay outside the write transaction.
        let before = trade::find_by_id(&self.pool, trade_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Trade {trade_id}")))?;
        if !before.is_party(acting_user_id) {
            return Err(AppError::forbidden(
                "Only the buyer or seller may confirm a trade",
            ));
        }
        let is_buyer = acting_user_id == before.buyer_id;
        let now = shared::util::now_millis();

        let mut tx = self.pool.begin().await?;

        // First statement of the transaction is the flip itself: it takes
        // the write lock before anything is read inside the tx.
        let Some((buyer_confirmed, seller_confirmed)) =
            trade::flip_confirmation(&mut tx, trade_id, is_buyer, now).await?
        else {
            return Err(AppError::invalid_state(format!(
                "Trade {trade_id} is no longer pending"
            )));
        };

        let completed = buyer_confirmed && seller_confirmed;
        if completed {
            if !listing::claim_sold(&mut tx, before.listing_id, now).await? {
                // Listing was banned/deleted under us; dropping the tx also
                // rolls the flip back.
                return Err(AppError::ListingUnavailable(format!(
                    "Listing {} can no longer be sold",
                    before.listing_id
                )));
            }
            if !trade::claim_completed(&mut tx, trade_id, now).await? {
                return Err(AppError::internal(format!(
                    "Completion claim lost for trade {trade_id} inside its own transaction"
                )));
            }
        }

        tx.commit().await?;

        let after = trade::find_by_id(&self.pool, trade_id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Trade {trade_id} vanished after commit")))?;

        if completed {
            tracing::info!(
                trade_id,
                listing_id = after.listing_id,
                "Trade completed, listing sold"
            );
            let link = Some(format!("/trades/{trade_id}"));
            self.notifier
                .dispatch(
                    after.buyer_id,
                    NotificationKind::OrderUpdate,
                    "Trade completed",
                    format!("Trade {trade_id} is complete. You can now vouch for the seller."),
                    link.clone(),
                )
                .await;
            self.notifier
                .dispatch(
                    after.seller_id,
                    NotificationKind::OrderUpdate,
                    "Trade completed",
                    format!("Trade {trade_id} is complete. You can now vouch for the buyer."),
                    link,
                )
                .await;
        } else {
            let confirmed_now = if is_buyer {
                buyer_confirmed
            } else {
                seller_confirmed
            };
            let body = if confirmed_now {
                format!("Your counterparty confirmed trade {trade_id}")
            } else {
                format!("Your counterparty withdrew their confirmation of trade {trade_id}")
            };
            self.notifier
                .dispatch(
                    after.counterparty(acting_user_id),
                    NotificationKind::OrderUpdate,
                    "Trade updated",
                    body,
                    Some(format!("/trades/{trade_id}")),
                )
                .await;
        }

        Ok(after)
    }

    /// Cancel a PENDING trade. Terminal; the pair may trade again later.
    pub async fn cancel(&self, trade_id: i64, acting_user_id: i64) -> AppResult<Trade> {
        let before = trade::find_by_id(&self.pool, trade_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Trade {trade_id}")))?;
        if !before.is_party(acting_user_id) {
            return Err(AppError::forbidden(
                "Only the buyer or seller may cancel a trade",
            ));
        }

        let now = shared::util::now_millis();
        if !trade::claim_cancelled(&self.pool, trade_id, now).await? {
            return Err(AppError::invalid_state(format!(
                "Trade {trade_id} is not pending"
            )));
        }

        let after = trade::find_by_id(&self.pool, trade_id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Trade {trade_id} vanished after cancel")))?;

        tracing::info!(trade_id, acting_user_id, "Trade cancelled");

        self.notifier
            .dispatch(
                after.counterparty(acting_user_id),
                NotificationKind::OrderUpdate,
                "Trade cancelled",
                format!("Trade {trade_id} was cancelled by the other party"),
                Some(format!("/trades/{trade_id}")),
            )
            .await;

        Ok(after)
    }

    /// Trade detail, parties only
    pub async fn get(&self, trade_id: i64, acting_user_id: i64) -> AppResult<Trade> {
        let found = trade::find_by_id(&self.pool, trade_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Trade {trade_id}")))?;
        if !found.is_party(acting_user_id) {
            return Err(AppError::forbidden("Not a party to this trade"));
        }
        Ok(found)
    }

    /// All trades the user participates in, most recent first
    pub async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<Trade>> {
        Ok(trade::list_for_user(&self.pool, user_id).await?)
    }
}

#[cfg(test)]
mod tests;
