//! Reputation Engine
//!
//! Vouches are write-once reputation entries, gated on a COMPLETED trade
//! between the two users. The (from, to) pair is unique system-wide: a
//! second completed trade between the same pair does not grant a second
//! vouch slot.

use shared::models::{NotificationKind, ReputationSummary, Vouch, VouchCreate, VouchKind};
use sqlx::SqlitePool;

use crate::db::repository::{RepoError, trade, vouch};
use crate::notify::Notifier;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct VouchService {
    pool: SqlitePool,
    notifier: Notifier,
}

impl VouchService {
    pub fn new(pool: SqlitePool, notifier: Notifier) -> Self {
        Self { pool, notifier }
    }

    /// Record a vouch from `from_user_id` for their counterparty on a
    /// completed trade.
    ///
    /// `kind` is derived, never supplied: it names the role the RECEIVER
    /// played in the trade.
    pub async fn submit(&self, from_user_id: i64, data: VouchCreate) -> AppResult<Vouch> {
        if !(1..=5).contains(&data.rating) {
            return Err(AppError::InvalidRating(data.rating));
        }

        let trade = trade::find_by_id(&self.pool, data.trade_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Trade {}", data.trade_id)))?;
        if !trade.is_party(from_user_id) {
            return Err(AppError::forbidden("Not a party to this trade"));
        }
        if trade.status != shared::models::TradeStatus::Completed {
            return Err(AppError::TradeNotCompleted);
        }

        let to_user_id = trade.counterparty(from_user_id);
        let kind = if to_user_id == trade.seller_id {
            VouchKind::Seller
        } else {
            VouchKind::Buyer
        };

        let created = match vouch::create(
            &self.pool,
            from_user_id,
            to_user_id,
            trade.id,
            kind,
            data.rating,
            data.message,
        )
        .await
        {
            Ok(v) => v,
            Err(RepoError::Duplicate(_)) => return Err(AppError::DuplicateVouch),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            vouch_id = created.id,
            from_user_id,
            to_user_id,
            rating = created.rating,
            "Vouch recorded"
        );

        self.notifier
            .dispatch(
                to_user_id,
                NotificationKind::System,
                "New vouch received",
                format!("You received a {}-star vouch", created.rating),
                Some(format!("/users/{to_user_id}/vouches")),
            )
            .await;

        Ok(created)
    }

    pub async fn list_received(&self, user_id: i64) -> AppResult<Vec<Vouch>> {
        Ok(vouch::list_received(&self.pool, user_id).await?)
    }

    /// Count + average rating; average is None until the first vouch
    pub async fn reputation(&self, user_id: i64) -> AppResult<ReputationSummary> {
        Ok(vouch::reputation(&self.pool, user_id).await?)
    }
}
