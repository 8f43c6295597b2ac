//! Listing Service
//!
//! Creation is the quota guard's consumer. Owner status changes cover the
//! self-service transitions only: SOLD belongs to the trade engine and
//! BANNED to moderation, neither is reachable from here.

use shared::models::{Listing, ListingCreate, ListingStatus};
use sqlx::SqlitePool;

use crate::db::repository::listing;
use crate::quota::QuotaGuard;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct ListingService {
    pool: SqlitePool,
    quota: QuotaGuard,
}

impl ListingService {
    pub fn new(pool: SqlitePool, quota: QuotaGuard) -> Self {
        Self { pool, quota }
    }

    pub async fn create(&self, owner_id: i64, data: ListingCreate) -> AppResult<Listing> {
        if data.title.trim().is_empty() {
            return Err(AppError::validation("Listing title must not be empty"));
        }
        if data.price < 0 {
            return Err(AppError::validation("Listing price must not be negative"));
        }
        if data.stock < 1 {
            return Err(AppError::validation("Listing stock must be at least 1"));
        }

        let quota = self.quota.check(owner_id).await?;
        if !quota.allowed {
            return Err(AppError::QuotaExceeded {
                max: quota.max_listings,
                used: quota.used,
            });
        }

        let listing = listing::create(&self.pool, owner_id, data).await?;
        tracing::info!(listing_id = listing.id, owner_id, "Listing created");
        Ok(listing)
    }

    pub async fn get(&self, listing_id: i64) -> AppResult<Listing> {
        listing::find_by_id(&self.pool, listing_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Listing {listing_id}")))
    }

    /// Owner-initiated status change.
    ///
    /// Reachable targets are AVAILABLE, HIDDEN and DELETED; a listing under
    /// review (PENDING) can be hidden or deleted but not force-published.
    pub async fn set_status(
        &self,
        owner_id: i64,
        listing_id: i64,
        status: ListingStatus,
    ) -> AppResult<Listing> {
        let current = self.get(listing_id).await?;
        if current.owner_id != owner_id {
            return Err(AppError::forbidden("Only the owner may change a listing"));
        }

        let target_ok = matches!(
            status,
            ListingStatus::Available | ListingStatus::Hidden | ListingStatus::Deleted
        );
        if !target_ok {
            return Err(AppError::validation(format!(
                "Status {status:?} cannot be set by the owner"
            )));
        }

        match current.status {
            ListingStatus::Available | ListingStatus::Hidden => {}
            ListingStatus::Pending if status != ListingStatus::Available => {}
            _ => {
                return Err(AppError::invalid_state(format!(
                    "Listing {listing_id} cannot change status from {:?}",
                    current.status
                )));
            }
        }

        Ok(listing::set_status(&self.pool, listing_id, status).await?)
    }
}
