//! Viewer Interest & Nudge Limiter
//!
//! Viewers leave a (viewer, listing) footprint; owners can nudge a viewer
//! at most once per cooldown window per listing. The window is claimed by
//! a conditional UPDATE, so two concurrent nudges for the same pair can
//! never both go through.

use shared::models::{ListingViewer, NotificationKind, NudgeReceipt};
use sqlx::SqlitePool;

use crate::db::repository::{listing, listing_view, user};
use crate::notify::Notifier;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct EngagementService {
    pool: SqlitePool,
    notifier: Notifier,
    nudge_cooldown_ms: i64,
}

impl EngagementService {
    pub fn new(pool: SqlitePool, notifier: Notifier, nudge_cooldown_ms: i64) -> Self {
        Self {
            pool,
            notifier,
            nudge_cooldown_ms,
        }
    }

    /// Record that `viewer_id` looked at a listing. Idempotent; repeat
    /// visits refresh `viewed_at`.
    pub async fn record_view(&self, viewer_id: i64, listing_id: i64) -> AppResult<()> {
        if listing::find_by_id(&self.pool, listing_id).await?.is_none() {
            return Err(AppError::not_found(format!("Listing {listing_id}")));
        }
        if !user::exists(&self.pool, viewer_id).await? {
            return Err(AppError::UserNotFound(viewer_id));
        }
        let now = shared::util::now_millis();
        listing_view::upsert_view(&self.pool, viewer_id, listing_id, now).await?;
        Ok(())
    }

    /// Nudge a past viewer of one of the owner's listings.
    ///
    /// At most one nudge per (viewer, listing) pair per cooldown window;
    /// inside the window the caller gets `CooldownActive` with the earliest
    /// time a retry can succeed.
    pub async fn nudge(
        &self,
        owner_id: i64,
        listing_id: i64,
        viewer_id: i64,
    ) -> AppResult<NudgeReceipt> {
        let listing = listing::find_by_id(&self.pool, listing_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Listing {listing_id}")))?;
        if listing.owner_id != owner_id {
            return Err(AppError::forbidden("Only the owner may nudge viewers"));
        }
        if viewer_id == owner_id {
            return Err(AppError::validation("Owners cannot nudge themselves"));
        }
        if listing_view::find(&self.pool, viewer_id, listing_id)
            .await?
            .is_none()
        {
            return Err(AppError::ViewerNotFound {
                viewer_id,
                listing_id,
            });
        }

        let now = shared::util::now_millis();
        if !listing_view::claim_nudge(&self.pool, viewer_id, listing_id, now, self.nudge_cooldown_ms)
            .await?
        {
            // Claim lost to a nudge inside the window; the re-read gives the
            // authoritative timestamp for the retry hint.
            let view = listing_view::find(&self.pool, viewer_id, listing_id)
                .await?
                .ok_or_else(|| AppError::ViewerNotFound {
                    viewer_id,
                    listing_id,
                })?;
            let last = view.last_nudged_at.unwrap_or(now);
            return Err(AppError::CooldownActive {
                can_nudge_again_at: last + self.nudge_cooldown_ms,
            });
        }

        tracing::info!(listing_id, viewer_id, owner_id, "Viewer nudged");

        self.notifier
            .dispatch(
                viewer_id,
                NotificationKind::System,
                "Still interested?",
                format!("The seller of \"{}\" noticed your interest", listing.title),
                Some(format!("/listings/{listing_id}")),
            )
            .await;

        Ok(NudgeReceipt {
            viewer_id,
            listing_id,
            nudged_at: now,
            next_allowed_at: now + self.nudge_cooldown_ms,
        })
    }

    /// Who viewed this listing, owner only, most recent first
    pub async fn list_viewers(
        &self,
        owner_id: i64,
        listing_id: i64,
    ) -> AppResult<Vec<ListingViewer>> {
        let listing = listing::find_by_id(&self.pool, listing_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Listing {listing_id}")))?;
        if listing.owner_id != owner_id {
            return Err(AppError::forbidden("Only the owner may list viewers"));
        }
        Ok(listing_view::list_for_listing(&self.pool, listing_id).await?)
    }
}
