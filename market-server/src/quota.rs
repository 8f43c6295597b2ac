//! Subscription Quota Guard
//!
//! Answers one question: may this user put another listing up? The tier
//! limit table has built-in defaults, each overridable through an
//! `app_setting` row (`quota.max_listings.FREE` etc.). The guard never
//! writes subscription state: a lapsed subscription merely counts as FREE
//! here while the billing sweep gets around to the actual downgrade.

use shared::models::{QuotaStatus, SubscriptionTier};
use sqlx::SqlitePool;

use crate::db::repository::{app_setting, listing, subscription};
use crate::utils::AppResult;

pub const DEFAULT_FREE_MAX_LISTINGS: i64 = 5;
pub const DEFAULT_PRO_MAX_LISTINGS: i64 = 25;
pub const DEFAULT_ELITE_MAX_LISTINGS: i64 = 100;

#[derive(Clone)]
pub struct QuotaGuard {
    pool: SqlitePool,
}

impl QuotaGuard {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Tier the quota computation should use right now
    pub async fn effective_tier(&self, user_id: i64) -> AppResult<SubscriptionTier> {
        let now = shared::util::now_millis();
        let tier = match subscription::find_by_user(&self.pool, user_id).await? {
            Some(sub) if sub.expires_at.is_none_or(|exp| exp > now) => sub.tier,
            _ => SubscriptionTier::Free,
        };
        Ok(tier)
    }

    /// Listing cap for a tier, override first, default second
    pub async fn max_listings(&self, tier: SubscriptionTier) -> AppResult<i64> {
        let key = format!("quota.max_listings.{}", tier.as_str());
        if let Some(setting) = app_setting::get(&self.pool, &key).await?
            && let Ok(value) = setting.value.parse::<i64>()
        {
            return Ok(value);
        }
        Ok(match tier {
            SubscriptionTier::Free => DEFAULT_FREE_MAX_LISTINGS,
            SubscriptionTier::Pro => DEFAULT_PRO_MAX_LISTINGS,
            SubscriptionTier::Elite => DEFAULT_ELITE_MAX_LISTINGS,
        })
    }

    pub async fn check(&self, user_id: i64) -> AppResult<QuotaStatus> {
        let tier = self.effective_tier(user_id).await?;
        let max_listings = self.max_listings(tier).await?;
        let used = listing::count_active_for_owner(&self.pool, user_id).await?;
        Ok(QuotaStatus {
            tier,
            max_listings,
            used,
            remaining: (max_listings - used).max(0),
            allowed: used < max_listings,
        })
    }
}
