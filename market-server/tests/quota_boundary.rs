//! Listing quota enforcement across subscription tiers, including lapsed
//! subscriptions and per-tier setting overrides.

use market_server::db::DbService;
use market_server::db::repository::{app_setting, subscription, user};
use market_server::{AppError, Config, ServerState};
use shared::models::{ListingCreate, ListingStatus, SubscriptionTier, User, UserCreate};
use tempfile::TempDir;

async fn boot() -> (TempDir, ServerState) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("market.db");
    let db = DbService::new(&db_path.to_string_lossy())
        .await
        .expect("database init");
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let state = ServerState::with_pool(config, db.pool);
    (dir, state)
}

async fn register(state: &ServerState, name: &str) -> User {
    user::create(
        &state.pool,
        UserCreate {
            username: name.into(),
            display_name: name.into(),
        },
    )
    .await
    .expect("user fixture")
}

fn listing(title: &str) -> ListingCreate {
    ListingCreate {
        title: title.into(),
        price: 100,
        stock: 1,
    }
}

#[tokio::test]
async fn test_free_tier_cap_is_five() {
    let (_dir, state) = boot().await;
    let seller = register(&state, "free_seller").await;

    for i in 0..5 {
        state
            .listings
            .create(seller.id, listing(&format!("Item {i}")))
            .await
            .unwrap();
    }

    let err = state
        .listings
        .create(seller.id, listing("One too many"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::QuotaExceeded { max: 5, used: 5 }));

    let status = state.quota.check(seller.id).await.unwrap();
    assert_eq!(status.tier, SubscriptionTier::Free);
    assert_eq!(status.max_listings, 5);
    assert_eq!(status.used, 5);
    assert_eq!(status.remaining, 0);
    assert!(!status.allowed);
}

#[tokio::test]
async fn test_only_available_listings_count() {
    let (_dir, state) = boot().await;
    let seller = register(&state, "tidy_seller").await;

    let mut ids = Vec::new();
    for i in 0..5 {
        let l = state
            .listings
            .create(seller.id, listing(&format!("Shelf {i}")))
            .await
            .unwrap();
        ids.push(l.id);
    }
    assert!(
        state
            .listings
            .create(seller.id, listing("Overflow"))
            .await
            .is_err()
    );

    // Hiding frees a slot
    state
        .listings
        .set_status(seller.id, ids[0], ListingStatus::Hidden)
        .await
        .unwrap();
    state
        .listings
        .create(seller.id, listing("Fits again"))
        .await
        .unwrap();

    // Back at the cap
    let err = state
        .listings
        .create(seller.id, listing("Overflow again"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::QuotaExceeded { max: 5, used: 5 }));
}

#[tokio::test]
async fn test_pro_tier_raises_cap_until_it_lapses() {
    let (_dir, state) = boot().await;
    let seller = register(&state, "pro_seller").await;
    let now = shared::util::now_millis();

    subscription::upsert(
        &state.pool,
        seller.id,
        SubscriptionTier::Pro,
        Some(now + 86_400_000),
    )
    .await
    .unwrap();

    for i in 0..6 {
        state
            .listings
            .create(seller.id, listing(&format!("Pro item {i}")))
            .await
            .unwrap();
    }
    let status = state.quota.check(seller.id).await.unwrap();
    assert_eq!(status.tier, SubscriptionTier::Pro);
    assert_eq!(status.max_listings, 25);
    assert_eq!(status.used, 6);
    assert!(status.allowed);

    // Lapse the subscription: the guard treats the user as FREE without
    // touching the row
    subscription::upsert(&state.pool, seller.id, SubscriptionTier::Pro, Some(now - 1))
        .await
        .unwrap();

    let err = state
        .listings
        .create(seller.id, listing("Post-lapse"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::QuotaExceeded { max: 5, used: 6 }));

    let lapsed = state.quota.check(seller.id).await.unwrap();
    assert_eq!(lapsed.tier, SubscriptionTier::Free);
    assert_eq!(lapsed.remaining, 0);

    let row = subscription::find_by_user(&state.pool, seller.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.tier, SubscriptionTier::Pro);
}

#[tokio::test]
async fn test_elite_default_cap() {
    let (_dir, state) = boot().await;
    let seller = register(&state, "elite_seller").await;

    subscription::upsert(&state.pool, seller.id, SubscriptionTier::Elite, None)
        .await
        .unwrap();

    let status = state.quota.check(seller.id).await.unwrap();
    assert_eq!(status.tier, SubscriptionTier::Elite);
    assert_eq!(status.max_listings, 100);
    assert_eq!(status.remaining, 100);
}

#[tokio::test]
async fn test_setting_overrides_tier_cap() {
    let (_dir, state) = boot().await;
    let seller = register(&state, "capped_seller").await;

    app_setting::set(&state.pool, "quota.max_listings.FREE", "2")
        .await
        .unwrap();

    state
        .listings
        .create(seller.id, listing("First"))
        .await
        .unwrap();
    state
        .listings
        .create(seller.id, listing("Second"))
        .await
        .unwrap();
    let err = state
        .listings
        .create(seller.id, listing("Third"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::QuotaExceeded { max: 2, used: 2 }));
}

#[tokio::test]
async fn test_unparsable_override_falls_back_to_default() {
    let (_dir, state) = boot().await;
    let seller = register(&state, "fallback_seller").await;

    app_setting::set(&state.pool, "quota.max_listings.FREE", "plenty")
        .await
        .unwrap();

    let status = state.quota.check(seller.id).await.unwrap();
    assert_eq!(status.max_listings, 5);
}
