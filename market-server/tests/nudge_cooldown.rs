//! Nudge rate limiting: one nudge per (viewer, listing) pair per cooldown
//! window. The window is walked by backdating `last_nudged_at` directly
//! instead of sleeping through it.

use market_server::db::DbService;
use market_server::db::repository::user;
use market_server::{AppError, Config, ServerState};
use shared::models::{Listing, ListingCreate, User, UserCreate};
use tempfile::TempDir;

const HOUR_MS: i64 = 3_600_000;
const MINUTE_MS: i64 = 60_000;

async fn boot() -> (TempDir, ServerState) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("market.db");
    let db = DbService::new(&db_path.to_string_lossy())
        .await
        .expect("database init");
    let mut config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    config.nudge_cooldown_ms = HOUR_MS;
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

async fn seller_with_listing(state: &ServerState, name: &str) -> (User, Listing) {
    let seller = register(state, name).await;
    let item = state
        .listings
        .create(
            seller.id,
            ListingCreate {
                title: "Glass orrery".into(),
                price: 1200,
                stock: 1,
            },
        )
        .await
        .unwrap();
    (seller, item)
}

async fn backdate_nudge(state: &ServerState, viewer_id: i64, listing_id: i64, to: i64) {
    sqlx::query(
        "UPDATE listing_view SET last_nudged_at = ?1 WHERE viewer_id = ?2 AND listing_id = ?3",
    )
    .bind(to)
    .bind(viewer_id)
    .bind(listing_id)
    .execute(&state.pool)
    .await
    .unwrap();
}

#[tokio::test]
async fn test_nudge_window_walkthrough() {
    let (_dir, state) = boot().await;
    let (seller, item) = seller_with_listing(&state, "orrery_maker").await;
    let viewer = register(&state, "curious_one").await;

    state.engagement.record_view(viewer.id, item.id).await.unwrap();

    let receipt = state
        .engagement
        .nudge(seller.id, item.id, viewer.id)
        .await
        .unwrap();
    assert_eq!(receipt.next_allowed_at, receipt.nudged_at + HOUR_MS);

    // Immediate retry sits inside the window; the retry hint points at the
    // exact instant the claim opens up again
    let blocked = state
        .engagement
        .nudge(seller.id, item.id, viewer.id)
        .await
        .unwrap_err();
    let AppError::CooldownActive { can_nudge_again_at } = blocked else {
        panic!("expected CooldownActive, got {blocked:?}");
    };
    assert_eq!(can_nudge_again_at, receipt.next_allowed_at);
    assert!(can_nudge_again_at > shared::util::now_millis());

    // 30 minutes in: still blocked
    let now = shared::util::now_millis();
    backdate_nudge(&state, viewer.id, item.id, now - 30 * MINUTE_MS).await;
    let still_blocked = state
        .engagement
        .nudge(seller.id, item.id, viewer.id)
        .await
        .unwrap_err();
    assert!(matches!(still_blocked, AppError::CooldownActive { .. }));

    // 61 minutes in: the window has passed
    backdate_nudge(&state, viewer.id, item.id, now - 61 * MINUTE_MS).await;
    state
        .engagement
        .nudge(seller.id, item.id, viewer.id)
        .await
        .unwrap();

    let inbox = state.notifier.list(viewer.id).await.unwrap();
    let nudges = inbox
        .iter()
        .filter(|n| n.title == "Still interested?")
        .count();
    assert_eq!(nudges, 2);
}

#[tokio::test]
async fn test_nudge_preconditions() {
    let (_dir, state) = boot().await;
    let (seller, item) = seller_with_listing(&state, "strict_owner").await;
    let viewer = register(&state, "window_shopper").await;
    let rival = register(&state, "rival_seller").await;

    state.engagement.record_view(viewer.id, item.id).await.unwrap();

    let not_owner = state
        .engagement
        .nudge(rival.id, item.id, viewer.id)
        .await
        .unwrap_err();
    assert!(matches!(not_owner, AppError::Forbidden(_)));

    let no_listing = state
        .engagement
        .nudge(seller.id, 424_242, viewer.id)
        .await
        .unwrap_err();
    assert!(matches!(no_listing, AppError::NotFound(_)));

    let never_viewed = state
        .engagement
        .nudge(seller.id, item.id, rival.id)
        .await
        .unwrap_err();
    assert!(matches!(never_viewed, AppError::ViewerNotFound { .. }));

    let self_nudge = state
        .engagement
        .nudge(seller.id, item.id, seller.id)
        .await
        .unwrap_err();
    assert!(matches!(self_nudge, AppError::Validation(_)));
}

#[tokio::test]
async fn test_view_footprints_and_viewer_panel() {
    let (_dir, state) = boot().await;
    let (seller, item) = seller_with_listing(&state, "panel_owner").await;
    let viewer = register(&state, "repeat_visitor").await;
    let other = register(&state, "nosy_neighbor").await;

    state.engagement.record_view(viewer.id, item.id).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    state.engagement.record_view(viewer.id, item.id).await.unwrap();

    // Repeat visits refresh the row instead of stacking
    let viewers = state
        .engagement
        .list_viewers(seller.id, item.id)
        .await
        .unwrap();
    assert_eq!(viewers.len(), 1);
    assert_eq!(viewers[0].viewer_id, viewer.id);
    assert_eq!(viewers[0].username, "repeat_visitor");
    assert!(viewers[0].last_nudged_at.is_none());

    let peeking = state
        .engagement
        .list_viewers(other.id, item.id)
        .await
        .unwrap_err();
    assert!(matches!(peeking, AppError::Forbidden(_)));

    // Views of unknown users or listings are rejected up front
    let ghost_view = state
        .engagement
        .record_view(999_999, item.id)
        .await
        .unwrap_err();
    assert!(matches!(ghost_view, AppError::UserNotFound(_)));
    let void_view = state
        .engagement
        .record_view(viewer.id, 999_999)
        .await
        .unwrap_err();
    assert!(matches!(void_view, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_concurrent_nudges_single_winner() {
    let (_dir, state) = boot().await;
    let (seller, item) = seller_with_listing(&state, "race_owner").await;
    let viewer = register(&state, "contested_viewer").await;
    state.engagement.record_view(viewer.id, item.id).await.unwrap();

    let a = {
        let engagement = state.engagement.clone();
        let (owner_id, listing_id, viewer_id) = (seller.id, item.id, viewer.id);
        tokio::spawn(async move { engagement.nudge(owner_id, listing_id, viewer_id).await })
    };
    let b = {
        let engagement = state.engagement.clone();
        let (owner_id, listing_id, viewer_id) = (seller.id, item.id, viewer.id);
        tokio::spawn(async move { engagement.nudge(owner_id, listing_id, viewer_id).await })
    };
    let (ra, rb) = tokio::join!(a, b);
    let results = [ra.unwrap(), rb.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let loser = results.iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(
        loser,
        Err(AppError::CooldownActive { .. })
    ));

    // Exactly one notification reached the viewer
    let inbox = state.notifier.list(viewer.id).await.unwrap();
    assert_eq!(inbox.len(), 1);
}
