//! Full marketplace walkthrough: listing → trade → dual confirmation →
//! listing sold → vouches both ways → reputation aggregates.
//!
//! Drives the services the same way the HTTP handlers do, against a real
//! tempdir-backed SQLite database.

use market_server::db::DbService;
use market_server::db::repository::user;
use market_server::{AppError, Config, ServerState};
use shared::models::{
    ListingCreate, ListingStatus, TradeCreate, TradeStatus, User, UserCreate, VouchCreate,
    VouchKind,
};
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

fn vouch_for(trade_id: i64, rating: i64) -> VouchCreate {
    VouchCreate {
        trade_id,
        rating,
        message: Some("Smooth trade".into()),
    }
}

#[tokio::test]
async fn test_trade_to_vouch_walkthrough() {
    let (_dir, state) = boot().await;
    let seller = register(&state, "forge_master").await;
    let buyer = register(&state, "night_trader").await;

    let item = state
        .listings
        .create(
            seller.id,
            ListingCreate {
                title: "Radiant greatsword".into(),
                price: 2500,
                stock: 1,
            },
        )
        .await
        .unwrap();
    assert_eq!(item.status, ListingStatus::Available);

    let trade = state
        .trades
        .create(
            buyer.id,
            TradeCreate {
                listing_id: item.id,
                price: 2500,
            },
        )
        .await
        .unwrap();
    assert_eq!(trade.status, TradeStatus::Pending);

    // No vouching while the trade is still pending
    let gated = state
        .vouches
        .submit(buyer.id, vouch_for(trade.id, 5))
        .await
        .unwrap_err();
    assert!(matches!(gated, AppError::TradeNotCompleted));

    state
        .trades
        .toggle_confirmation(trade.id, buyer.id)
        .await
        .unwrap();
    let done = state
        .trades
        .toggle_confirmation(trade.id, seller.id)
        .await
        .unwrap();
    assert_eq!(done.status, TradeStatus::Completed);

    let sold = state.listings.get(item.id).await.unwrap();
    assert_eq!(sold.status, ListingStatus::Sold);

    // Out-of-range rating is rejected before anything else
    let bad = state
        .vouches
        .submit(buyer.id, vouch_for(trade.id, 6))
        .await
        .unwrap_err();
    assert!(matches!(bad, AppError::InvalidRating(6)));

    let vouch = state
        .vouches
        .submit(buyer.id, vouch_for(trade.id, 5))
        .await
        .unwrap();
    assert_eq!(vouch.from_user_id, buyer.id);
    assert_eq!(vouch.to_user_id, seller.id);
    assert_eq!(vouch.kind, VouchKind::Seller);

    let rep = state.vouches.reputation(seller.id).await.unwrap();
    assert_eq!(rep.vouch_count, 1);
    assert_eq!(rep.average_rating, Some(5.0));

    // Write-once per (from, to) pair
    let dup = state
        .vouches
        .submit(buyer.id, vouch_for(trade.id, 4))
        .await
        .unwrap_err();
    assert!(matches!(dup, AppError::DuplicateVouch));

    // The reverse direction is its own slot
    let back = state
        .vouches
        .submit(seller.id, vouch_for(trade.id, 4))
        .await
        .unwrap();
    assert_eq!(back.to_user_id, buyer.id);
    assert_eq!(back.kind, VouchKind::Buyer);

    let buyer_rep = state.vouches.reputation(buyer.id).await.unwrap();
    assert_eq!(buyer_rep.vouch_count, 1);
    assert_eq!(buyer_rep.average_rating, Some(4.0));

    let received = state.vouches.list_received(seller.id).await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].id, vouch.id);
}

#[tokio::test]
async fn test_vouch_gates() {
    let (_dir, state) = boot().await;
    let seller = register(&state, "gatekeeper").await;
    let buyer = register(&state, "applicant").await;
    let outsider = register(&state, "bystander").await;

    let item = state
        .listings
        .create(
            seller.id,
            ListingCreate {
                title: "Sealed relic".into(),
                price: 900,
                stock: 1,
            },
        )
        .await
        .unwrap();
    let trade = state
        .trades
        .create(
            buyer.id,
            TradeCreate {
                listing_id: item.id,
                price: 900,
            },
        )
        .await
        .unwrap();

    let missing = state
        .vouches
        .submit(buyer.id, vouch_for(999_999, 5))
        .await
        .unwrap_err();
    assert!(matches!(missing, AppError::NotFound(_)));

    let stranger = state
        .vouches
        .submit(outsider.id, vouch_for(trade.id, 5))
        .await
        .unwrap_err();
    assert!(matches!(stranger, AppError::Forbidden(_)));

    // Cancelled trades never unlock a vouch
    state.trades.cancel(trade.id, buyer.id).await.unwrap();
    let cancelled = state
        .vouches
        .submit(buyer.id, vouch_for(trade.id, 5))
        .await
        .unwrap_err();
    assert!(matches!(cancelled, AppError::TradeNotCompleted));
}

#[tokio::test]
async fn test_vouch_pair_is_unique_across_trades() {
    let (_dir, state) = boot().await;
    let seller = register(&state, "repeat_seller").await;
    let buyer = register(&state, "repeat_buyer").await;

    let mut trade_ids = Vec::new();
    for title in ["First batch", "Second batch"] {
        let item = state
            .listings
            .create(
                seller.id,
                ListingCreate {
                    title: title.into(),
                    price: 100,
                    stock: 1,
                },
            )
            .await
            .unwrap();
        let trade = state
            .trades
            .create(
                buyer.id,
                TradeCreate {
                    listing_id: item.id,
                    price: 100,
                },
            )
            .await
            .unwrap();
        state
            .trades
            .toggle_confirmation(trade.id, buyer.id)
            .await
            .unwrap();
        state
            .trades
            .toggle_confirmation(trade.id, seller.id)
            .await
            .unwrap();
        trade_ids.push(trade.id);
    }

    state
        .vouches
        .submit(buyer.id, vouch_for(trade_ids[0], 5))
        .await
        .unwrap();

    // A second completed trade does not grant a second slot for the pair
    let second = state
        .vouches
        .submit(buyer.id, vouch_for(trade_ids[1], 3))
        .await
        .unwrap_err();
    assert!(matches!(second, AppError::DuplicateVouch));

    let rep = state.vouches.reputation(seller.id).await.unwrap();
    assert_eq!(rep.vouch_count, 1);
}

#[tokio::test]
async fn test_notification_readout() {
    let (_dir, state) = boot().await;
    let seller = register(&state, "busy_seller").await;
    let buyer = register(&state, "busy_buyer").await;

    let item = state
        .listings
        .create(
            seller.id,
            ListingCreate {
                title: "Amber idol".into(),
                price: 450,
                stock: 1,
            },
        )
        .await
        .unwrap();
    let trade = state
        .trades
        .create(
            buyer.id,
            TradeCreate {
                listing_id: item.id,
                price: 450,
            },
        )
        .await
        .unwrap();
    state
        .trades
        .toggle_confirmation(trade.id, buyer.id)
        .await
        .unwrap();
    state
        .trades
        .toggle_confirmation(trade.id, seller.id)
        .await
        .unwrap();

    // Seller inbox: trade request + completion
    let inbox = state.notifier.list(seller.id).await.unwrap();
    assert_eq!(inbox.len(), 2);
    assert!(inbox.iter().all(|n| !n.is_read));
    assert_eq!(state.notifier.unread_count(seller.id).await.unwrap(), 2);

    // Recipient scoping: the buyer cannot read the seller's rows
    let foreign = state
        .notifier
        .mark_read(buyer.id, inbox[0].id)
        .await
        .unwrap_err();
    assert!(matches!(foreign, AppError::NotFound(_)));

    state.notifier.mark_read(seller.id, inbox[0].id).await.unwrap();
    assert_eq!(state.notifier.unread_count(seller.id).await.unwrap(), 1);

    // Marking again is idempotent
    state.notifier.mark_read(seller.id, inbox[0].id).await.unwrap();
    assert_eq!(state.notifier.unread_count(seller.id).await.unwrap(), 1);

    let flipped = state.notifier.mark_all_read(seller.id).await.unwrap();
    assert_eq!(flipped, 1);
    assert_eq!(state.notifier.unread_count(seller.id).await.unwrap(), 0);
}
