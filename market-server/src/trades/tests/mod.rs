use super::*;
use crate::db::DbService;
use crate::db::repository::{notification, user};
use shared::models::{Listing, ListingCreate, TradeStatus, User, UserCreate};
use sqlx::SqlitePool;
use tempfile::TempDir;

struct TestContext {
    // Holds the database directory alive for the duration of the test
    _dir: TempDir,
    pool: SqlitePool,
    engine: TradeEngine,
}

async fn setup() -> TestContext {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let db = DbService::new(&db_path.to_string_lossy()).await.unwrap();
    let notifier = Notifier::new(db.pool.clone());
    let engine = TradeEngine::new(db.pool.clone(), notifier);
    TestContext {
        _dir: dir,
        pool: db.pool,
        engine,
    }
}

async fn create_user(pool: &SqlitePool, name: &str) -> User {
    user::create(
        pool,
        UserCreate {
            username: name.to_string(),
            display_name: name.to_string(),
        },
    )
    .await
    .unwrap()
}

async fn create_listing(pool: &SqlitePool, owner_id: i64, title: &str, price: i64) -> Listing {
    listing::create(
        pool,
        owner_id,
        ListingCreate {
            title: title.to_string(),
            price,
            stock: 1,
        },
    )
    .await
    .unwrap()
}

// ========================================================================
// Helper: a buyer, a seller and one AVAILABLE listing
// ========================================================================

async fn setup_with_pair() -> (TestContext, User, User, Listing) {
    let ctx = setup().await;
    let buyer = create_user(&ctx.pool, "buyer").await;
    let seller = create_user(&ctx.pool, "seller").await;
    let item = create_listing(&ctx.pool, seller.id, "Aged meteorite shard", 2500).await;
    (ctx, buyer, seller, item)
}

async fn notifications_for(pool: &SqlitePool, user_id: i64) -> Vec<shared::models::Notification> {
    notification::list_for_user(pool, user_id).await.unwrap()
}

fn trade_request(listing_id: i64, price: i64) -> TradeCreate {
    TradeCreate { listing_id, price }
}
