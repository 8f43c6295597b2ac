use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::engagement::EngagementService;
use crate::listings::ListingService;
use crate::notify::Notifier;
use crate::quota::QuotaGuard;
use crate::trades::TradeEngine;
use crate::vouches::VouchService;

/// Server state - shared handle to every service
///
/// Cloning is shallow: the pool and the notifier's broadcast channel are
/// reference-counted internally, the engines hold clones of those.
///
/// | Field | Role |
/// |-------|------|
/// | config | immutable runtime configuration |
/// | pool | SQLite connection pool |
/// | notifier | notification persistence + broadcast |
/// | trades | trade lifecycle engine |
/// | vouches | reputation engine |
/// | quota | subscription quota guard |
/// | listings | listing creation / owner transitions |
/// | engagement | views and nudges |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub notifier: Notifier,
    pub trades: TradeEngine,
    pub vouches: VouchService,
    pub quota: QuotaGuard,
    pub listings: ListingService,
    pub engagement: EngagementService,
}

impl ServerState {
    /// Wire every service onto an existing pool.
    ///
    /// Used directly by tests that bring their own database.
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let notifier = Notifier::new(pool.clone());
        let trades = TradeEngine::new(pool.clone(), notifier.clone());
        let vouches = VouchService::new(pool.clone(), notifier.clone());
        let quota = QuotaGuard::new(pool.clone());
        let listings = ListingService::new(pool.clone(), quota.clone());
        let engagement =
            EngagementService::new(pool.clone(), notifier.clone(), config.nudge_cooldown_ms);

        Self {
            config,
            pool,
            notifier,
            trades,
            vouches,
            quota,
            listings,
            engagement,
        }
    }

    /// Initialize the server state
    ///
    /// Creates the working directory layout, opens the database (running
    /// migrations) and wires the services.
    ///
    /// # Panics
    ///
    /// Panics when the working directory or database cannot be initialized;
    /// there is nothing to serve without them.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_path();
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        Self::with_pool(config.clone(), db_service.pool)
    }
}
