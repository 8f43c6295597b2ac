//! Tradepost Market Server - trade confirmation & reputation core
//!
//! # Architecture overview
//!
//! The server records trades negotiated off-platform and everything that
//! hangs off them:
//!
//! - **Trades** (`trades`): PENDING → dual confirmation → COMPLETED (or
//!   CANCELLED), with the listing's SOLD flip in the same transaction
//! - **Vouches** (`vouches`): write-once reputation, gated on completion
//! - **Notifications** (`notify`): persisted fan-out + broadcast channel
//! - **Quota** (`quota`): subscription-tier listing caps
//! - **Engagement** (`engagement`): view footprints and rate-limited nudges
//!
//! # Module structure
//!
//! ```text
//! market-server/src/
//! ├── core/          # Config, ServerState, Server
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── trades/        # trade lifecycle engine
//! ├── vouches.rs     # reputation engine
//! ├── notify.rs      # notification dispatcher
//! ├── quota.rs       # subscription quota guard
//! ├── engagement.rs  # views + nudge limiter
//! ├── listings.rs    # listing creation / owner transitions
//! ├── identity.rs    # CurrentUser extractor (gateway-resolved identity)
//! ├── routes.rs      # router assembly + middleware
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod engagement;
pub mod identity;
pub mod listings;
pub mod notify;
pub mod quota;
pub mod routes;
pub mod trades;
pub mod utils;
pub mod vouches;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use crate::engagement::EngagementService;
pub use crate::identity::CurrentUser;
pub use crate::listings::ListingService;
pub use crate::notify::Notifier;
pub use crate::quota::QuotaGuard;
pub use crate::trades::TradeEngine;
pub use crate::utils::{AppError, AppResponse, AppResult};
pub use crate::vouches::VouchService;

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};

/// Prepare the process environment: `.env` first so both the config and
/// the logger see its values, then logging.
pub fn setup_environment() -> std::io::Result<()> {
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  ______                __                     __
 /_  __/________ _____/ /__  ____  ____  _____/ /_
  / / / ___/ __ `/ __  / _ \/ __ \/ __ \/ ___/ __/
 / / / /  / /_/ / /_/ /  __/ /_/ / /_/ (__  ) /_
/_/ /_/   \__,_/\__,_/\___/ .___/\____/____/\__/
                         /_/
    "#
    );
}
