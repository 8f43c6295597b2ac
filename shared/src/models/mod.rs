//! Data models
//!
//! Shared between market-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY, snowflake-generated).
//! All timestamps are `i64` Unix milliseconds.

pub mod engagement;
pub mod listing;
pub mod notification;
pub mod setting;
pub mod subscription;
pub mod trade;
pub mod user;
pub mod vouch;

// Re-exports
pub use engagement::*;
pub use listing::*;
pub use notification::*;
pub use setting::*;
pub use subscription::*;
pub use trade::*;
pub use user::*;
pub use vouch::*;
