//! Shared types for the Tradepost marketplace
//!
//! Data models and small utilities used by the market server and, via the
//! JSON API, by frontend clients. Row types carry their sqlx derives behind
//! the `db` feature so client builds stay free of the database stack.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
