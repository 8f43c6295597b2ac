//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`trades`] - trade lifecycle endpoints
//! - [`vouches`] - vouch submission and reputation reads
//! - [`notifications`] - recipient-facing notification endpoints
//! - [`listings`] - listing creation and owner status changes
//! - [`engagement`] - view tracking, viewer panel, nudges
//! - [`quota`] - listing quota readout

pub mod engagement;
pub mod health;
pub mod listings;
pub mod notifications;
pub mod quota;
pub mod trades;
pub mod vouches;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
