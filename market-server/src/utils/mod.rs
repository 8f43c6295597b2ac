//! Utility module - error types, result aliases and logging
//!
//! # Contents
//!
//! - [`AppError`] - application error type
//! - [`AppResponse`] - API error envelope
//! - [`AppResult`] - handler result alias
//! - logging setup

pub mod error;
pub mod logger;
pub mod result;

pub use error::{AppError, AppResponse};
pub use result::AppResult;
