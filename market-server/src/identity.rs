//! Request identity
//!
//! Session resolution happens at the upstream gateway, which forwards the
//! resolved account as an `x-user-id` header. [`CurrentUser`] lifts that
//! header into a typed extractor so every handler passes an explicit acting
//! user into the engines. A missing or malformed header is a 401; this
//! service never guesses an identity.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::utils::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The acting user, as resolved by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub i64);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or(AppError::Unauthorized)?;
        Ok(CurrentUser(id))
    }
}
