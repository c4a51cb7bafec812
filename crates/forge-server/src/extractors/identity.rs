//! Caller identity for write routes
//!
//! The front end authenticates members with the chat platform and forwards
//! the member id in `X-Forge-User`. Writes only ever target that id.

use crate::handlers::ApiError;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use forge_core::UserId;

pub const USER_HEADER: &str = "x-forge-user";

/// The member making the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing X-Forge-User header"))?;

        raw.trim()
            .parse::<UserId>()
            .map(Identity)
            .map_err(|_| ApiError::unauthorized(format!("Invalid member id: {}", raw)))
    }
}
