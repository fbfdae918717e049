//! Caller identity extraction.
//!
//! Authentication itself happens upstream; the gateway forwards the
//! authenticated user's id in the `x-user-id` header. This extractor only
//! turns that header into a typed [`UserId`] and rejects requests that
//! arrive without one.

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;

use crate::advisor::core::ids::UserId;

/// Header carrying the authenticated caller's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller, extracted from request headers.
#[derive(Clone, Copy, Debug)]
pub struct AuthenticatedUser(pub UserId);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    format!("missing {USER_ID_HEADER} header"),
                )
            })?;

        let user_id = header.parse::<UserId>().map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                format!("invalid {USER_ID_HEADER} header"),
            )
        })?;

        Ok(Self(user_id))
    }
}
