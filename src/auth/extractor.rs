use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{domain::models::UserId, routes::ApiError};

/// Header set by the authentication gateway after validating the caller's
/// token. The API itself never sees credentials.
pub const USER_ID_HEADER: &str = "x-auth-user-id";

/// A custom Axum extractor for the authenticated caller's identity.
/// Returns 401 Unauthorized when the gateway header is missing or mangled.
///
/// This only establishes *who* is calling; *what they may see* is decided
/// per request by the site access resolver.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: UserId,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i32>().ok())
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        Ok(AuthUser {
            id: UserId::new(id),
        })
    }
}
