use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use gamehub_auth::Principal;
use gamehub_core::UserId;

use crate::app::errors::ApiError;

/// Identity of the authenticated caller.
///
/// Resolved from the [`Principal`] the auth middleware attached to the
/// request. Extraction fails with 401 when there is no principal or its
/// subject is not a user id, so a handler taking `Caller` never runs for an
/// unidentified request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Caller(pub UserId);

impl Caller {
    pub fn user_id(&self) -> UserId {
        self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .extensions
            .get::<Principal>()
            .ok_or(ApiError::Unauthenticated)?;

        principal.user_id().map(Caller).map_err(|e| {
            tracing::debug!(error = %e, "caller identity rejected");
            ApiError::Unauthenticated
        })
    }
}

/// The request principal, for handlers that need roles as well as identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPrincipal(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or(ApiError::Unauthenticated)
    }
}
