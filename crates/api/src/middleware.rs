use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use gamehub_auth::{authorize_role, JwtValidator, Principal, Role};

use crate::app::errors::ApiError;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Verify the bearer token and attach the resulting [`Principal`].
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let claims = state.jwt.validate(token, Utc::now()).map_err(|e| {
        tracing::debug!(error = %e, "bearer token rejected");
        ApiError::Unauthenticated
    })?;

    req.extensions_mut().insert(Principal::from_claims(claims));

    Ok(next.run(req).await)
}

/// Require `role` (or admin) on the request principal.
///
/// Mount inside the authenticated router, e.g.
/// `route_layer(from_fn_with_state(Role::FINANCE, require_role))`.
pub async fn require_role(State(role): State<Role>, req: Request, next: Next) -> Result<Response, ApiError> {
    let principal = req
        .extensions()
        .get::<Principal>()
        .ok_or(ApiError::Unauthenticated)?;

    if let Err(e) = authorize_role(principal, &role) {
        tracing::warn!(
            required_role = %role,
            subject = principal.subject().unwrap_or("-"),
            error = %e,
            "role check failed"
        );
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(ApiError::Unauthenticated)?;

    let header = header.to_str().map_err(|_| ApiError::Unauthenticated)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthenticated)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(ApiError::Unauthenticated);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderValue};

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_bearer(&headers("Bearer abc")), Ok("abc"));
        assert_eq!(extract_bearer(&headers("Basic abc")), Err(ApiError::Unauthenticated));
        assert_eq!(extract_bearer(&headers("Bearer   ")), Err(ApiError::Unauthenticated));
        assert_eq!(extract_bearer(&HeaderMap::new()), Err(ApiError::Unauthenticated));
    }
}
