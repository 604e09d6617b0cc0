//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the service-boundary handles shared by every handler
//! - `routes/`: HTTP routes + handlers (one file per resource family)
//! - `extract.rs`: body/query/path extractors with uniform 400 rejections
//! - `errors.rs`: service error translation and error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::trace::TraceLayer;

use gamehub_auth::{Hs256JwtValidator, JwtValidator};

use crate::config::ApiConfig;
use crate::middleware;

pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router with in-memory services (entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Router {
    let mut validator = Hs256JwtValidator::new(config.jwt_secret.as_bytes());
    if let Some(issuer) = &config.jwt_issuer {
        validator = validator.with_issuer(issuer);
    }

    build_router(AppServices::in_memory(config.error_policy), Arc::new(validator))
}

/// Build the router around an arbitrary set of services.
pub fn build_router(services: AppServices, jwt: Arc<dyn JwtValidator>) -> Router {
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: require a verified bearer token.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(protected)
        .layer(Extension(Arc::new(services)))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests;
