use axum::{routing::get, Router};

pub mod analytics;
pub mod backups;
pub mod common;
pub mod community;
pub mod integrations;
pub mod optimization;
pub mod organizations;
pub mod revenue;
pub mod streaming;
pub mod system;

/// Router for anonymous endpoints. Nothing here extracts caller identity.
pub fn public_router() -> Router {
    Router::new()
        .nest("/api/community", community::public_router())
        .nest("/api/integrations", integrations::public_router())
        .nest("/api/streaming", streaming::public_router())
        .nest("/api/analytics", analytics::public_router())
        .nest("/api/optimization", optimization::public_router())
}

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/api/whoami", get(system::whoami))
        .nest("/api/community", community::router())
        .nest("/api/integrations", integrations::router())
        .nest("/api/streaming", streaming::router())
        .nest("/api/revenue", revenue::router())
        .nest("/api/backups", backups::router())
        .nest("/api/analytics", analytics::router())
        .nest("/api/organizations", organizations::router())
        .nest("/api/optimization", optimization::router())
}
