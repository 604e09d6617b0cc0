use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};

use gamehub_core::{ConnectionId, GameId, ModId};
use gamehub_services::integration::{
    ConnectPlatformRequest, PlatformConnection, SupportedPlatform, SyncJob, SyncModRequest,
};

use crate::app::errors::{ApiError, Operation};
use crate::app::extract::{ApiJson, ApiPath};
use crate::app::routes::common::{created, no_content};
use crate::app::services::AppServices;
use crate::context::Caller;

pub fn public_router() -> Router {
    Router::new().route("/games/:game_id/platforms", get(supported_platforms))
}

pub fn router() -> Router {
    Router::new()
        .route("/platforms", get(list_connections).post(connect_platform))
        .route(
            "/platforms/:connection_id",
            get(get_connection).delete(disconnect_platform),
        )
        .route("/mods/:mod_id/sync", post(sync_mod))
}

pub async fn list_connections(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
) -> Result<Json<Vec<PlatformConnection>>, ApiError> {
    let op = Operation::new("integrations.list_connections").caller(caller);
    services
        .errors
        .check(&op, services.integrations.list_connections(caller).await)
        .map(Json)
}

pub async fn connect_platform(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiJson(body): ApiJson<ConnectPlatformRequest>,
) -> Result<Response, ApiError> {
    let op = Operation::new("integrations.connect")
        .caller(caller)
        .entity("platform", format!("{:?}", body.platform));
    let connection = services
        .errors
        .check(&op, services.integrations.connect_platform(caller, body).await)?;

    Ok(created(
        format!("/api/integrations/platforms/{}", connection.id),
        connection,
    ))
}

pub async fn get_connection(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(connection_id): ApiPath<ConnectionId>,
) -> Result<Json<PlatformConnection>, ApiError> {
    let op = Operation::new("integrations.get_connection")
        .caller(caller)
        .entity("connection_id", connection_id);
    services
        .errors
        .check(&op, services.integrations.get_connection(caller, connection_id).await)
        .map(Json)
}

pub async fn disconnect_platform(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(connection_id): ApiPath<ConnectionId>,
) -> Result<StatusCode, ApiError> {
    let op = Operation::new("integrations.disconnect")
        .caller(caller)
        .entity("connection_id", connection_id);
    services.errors.check(
        &op,
        services.integrations.disconnect_platform(caller, connection_id).await,
    )?;
    Ok(no_content())
}

pub async fn sync_mod(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(mod_id): ApiPath<ModId>,
    ApiJson(body): ApiJson<SyncModRequest>,
) -> Result<Json<SyncJob>, ApiError> {
    let op = Operation::new("integrations.sync_mod")
        .caller(caller)
        .entity("mod_id", mod_id);
    services
        .errors
        .check(&op, services.integrations.sync_mod(caller, mod_id, body).await)
        .map(Json)
}

pub async fn supported_platforms(
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(game_id): ApiPath<GameId>,
) -> Result<Json<Vec<SupportedPlatform>>, ApiError> {
    let op = Operation::new("integrations.supported_platforms").entity("game_id", game_id);
    services
        .errors
        .check(&op, services.integrations.supported_platforms(game_id).await)
        .map(Json)
}
