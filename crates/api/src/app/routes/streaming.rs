use std::sync::Arc;

use axum::{
    extract::Extension,
    response::Response,
    routing::{get, post},
    Json, Router,
};

use gamehub_core::StreamId;
use gamehub_services::streaming::{
    LiveStreamFilter, PopularStreamFilter, StartStreamRequest, Stream, StreamSettings, StreamStats,
};
use gamehub_services::Page;

use crate::app::errors::{ApiError, Operation};
use crate::app::extract::{ApiJson, ApiPath, ApiQuery};
use crate::app::routes::common::created;
use crate::app::services::AppServices;
use crate::context::Caller;

pub fn public_router() -> Router {
    Router::new()
        .route("/streams/:stream_id", get(get_stream))
        .route("/streams/:stream_id/stats", get(stream_stats))
        .route("/live", get(live_streams))
        .route("/popular", get(popular_streams))
}

pub fn router() -> Router {
    Router::new()
        .route("/streams", post(start_stream))
        .route("/streams/:stream_id/end", post(end_stream))
        .route("/settings", get(get_settings).put(update_settings))
}

pub async fn start_stream(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiJson(body): ApiJson<StartStreamRequest>,
) -> Result<Response, ApiError> {
    let op = Operation::new("streaming.start")
        .caller(caller)
        .entity("game_id", body.game_id);
    let stream = services
        .errors
        .check(&op, services.streaming.start_stream(caller, body).await)?;

    Ok(created(format!("/api/streaming/streams/{}", stream.id), stream))
}

pub async fn get_stream(
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(stream_id): ApiPath<StreamId>,
) -> Result<Json<Stream>, ApiError> {
    let op = Operation::new("streaming.get").entity("stream_id", stream_id);
    services
        .errors
        .check(&op, services.streaming.get_stream(stream_id).await)
        .map(Json)
}

pub async fn end_stream(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(stream_id): ApiPath<StreamId>,
) -> Result<Json<Stream>, ApiError> {
    let op = Operation::new("streaming.end")
        .caller(caller)
        .entity("stream_id", stream_id);
    services
        .errors
        .check(&op, services.streaming.end_stream(caller, stream_id).await)
        .map(Json)
}

pub async fn stream_stats(
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(stream_id): ApiPath<StreamId>,
) -> Result<Json<StreamStats>, ApiError> {
    let op = Operation::new("streaming.stats").entity("stream_id", stream_id);
    services
        .errors
        .check(&op, services.streaming.stream_stats(stream_id).await)
        .map(Json)
}

pub async fn live_streams(
    Extension(services): Extension<Arc<AppServices>>,
    ApiQuery(filter): ApiQuery<LiveStreamFilter>,
) -> Result<Json<Page<Stream>>, ApiError> {
    let op = Operation::new("streaming.live");
    services
        .errors
        .check(&op, services.streaming.live_streams(filter).await)
        .map(Json)
}

pub async fn popular_streams(
    Extension(services): Extension<Arc<AppServices>>,
    ApiQuery(filter): ApiQuery<PopularStreamFilter>,
) -> Result<Json<Vec<Stream>>, ApiError> {
    let op = Operation::new("streaming.popular");
    services
        .errors
        .check(&op, services.streaming.popular_streams(filter).await)
        .map(Json)
}

pub async fn get_settings(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
) -> Result<Json<StreamSettings>, ApiError> {
    let op = Operation::new("streaming.get_settings").caller(caller);
    services
        .errors
        .check(&op, services.streaming.get_settings(caller).await)
        .map(Json)
}

pub async fn update_settings(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiJson(body): ApiJson<StreamSettings>,
) -> Result<Json<StreamSettings>, ApiError> {
    let op = Operation::new("streaming.update_settings").caller(caller);
    services
        .errors
        .check(&op, services.streaming.update_settings(caller, body).await)
        .map(Json)
}
