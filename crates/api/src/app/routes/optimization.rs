use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use gamehub_core::{GameId, RecommendationId};
use gamehub_services::optimization::{
    GamePreset, HardwareProfile, OptimizationFeedback, Recommendation, RecommendationFilter,
};

use crate::app::errors::{ApiError, Operation};
use crate::app::extract::{ApiJson, ApiPath, ApiQuery};
use crate::app::routes::common::no_content;
use crate::app::services::AppServices;
use crate::context::Caller;

pub fn public_router() -> Router {
    Router::new().route("/games/:game_id/presets", get(game_presets))
}

pub fn router() -> Router {
    Router::new()
        .route("/analyze", post(analyze_profile))
        .route("/recommendations", get(list_recommendations))
        .route(
            "/recommendations/:recommendation_id/apply",
            post(apply_recommendation),
        )
        .route("/feedback", post(submit_feedback))
}

pub async fn analyze_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiJson(body): ApiJson<HardwareProfile>,
) -> Result<Json<Recommendation>, ApiError> {
    let op = Operation::new("optimization.analyze")
        .caller(caller)
        .entity("game_id", body.game_id);
    services
        .errors
        .check(&op, services.optimization.analyze_profile(caller, body).await)
        .map(Json)
}

pub async fn list_recommendations(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiQuery(filter): ApiQuery<RecommendationFilter>,
) -> Result<Json<Vec<Recommendation>>, ApiError> {
    let op = Operation::new("optimization.list_recommendations").caller(caller);
    services
        .errors
        .check(
            &op,
            services.optimization.list_recommendations(caller, filter).await,
        )
        .map(Json)
}

pub async fn apply_recommendation(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(recommendation_id): ApiPath<RecommendationId>,
) -> Result<Json<Recommendation>, ApiError> {
    let op = Operation::new("optimization.apply")
        .caller(caller)
        .entity("recommendation_id", recommendation_id);
    services
        .errors
        .check(
            &op,
            services
                .optimization
                .apply_recommendation(caller, recommendation_id)
                .await,
        )
        .map(Json)
}

pub async fn submit_feedback(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiJson(body): ApiJson<OptimizationFeedback>,
) -> Result<StatusCode, ApiError> {
    let op = Operation::new("optimization.feedback")
        .caller(caller)
        .entity("recommendation_id", body.recommendation_id);
    services
        .errors
        .check(&op, services.optimization.submit_feedback(caller, body).await)?;
    Ok(no_content())
}

pub async fn game_presets(
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(game_id): ApiPath<GameId>,
) -> Result<Json<Vec<GamePreset>>, ApiError> {
    let op = Operation::new("optimization.presets").entity("game_id", game_id);
    services
        .errors
        .check(&op, services.optimization.game_presets(game_id).await)
        .map(Json)
}
