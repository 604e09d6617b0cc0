use std::sync::Arc;

use axum::{
    extract::Extension,
    middleware::from_fn_with_state,
    response::Response,
    routing::{get, post},
    Json, Router,
};

use gamehub_auth::Role;
use gamehub_core::{ModId, ReportId};
use gamehub_services::analytics::{
    CreateReportRequest, CreatorDashboard, ModMetrics, ModMetricsFilter, PlatformKpis, PublicStats,
    Report,
};
use gamehub_services::DateRangeFilter;

use crate::app::errors::{ApiError, Operation};
use crate::app::extract::{ApiJson, ApiPath, ApiQuery};
use crate::app::routes::common::created;
use crate::app::services::AppServices;
use crate::context::Caller;
use crate::middleware::require_role;

pub fn public_router() -> Router {
    Router::new().route("/stats/public", get(public_stats))
}

pub fn router() -> Router {
    let admin = Router::new()
        .route("/platform/kpis", get(platform_kpis))
        .route_layer(from_fn_with_state(Role::ADMIN, require_role));

    Router::new()
        .route("/dashboard", get(creator_dashboard))
        .route("/mods/:mod_id/metrics", get(mod_metrics))
        .route("/reports", post(create_report))
        .route("/reports/:report_id", get(get_report))
        .merge(admin)
}

pub async fn creator_dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiQuery(filter): ApiQuery<DateRangeFilter>,
) -> Result<Json<CreatorDashboard>, ApiError> {
    let op = Operation::new("analytics.dashboard").caller(caller);
    services
        .errors
        .check(&op, services.analytics.creator_dashboard(caller, filter).await)
        .map(Json)
}

pub async fn mod_metrics(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(mod_id): ApiPath<ModId>,
    ApiQuery(filter): ApiQuery<ModMetricsFilter>,
) -> Result<Json<ModMetrics>, ApiError> {
    let op = Operation::new("analytics.mod_metrics")
        .caller(caller)
        .entity("mod_id", mod_id);
    services
        .errors
        .check(&op, services.analytics.mod_metrics(caller, mod_id, filter).await)
        .map(Json)
}

pub async fn create_report(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiJson(body): ApiJson<CreateReportRequest>,
) -> Result<Response, ApiError> {
    let op = Operation::new("analytics.create_report").caller(caller);
    let report = services
        .errors
        .check(&op, services.analytics.create_report(caller, body).await)?;

    Ok(created(format!("/api/analytics/reports/{}", report.id), report))
}

pub async fn get_report(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(report_id): ApiPath<ReportId>,
) -> Result<Json<Report>, ApiError> {
    let op = Operation::new("analytics.get_report")
        .caller(caller)
        .entity("report_id", report_id);
    services
        .errors
        .check(&op, services.analytics.get_report(caller, report_id).await)
        .map(Json)
}

pub async fn public_stats(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<PublicStats>, ApiError> {
    let op = Operation::new("analytics.public_stats");
    services
        .errors
        .check(&op, services.analytics.public_stats().await)
        .map(Json)
}

pub async fn platform_kpis(
    Extension(services): Extension<Arc<AppServices>>,
    ApiQuery(filter): ApiQuery<DateRangeFilter>,
) -> Result<Json<PlatformKpis>, ApiError> {
    let op = Operation::new("analytics.platform_kpis");
    services
        .errors
        .check(&op, services.analytics.platform_kpis(filter).await)
        .map(Json)
}
