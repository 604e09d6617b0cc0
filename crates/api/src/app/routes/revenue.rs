use std::sync::Arc;

use axum::{
    extract::Extension,
    middleware::from_fn_with_state,
    response::Response,
    routing::{get, post},
    Json, Router,
};

use gamehub_auth::Role;
use gamehub_core::SubscriptionId;
use gamehub_services::revenue::{
    CreateSubscriptionRequest, EarningsSummary, Payout, PayoutRequest, PlatformRevenueReport,
    Subscription,
};
use gamehub_services::DateRangeFilter;

use crate::app::errors::{ApiError, Operation};
use crate::app::extract::{ApiJson, ApiPath, ApiQuery};
use crate::app::routes::common::created;
use crate::app::services::AppServices;
use crate::context::Caller;
use crate::middleware::require_role;

pub fn router() -> Router {
    let finance = Router::new()
        .route("/reports/platform", get(platform_report))
        .route_layer(from_fn_with_state(Role::FINANCE, require_role));

    Router::new()
        .route(
            "/subscriptions",
            get(list_subscriptions).post(create_subscription),
        )
        .route("/subscriptions/:subscription_id", get(get_subscription))
        .route(
            "/subscriptions/:subscription_id/cancel",
            post(cancel_subscription),
        )
        .route("/earnings", get(earnings))
        .route("/payouts", post(request_payout))
        .merge(finance)
}

pub async fn list_subscriptions(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
) -> Result<Json<Vec<Subscription>>, ApiError> {
    let op = Operation::new("revenue.list_subscriptions").caller(caller);
    services
        .errors
        .check(&op, services.revenue.list_subscriptions(caller).await)
        .map(Json)
}

pub async fn create_subscription(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiJson(body): ApiJson<CreateSubscriptionRequest>,
) -> Result<Response, ApiError> {
    let op = Operation::new("revenue.create_subscription").caller(caller);
    let subscription = services
        .errors
        .check(&op, services.revenue.create_subscription(caller, body).await)?;

    Ok(created(
        format!("/api/revenue/subscriptions/{}", subscription.id),
        subscription,
    ))
}

pub async fn get_subscription(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(subscription_id): ApiPath<SubscriptionId>,
) -> Result<Json<Subscription>, ApiError> {
    let op = Operation::new("revenue.get_subscription")
        .caller(caller)
        .entity("subscription_id", subscription_id);
    services
        .errors
        .check(&op, services.revenue.get_subscription(caller, subscription_id).await)
        .map(Json)
}

pub async fn cancel_subscription(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(subscription_id): ApiPath<SubscriptionId>,
) -> Result<Json<Subscription>, ApiError> {
    let op = Operation::new("revenue.cancel_subscription")
        .caller(caller)
        .entity("subscription_id", subscription_id);
    services
        .errors
        .check(
            &op,
            services.revenue.cancel_subscription(caller, subscription_id).await,
        )
        .map(Json)
}

pub async fn earnings(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiQuery(filter): ApiQuery<DateRangeFilter>,
) -> Result<Json<EarningsSummary>, ApiError> {
    let op = Operation::new("revenue.earnings").caller(caller);
    services
        .errors
        .check(&op, services.revenue.earnings(caller, filter).await)
        .map(Json)
}

pub async fn request_payout(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiJson(body): ApiJson<PayoutRequest>,
) -> Result<Json<Payout>, ApiError> {
    let op = Operation::new("revenue.request_payout")
        .caller(caller)
        .entity("amount_cents", body.amount_cents);
    services
        .errors
        .check(&op, services.revenue.request_payout(caller, body).await)
        .map(Json)
}

/// Platform-wide revenue. Gated on the finance role rather than an identity.
pub async fn platform_report(
    Extension(services): Extension<Arc<AppServices>>,
    ApiQuery(filter): ApiQuery<DateRangeFilter>,
) -> Result<Json<PlatformRevenueReport>, ApiError> {
    let op = Operation::new("revenue.platform_report");
    services
        .errors
        .check(&op, services.revenue.platform_report(filter).await)
        .map(Json)
}
