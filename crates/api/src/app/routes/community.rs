use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::Response,
    routing::{get, post, put},
    Json, Router,
};

use gamehub_core::{CommunityId, UserId};
use gamehub_services::community::{
    ActivityEntry, ActivityFilter, Community, CommunitySearchFilter, CreateCommunityRequest,
    Membership, PublicProfile, TrendingFilter, UpdateCommunityRequest,
};
use gamehub_services::Page;

use crate::app::errors::{ApiError, Operation};
use crate::app::extract::{ApiJson, ApiPath, ApiQuery};
use crate::app::routes::common::{created, no_content};
use crate::app::services::AppServices;
use crate::context::Caller;

/// Anonymous discovery endpoints.
pub fn public_router() -> Router {
    Router::new()
        .route("/search", get(search_communities))
        .route("/trending", get(trending_communities))
        .route("/slug/:slug", get(get_community_by_slug))
        .route("/users/:user_id/profile", get(public_profile))
        .route("/:community_id", get(get_community))
        .route("/:community_id/activity", get(community_activity))
}

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_community))
        .route("/mine", get(my_communities))
        .route(
            "/:community_id",
            put(update_community).delete(delete_community),
        )
        .route("/:community_id/join", post(join_community))
        .route("/:community_id/leave", post(leave_community))
}

pub async fn create_community(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiJson(body): ApiJson<CreateCommunityRequest>,
) -> Result<Response, ApiError> {
    let op = Operation::new("community.create").caller(caller);
    let community = services
        .errors
        .check(&op, services.community.create_community(caller, body).await)?;

    Ok(created(format!("/api/community/{}", community.id), community))
}

pub async fn get_community(
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(community_id): ApiPath<CommunityId>,
) -> Result<Json<Community>, ApiError> {
    let op = Operation::new("community.get").entity("community_id", community_id);
    services
        .errors
        .check(&op, services.community.get_community(community_id).await)
        .map(Json)
}

pub async fn get_community_by_slug(
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<Community>, ApiError> {
    let op = Operation::new("community.get_by_slug").entity("slug", &slug);
    services
        .errors
        .check(&op, services.community.get_community_by_slug(slug).await)
        .map(Json)
}

pub async fn search_communities(
    Extension(services): Extension<Arc<AppServices>>,
    ApiQuery(filter): ApiQuery<CommunitySearchFilter>,
) -> Result<Json<Page<Community>>, ApiError> {
    let op = Operation::new("community.search");
    services
        .errors
        .check(&op, services.community.search_communities(filter).await)
        .map(Json)
}

pub async fn trending_communities(
    Extension(services): Extension<Arc<AppServices>>,
    ApiQuery(filter): ApiQuery<TrendingFilter>,
) -> Result<Json<Vec<Community>>, ApiError> {
    let op = Operation::new("community.trending");
    services
        .errors
        .check(&op, services.community.trending_communities(filter).await)
        .map(Json)
}

pub async fn my_communities(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
) -> Result<Json<Vec<Community>>, ApiError> {
    let op = Operation::new("community.mine").caller(caller);
    services
        .errors
        .check(&op, services.community.my_communities(caller).await)
        .map(Json)
}

pub async fn update_community(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(community_id): ApiPath<CommunityId>,
    ApiJson(body): ApiJson<UpdateCommunityRequest>,
) -> Result<Json<Community>, ApiError> {
    let op = Operation::new("community.update")
        .caller(caller)
        .entity("community_id", community_id);
    services
        .errors
        .check(
            &op,
            services.community.update_community(caller, community_id, body).await,
        )
        .map(Json)
}

pub async fn delete_community(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(community_id): ApiPath<CommunityId>,
) -> Result<StatusCode, ApiError> {
    let op = Operation::new("community.delete")
        .caller(caller)
        .entity("community_id", community_id);
    services
        .errors
        .check(&op, services.community.delete_community(caller, community_id).await)?;
    Ok(no_content())
}

pub async fn join_community(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(community_id): ApiPath<CommunityId>,
) -> Result<Json<Membership>, ApiError> {
    let op = Operation::new("community.join")
        .caller(caller)
        .entity("community_id", community_id);
    services
        .errors
        .check(&op, services.community.join_community(caller, community_id).await)
        .map(Json)
}

pub async fn leave_community(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(community_id): ApiPath<CommunityId>,
) -> Result<StatusCode, ApiError> {
    let op = Operation::new("community.leave")
        .caller(caller)
        .entity("community_id", community_id);
    services
        .errors
        .check(&op, services.community.leave_community(caller, community_id).await)?;
    Ok(no_content())
}

pub async fn community_activity(
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(community_id): ApiPath<CommunityId>,
    ApiQuery(filter): ApiQuery<ActivityFilter>,
) -> Result<Json<Page<ActivityEntry>>, ApiError> {
    let op = Operation::new("community.activity").entity("community_id", community_id);
    services
        .errors
        .check(
            &op,
            services.community.community_activity(community_id, filter).await,
        )
        .map(Json)
}

pub async fn public_profile(
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<PublicProfile>, ApiError> {
    let op = Operation::new("community.public_profile").entity("user_id", user_id);
    services
        .errors
        .check(&op, services.community.public_profile(user_id).await)
        .map(Json)
}
