use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Response,
    routing::{delete, get, post},
    Json, Router,
};

use gamehub_auth::Role;
use gamehub_core::{OrganizationId, UserId};
use gamehub_services::organization::{
    AddMemberRequest, AuditEntry, AuditLogFilter, CreateOrganizationRequest, Organization,
    OrganizationMember, UpdateOrganizationRequest,
};
use gamehub_services::Page;

use crate::app::errors::{ApiError, Operation};
use crate::app::extract::{ApiJson, ApiPath, ApiQuery};
use crate::app::routes::common::{created, no_content};
use crate::app::services::AppServices;
use crate::context::Caller;
use crate::middleware::require_role;

pub fn router() -> Router {
    let admin = Router::new()
        .route("/:organization_id/audit-log", get(audit_log))
        .route_layer(from_fn_with_state(Role::ADMIN, require_role));

    Router::new()
        .route("/", post(create_organization))
        .route(
            "/:organization_id",
            get(get_organization).put(update_organization),
        )
        .route(
            "/:organization_id/members",
            get(list_members).post(add_member),
        )
        .route("/:organization_id/members/:user_id", delete(remove_member))
        .merge(admin)
}

pub async fn create_organization(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiJson(body): ApiJson<CreateOrganizationRequest>,
) -> Result<Response, ApiError> {
    let op = Operation::new("organizations.create").caller(caller);
    let organization = services
        .errors
        .check(&op, services.organizations.create_organization(caller, body).await)?;

    Ok(created(
        format!("/api/organizations/{}", organization.id),
        organization,
    ))
}

pub async fn get_organization(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(organization_id): ApiPath<OrganizationId>,
) -> Result<Json<Organization>, ApiError> {
    let op = Operation::new("organizations.get")
        .caller(caller)
        .entity("organization_id", organization_id);
    services
        .errors
        .check(
            &op,
            services.organizations.get_organization(caller, organization_id).await,
        )
        .map(Json)
}

pub async fn update_organization(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(organization_id): ApiPath<OrganizationId>,
    ApiJson(body): ApiJson<UpdateOrganizationRequest>,
) -> Result<Json<Organization>, ApiError> {
    let op = Operation::new("organizations.update")
        .caller(caller)
        .entity("organization_id", organization_id);
    services
        .errors
        .check(
            &op,
            services
                .organizations
                .update_organization(caller, organization_id, body)
                .await,
        )
        .map(Json)
}

pub async fn list_members(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(organization_id): ApiPath<OrganizationId>,
) -> Result<Json<Vec<OrganizationMember>>, ApiError> {
    let op = Operation::new("organizations.list_members")
        .caller(caller)
        .entity("organization_id", organization_id);
    services
        .errors
        .check(
            &op,
            services.organizations.list_members(caller, organization_id).await,
        )
        .map(Json)
}

pub async fn add_member(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(organization_id): ApiPath<OrganizationId>,
    ApiJson(body): ApiJson<AddMemberRequest>,
) -> Result<Json<OrganizationMember>, ApiError> {
    let op = Operation::new("organizations.add_member")
        .caller(caller)
        .entity("organization_id", organization_id)
        .entity("user_id", body.user_id);
    services
        .errors
        .check(
            &op,
            services
                .organizations
                .add_member(caller, organization_id, body)
                .await,
        )
        .map(Json)
}

pub async fn remove_member(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath((organization_id, user_id)): ApiPath<(OrganizationId, UserId)>,
) -> Result<StatusCode, ApiError> {
    let op = Operation::new("organizations.remove_member")
        .caller(caller)
        .entity("organization_id", organization_id)
        .entity("user_id", user_id);
    services.errors.check(
        &op,
        services
            .organizations
            .remove_member(caller, organization_id, user_id)
            .await,
    )?;
    Ok(no_content())
}

/// Organization audit trail, admin only.
pub async fn audit_log(
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(organization_id): ApiPath<OrganizationId>,
    ApiQuery(filter): ApiQuery<AuditLogFilter>,
) -> Result<Json<Page<AuditEntry>>, ApiError> {
    let op = Operation::new("organizations.audit_log").entity("organization_id", organization_id);
    services
        .errors
        .check(&op, services.organizations.audit_log(organization_id, filter).await)
        .map(Json)
}
