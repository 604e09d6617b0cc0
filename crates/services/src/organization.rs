//! Enterprise administration: organizations, seats and the admin audit log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use gamehub_core::{OrganizationId, ServiceResult, UserId};

use crate::filter::{validate_date_range, Page, PageRequest};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationPlan {
    #[default]
    Team,
    Business,
    Enterprise,
}

impl OrganizationPlan {
    pub fn default_seats(&self) -> u32 {
        match self {
            OrganizationPlan::Team => 10,
            OrganizationPlan::Business => 100,
            OrganizationPlan::Enterprise => 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub owner_id: UserId,
    pub plan: OrganizationPlan,
    pub seat_limit: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    pub plan: Option<OrganizationPlan>,

    #[validate(range(min = 1, max = 10000, message = "seat_limit must be between 1 and 10000"))]
    pub seat_limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    pub plan: OrganizationPlan,

    #[validate(range(min = 1, max = 10000, message = "seat_limit must be between 1 and 10000"))]
    pub seat_limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationRole {
    Owner,
    Admin,
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMember {
    pub organization_id: OrganizationId,
    pub user_id: UserId,
    pub role: OrganizationRole,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AddMemberRequest {
    pub user_id: UserId,
    pub role: Option<OrganizationRole>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_audit_log_filter"))]
pub struct AuditLogFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 64, message = "action must be 1-64 characters"))]
    pub action: Option<String>,

    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: Option<u32>,
}

impl AuditLogFilter {
    pub fn paging(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}

fn validate_audit_log_filter(filter: &AuditLogFilter) -> Result<(), ValidationError> {
    validate_date_range(filter.from, filter.to)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub organization_id: OrganizationId,
    pub actor_id: UserId,
    pub action: String,
    pub target: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait EnterpriseAdminService {
    async fn create_organization(
        &self,
        caller: UserId,
        request: CreateOrganizationRequest,
    ) -> ServiceResult<Organization>;

    async fn get_organization(
        &self,
        caller: UserId,
        organization_id: OrganizationId,
    ) -> ServiceResult<Organization>;

    async fn update_organization(
        &self,
        caller: UserId,
        organization_id: OrganizationId,
        request: UpdateOrganizationRequest,
    ) -> ServiceResult<Organization>;

    async fn list_members(
        &self,
        caller: UserId,
        organization_id: OrganizationId,
    ) -> ServiceResult<Vec<OrganizationMember>>;

    async fn add_member(
        &self,
        caller: UserId,
        organization_id: OrganizationId,
        request: AddMemberRequest,
    ) -> ServiceResult<OrganizationMember>;

    async fn remove_member(
        &self,
        caller: UserId,
        organization_id: OrganizationId,
        user_id: UserId,
    ) -> ServiceResult<()>;

    async fn audit_log(
        &self,
        organization_id: OrganizationId,
        filter: AuditLogFilter,
    ) -> ServiceResult<Page<AuditEntry>>;
}
