use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use gamehub_core::{OrganizationId, ServiceError, ServiceResult, UserId};

use super::Guarded;
use crate::filter::Page;
use crate::organization::{
    AddMemberRequest, AuditEntry, AuditLogFilter, CreateOrganizationRequest, EnterpriseAdminService,
    Organization, OrganizationMember, OrganizationRole, UpdateOrganizationRequest,
};

#[derive(Debug, Default)]
struct State {
    organizations: HashMap<OrganizationId, Organization>,
    members: Vec<OrganizationMember>,
    audit: Vec<AuditEntry>,
}

impl State {
    fn organization(&self, id: OrganizationId) -> ServiceResult<&Organization> {
        self.organizations.get(&id).ok_or(ServiceError::NotFound)
    }

    fn role_of(&self, id: OrganizationId, user: UserId) -> Option<OrganizationRole> {
        self.members
            .iter()
            .find(|m| m.organization_id == id && m.user_id == user)
            .map(|m| m.role)
    }

    fn member_count(&self, id: OrganizationId) -> usize {
        self.members.iter().filter(|m| m.organization_id == id).count()
    }

    /// Any member may read; only owners and admins may change things.
    fn require(&self, id: OrganizationId, caller: UserId, manage: bool) -> ServiceResult<()> {
        self.organization(id)?;
        match self.role_of(id, caller) {
            Some(OrganizationRole::Owner | OrganizationRole::Admin) => Ok(()),
            Some(OrganizationRole::Member) if !manage => Ok(()),
            _ => Err(ServiceError::Forbidden),
        }
    }

    fn audit(&mut self, id: OrganizationId, actor: UserId, action: &str, target: Option<String>) {
        self.audit.push(AuditEntry {
            id: Uuid::now_v7(),
            organization_id: id,
            actor_id: actor,
            action: action.to_string(),
            target,
            occurred_at: Utc::now(),
        });
    }
}

#[derive(Debug, Default)]
pub struct InMemoryEnterpriseAdminService {
    state: Guarded<State>,
}

impl InMemoryEnterpriseAdminService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EnterpriseAdminService for InMemoryEnterpriseAdminService {
    async fn create_organization(
        &self,
        caller: UserId,
        request: CreateOrganizationRequest,
    ) -> ServiceResult<Organization> {
        let plan = request.plan.unwrap_or_default();
        let now = Utc::now();
        let organization = Organization {
            id: OrganizationId::new(),
            name: request.name,
            owner_id: caller,
            plan,
            seat_limit: request.seat_limit.unwrap_or_else(|| plan.default_seats()),
            created_at: now,
            updated_at: now,
        };

        let mut state = self.state.lock()?;
        state.organizations.insert(organization.id, organization.clone());
        state.members.push(OrganizationMember {
            organization_id: organization.id,
            user_id: caller,
            role: OrganizationRole::Owner,
            added_at: now,
        });
        state.audit(organization.id, caller, "organization.created", None);
        Ok(organization)
    }

    async fn get_organization(
        &self,
        caller: UserId,
        organization_id: OrganizationId,
    ) -> ServiceResult<Organization> {
        let state = self.state.lock()?;
        state.require(organization_id, caller, false)?;
        state.organization(organization_id).cloned()
    }

    async fn update_organization(
        &self,
        caller: UserId,
        organization_id: OrganizationId,
        request: UpdateOrganizationRequest,
    ) -> ServiceResult<Organization> {
        let mut state = self.state.lock()?;
        state.require(organization_id, caller, true)?;

        let members = state.member_count(organization_id);
        if (request.seat_limit as usize) < members {
            return Err(ServiceError::invalid_state(format!(
                "seat_limit {} is below the current member count {members}",
                request.seat_limit
            )));
        }

        let organization = state
            .organizations
            .get_mut(&organization_id)
            .ok_or(ServiceError::NotFound)?;
        organization.name = request.name;
        organization.plan = request.plan;
        organization.seat_limit = request.seat_limit;
        organization.updated_at = Utc::now();
        let updated = organization.clone();

        state.audit(organization_id, caller, "organization.updated", None);
        Ok(updated)
    }

    async fn list_members(
        &self,
        caller: UserId,
        organization_id: OrganizationId,
    ) -> ServiceResult<Vec<OrganizationMember>> {
        let state = self.state.lock()?;
        state.require(organization_id, caller, false)?;
        Ok(state
            .members
            .iter()
            .filter(|m| m.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn add_member(
        &self,
        caller: UserId,
        organization_id: OrganizationId,
        request: AddMemberRequest,
    ) -> ServiceResult<OrganizationMember> {
        let role = request.role.unwrap_or(OrganizationRole::Member);
        if role == OrganizationRole::Owner {
            return Err(ServiceError::invalid_argument("an organization has exactly one owner"));
        }

        let mut state = self.state.lock()?;
        state.require(organization_id, caller, true)?;
        if state.role_of(organization_id, request.user_id).is_some() {
            return Err(ServiceError::invalid_state("user is already a member"));
        }
        let seat_limit = state.organization(organization_id)?.seat_limit as usize;
        if state.member_count(organization_id) >= seat_limit {
            return Err(ServiceError::invalid_state("organization has no free seats"));
        }

        let member = OrganizationMember {
            organization_id,
            user_id: request.user_id,
            role,
            added_at: Utc::now(),
        };
        state.members.push(member.clone());
        state.audit(
            organization_id,
            caller,
            "member.added",
            Some(request.user_id.to_string()),
        );
        Ok(member)
    }

    async fn remove_member(
        &self,
        caller: UserId,
        organization_id: OrganizationId,
        user_id: UserId,
    ) -> ServiceResult<()> {
        let mut state = self.state.lock()?;
        state.require(organization_id, caller, true)?;
        match state.role_of(organization_id, user_id) {
            None => return Err(ServiceError::NotFound),
            Some(OrganizationRole::Owner) => {
                return Err(ServiceError::invalid_state("the owner cannot be removed"));
            }
            Some(_) => {}
        }

        state
            .members
            .retain(|m| !(m.organization_id == organization_id && m.user_id == user_id));
        state.audit(organization_id, caller, "member.removed", Some(user_id.to_string()));
        Ok(())
    }

    async fn audit_log(
        &self,
        organization_id: OrganizationId,
        filter: AuditLogFilter,
    ) -> ServiceResult<Page<AuditEntry>> {
        let state = self.state.lock()?;
        state.organization(organization_id)?;

        let mut entries: Vec<AuditEntry> = state
            .audit
            .iter()
            .filter(|e| e.organization_id == organization_id)
            .filter(|e| filter.from.is_none_or(|from| e.occurred_at >= from))
            .filter(|e| filter.to.is_none_or(|to| e.occurred_at < to))
            .filter(|e| filter.action.as_deref().is_none_or(|a| e.action == a))
            .cloned()
            .collect();
        entries.reverse();
        Ok(filter.paging().paginate(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organization::OrganizationPlan;

    fn create(seats: u32) -> CreateOrganizationRequest {
        CreateOrganizationRequest {
            name: "Studio".into(),
            plan: Some(OrganizationPlan::Team),
            seat_limit: Some(seats),
        }
    }

    fn add(user: UserId) -> AddMemberRequest {
        AddMemberRequest {
            user_id: user,
            role: None,
        }
    }

    #[tokio::test]
    async fn seat_limit_is_enforced() {
        let svc = InMemoryEnterpriseAdminService::new();
        let owner = UserId::new();
        let org = svc.create_organization(owner, create(2)).await.unwrap();

        svc.add_member(owner, org.id, add(UserId::new())).await.unwrap();
        let err = svc.add_member(owner, org.id, add(UserId::new())).await.unwrap_err();
        assert_eq!(err, ServiceError::invalid_state("organization has no free seats"));
    }

    #[tokio::test]
    async fn plain_members_can_read_but_not_manage() {
        let svc = InMemoryEnterpriseAdminService::new();
        let owner = UserId::new();
        let member = UserId::new();
        let org = svc.create_organization(owner, create(10)).await.unwrap();
        svc.add_member(owner, org.id, add(member)).await.unwrap();

        assert!(svc.get_organization(member, org.id).await.is_ok());
        assert_eq!(
            svc.add_member(member, org.id, add(UserId::new())).await,
            Err(ServiceError::Forbidden)
        );
        assert_eq!(
            svc.get_organization(UserId::new(), org.id).await,
            Err(ServiceError::Forbidden)
        );
    }

    #[tokio::test]
    async fn owner_cannot_be_removed() {
        let svc = InMemoryEnterpriseAdminService::new();
        let owner = UserId::new();
        let org = svc.create_organization(owner, create(10)).await.unwrap();
        assert!(matches!(
            svc.remove_member(owner, org.id, owner).await,
            Err(ServiceError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn audit_log_filters_by_action() {
        let svc = InMemoryEnterpriseAdminService::new();
        let owner = UserId::new();
        let org = svc.create_organization(owner, create(10)).await.unwrap();
        let member = UserId::new();
        svc.add_member(owner, org.id, add(member)).await.unwrap();
        svc.remove_member(owner, org.id, member).await.unwrap();

        let page = svc
            .audit_log(
                org.id,
                AuditLogFilter {
                    action: Some("member.added".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].target.as_deref(), Some(member.to_string().as_str()));

        let all = svc.audit_log(org.id, AuditLogFilter::default()).await.unwrap();
        assert_eq!(all.total, 3);
    }
}
