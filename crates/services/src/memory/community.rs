use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use gamehub_core::{CommunityId, ServiceError, ServiceResult, UserId};

use super::Guarded;
use crate::community::{
    ActivityEntry, ActivityFilter, ActivityKind, Community, CommunitySearchFilter, CommunityService,
    CreateCommunityRequest, MemberRole, Membership, PublicProfile, TrendingFilter,
    UpdateCommunityRequest,
};
use crate::filter::Page;

#[derive(Debug, Default)]
struct State {
    communities: HashMap<CommunityId, Community>,
    memberships: Vec<Membership>,
    activity: Vec<ActivityEntry>,
}

impl State {
    fn community(&self, id: CommunityId) -> ServiceResult<&Community> {
        self.communities.get(&id).ok_or(ServiceError::NotFound)
    }

    fn membership(&self, community_id: CommunityId, user_id: UserId) -> Option<&Membership> {
        self.memberships
            .iter()
            .find(|m| m.community_id == community_id && m.user_id == user_id)
    }

    fn record(&mut self, community_id: CommunityId, actor_id: UserId, kind: ActivityKind) {
        self.activity.push(ActivityEntry {
            id: Uuid::now_v7(),
            community_id,
            actor_id,
            kind,
            occurred_at: Utc::now(),
        });
    }

    fn owned_by(&self, caller: UserId, id: CommunityId) -> ServiceResult<()> {
        if self.community(id)?.owner_id == caller {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }

    fn set_member_count(&mut self, id: CommunityId) {
        let count = self.memberships.iter().filter(|m| m.community_id == id).count() as u64;
        if let Some(c) = self.communities.get_mut(&id) {
            c.member_count = count;
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCommunityService {
    state: Guarded<State>,
}

impl InMemoryCommunityService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommunityService for InMemoryCommunityService {
    async fn create_community(
        &self,
        caller: UserId,
        request: CreateCommunityRequest,
    ) -> ServiceResult<Community> {
        let mut state = self.state.lock()?;
        if state.communities.values().any(|c| c.slug == request.slug) {
            return Err(ServiceError::invalid_argument(format!(
                "slug '{}' is already taken",
                request.slug
            )));
        }

        let now = Utc::now();
        let community = Community {
            id: CommunityId::new(),
            slug: request.slug,
            name: request.name,
            description: request.description,
            game_id: request.game_id,
            owner_id: caller,
            member_count: 1,
            created_at: now,
            updated_at: now,
        };

        state.communities.insert(community.id, community.clone());
        state.memberships.push(Membership {
            community_id: community.id,
            user_id: caller,
            role: MemberRole::Owner,
            joined_at: now,
        });
        state.record(community.id, caller, ActivityKind::Created);
        tracing::debug!(community_id = %community.id, owner_id = %caller, "community created");
        Ok(community)
    }

    async fn get_community(&self, community_id: CommunityId) -> ServiceResult<Community> {
        self.state.lock()?.community(community_id).cloned()
    }

    async fn get_community_by_slug(&self, slug: String) -> ServiceResult<Community> {
        self.state
            .lock()?
            .communities
            .values()
            .find(|c| c.slug == slug)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }

    async fn search_communities(&self, filter: CommunitySearchFilter) -> ServiceResult<Page<Community>> {
        let state = self.state.lock()?;
        let needle = filter.query.as_deref().map(str::to_lowercase);

        let mut hits: Vec<Community> = state
            .communities
            .values()
            .filter(|c| filter.game_id.is_none_or(|g| c.game_id == Some(g)))
            .filter(|c| {
                needle.as_deref().is_none_or(|n| {
                    c.name.to_lowercase().contains(n) || c.slug.contains(n)
                })
            })
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Ok(filter.paging().paginate(hits))
    }

    async fn trending_communities(&self, filter: TrendingFilter) -> ServiceResult<Vec<Community>> {
        let state = self.state.lock()?;
        let mut all: Vec<Community> = state.communities.values().cloned().collect();
        all.sort_by(|a, b| {
            b.member_count
                .cmp(&a.member_count)
                .then(b.created_at.cmp(&a.created_at))
        });
        all.truncate(filter.limit());
        Ok(all)
    }

    async fn my_communities(&self, caller: UserId) -> ServiceResult<Vec<Community>> {
        let state = self.state.lock()?;
        Ok(state
            .memberships
            .iter()
            .filter(|m| m.user_id == caller)
            .filter_map(|m| state.communities.get(&m.community_id).cloned())
            .collect())
    }

    async fn update_community(
        &self,
        caller: UserId,
        community_id: CommunityId,
        request: UpdateCommunityRequest,
    ) -> ServiceResult<Community> {
        let mut state = self.state.lock()?;
        state.owned_by(caller, community_id)?;

        let community = state
            .communities
            .get_mut(&community_id)
            .ok_or(ServiceError::NotFound)?;
        if let Some(name) = request.name {
            community.name = name;
        }
        if request.description.is_some() {
            community.description = request.description;
        }
        community.updated_at = Utc::now();
        let updated = community.clone();

        state.record(community_id, caller, ActivityKind::Updated);
        Ok(updated)
    }

    async fn delete_community(&self, caller: UserId, community_id: CommunityId) -> ServiceResult<()> {
        let mut state = self.state.lock()?;
        state.owned_by(caller, community_id)?;

        state.communities.remove(&community_id);
        state.memberships.retain(|m| m.community_id != community_id);
        state.activity.retain(|a| a.community_id != community_id);
        tracing::debug!(%community_id, "community deleted");
        Ok(())
    }

    async fn join_community(&self, caller: UserId, community_id: CommunityId) -> ServiceResult<Membership> {
        let mut state = self.state.lock()?;
        state.community(community_id)?;
        if state.membership(community_id, caller).is_some() {
            return Err(ServiceError::invalid_state("already a member of this community"));
        }

        let membership = Membership {
            community_id,
            user_id: caller,
            role: MemberRole::Member,
            joined_at: Utc::now(),
        };
        state.memberships.push(membership.clone());
        state.set_member_count(community_id);
        state.record(community_id, caller, ActivityKind::Joined);
        Ok(membership)
    }

    async fn leave_community(&self, caller: UserId, community_id: CommunityId) -> ServiceResult<()> {
        let mut state = self.state.lock()?;
        state.community(community_id)?;
        match state.membership(community_id, caller).map(|m| m.role) {
            None => return Err(ServiceError::invalid_state("not a member of this community")),
            Some(MemberRole::Owner) => {
                return Err(ServiceError::invalid_state("the owner cannot leave their own community"));
            }
            Some(_) => {}
        }

        state
            .memberships
            .retain(|m| !(m.community_id == community_id && m.user_id == caller));
        state.set_member_count(community_id);
        state.record(community_id, caller, ActivityKind::Left);
        Ok(())
    }

    async fn community_activity(
        &self,
        community_id: CommunityId,
        filter: ActivityFilter,
    ) -> ServiceResult<Page<ActivityEntry>> {
        let state = self.state.lock()?;
        state.community(community_id)?;

        let mut entries: Vec<ActivityEntry> = state
            .activity
            .iter()
            .filter(|a| a.community_id == community_id)
            .cloned()
            .collect();
        entries.reverse();
        Ok(filter.paging().paginate(entries))
    }

    async fn public_profile(&self, user_id: UserId) -> ServiceResult<PublicProfile> {
        let state = self.state.lock()?;
        let memberships: Vec<&Membership> =
            state.memberships.iter().filter(|m| m.user_id == user_id).collect();

        let member_since = memberships
            .iter()
            .map(|m| m.joined_at)
            .min()
            .ok_or(ServiceError::NotFound)?;

        Ok(PublicProfile {
            user_id,
            community_count: memberships.len() as u64,
            owned_community_count: memberships
                .iter()
                .filter(|m| m.role == MemberRole::Owner)
                .count() as u64,
            member_since,
        })
    }
}
