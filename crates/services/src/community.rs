//! Community service boundary: creation, discovery and membership.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use gamehub_core::{CommunityId, GameId, ServiceResult, UserId};

use crate::filter::{Page, PageRequest};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub id: CommunityId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub game_id: Option<GameId>,
    pub owner_id: UserId,
    pub member_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateCommunityRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_slug"))]
    pub slug: String,

    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub game_id: Option<GameId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdateCommunityRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Slugs are 3-64 characters of lowercase ASCII letters, digits and hyphens.
fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let well_formed = (3..=64).contains(&slug.len())
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-');

    if well_formed {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug");
        err.message = Some("slug must be 3-64 lowercase letters, digits or hyphens".into());
        Err(err)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CommunitySearchFilter {
    #[validate(length(max = 100, message = "query must be at most 100 characters"))]
    pub query: Option<String>,

    pub game_id: Option<GameId>,

    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: Option<u32>,
}

impl CommunitySearchFilter {
    pub fn paging(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TrendingFilter {
    #[validate(range(min = 1, max = 50, message = "limit must be between 1 and 50"))]
    pub limit: Option<u32>,
}

impl TrendingFilter {
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT) as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ActivityFilter {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: Option<u32>,
}

impl ActivityFilter {
    pub fn paging(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Moderator,
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub community_id: CommunityId,
    pub user_id: UserId,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Created,
    Updated,
    Joined,
    Left,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub community_id: CommunityId,
    pub actor_id: UserId,
    pub kind: ActivityKind,
    pub occurred_at: DateTime<Utc>,
}

/// What anyone can see about a user's community footprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
    pub user_id: UserId,
    pub community_count: u64,
    pub owned_community_count: u64,
    pub member_since: DateTime<Utc>,
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait CommunityService {
    async fn create_community(
        &self,
        caller: UserId,
        request: CreateCommunityRequest,
    ) -> ServiceResult<Community>;

    async fn get_community(&self, community_id: CommunityId) -> ServiceResult<Community>;

    async fn get_community_by_slug(&self, slug: String) -> ServiceResult<Community>;

    async fn search_communities(&self, filter: CommunitySearchFilter) -> ServiceResult<Page<Community>>;

    async fn trending_communities(&self, filter: TrendingFilter) -> ServiceResult<Vec<Community>>;

    /// Communities the caller belongs to, owned ones included.
    async fn my_communities(&self, caller: UserId) -> ServiceResult<Vec<Community>>;

    async fn update_community(
        &self,
        caller: UserId,
        community_id: CommunityId,
        request: UpdateCommunityRequest,
    ) -> ServiceResult<Community>;

    async fn delete_community(&self, caller: UserId, community_id: CommunityId) -> ServiceResult<()>;

    async fn join_community(&self, caller: UserId, community_id: CommunityId) -> ServiceResult<Membership>;

    async fn leave_community(&self, caller: UserId, community_id: CommunityId) -> ServiceResult<()>;

    async fn community_activity(
        &self,
        community_id: CommunityId,
        filter: ActivityFilter,
    ) -> ServiceResult<Page<ActivityEntry>>;

    async fn public_profile(&self, user_id: UserId) -> ServiceResult<PublicProfile>;
}
