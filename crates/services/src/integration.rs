//! Cross-platform integration: linked store accounts and mod synchronisation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use gamehub_core::{ConnectionId, GameId, ModId, ServiceResult, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Steam,
    Epic,
    Gog,
    Xbox,
    PlayStation,
    Nintendo,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Steam,
        Platform::Epic,
        Platform::Gog,
        Platform::Xbox,
        Platform::PlayStation,
        Platform::Nintendo,
    ];

    /// PC storefronts share save data through the platform cloud.
    pub fn is_pc_store(&self) -> bool {
        matches!(self, Platform::Steam | Platform::Epic | Platform::Gog)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConnection {
    pub id: ConnectionId,
    pub user_id: UserId,
    pub platform: Platform,
    pub external_account_id: String,
    pub connected_at: DateTime<Utc>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ConnectPlatformRequest {
    pub platform: Platform,

    #[validate(length(min = 1, max = 128, message = "external_account_id must be 1-128 characters"))]
    pub external_account_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SyncModRequest {
    #[validate(length(min = 1, message = "at least one platform is required"))]
    pub platforms: Vec<Platform>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncJob {
    pub id: Uuid,
    pub mod_id: ModId,
    pub requested_by: UserId,
    pub platforms: Vec<Platform>,
    pub status: SyncStatus,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedPlatform {
    pub game_id: GameId,
    pub platform: Platform,
    pub cross_save: bool,
    pub cross_play: bool,
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait CrossPlatformIntegrationService {
    async fn list_connections(&self, caller: UserId) -> ServiceResult<Vec<PlatformConnection>>;

    async fn connect_platform(
        &self,
        caller: UserId,
        request: ConnectPlatformRequest,
    ) -> ServiceResult<PlatformConnection>;

    async fn get_connection(
        &self,
        caller: UserId,
        connection_id: ConnectionId,
    ) -> ServiceResult<PlatformConnection>;

    async fn disconnect_platform(&self, caller: UserId, connection_id: ConnectionId) -> ServiceResult<()>;

    /// Queue a push of the mod to each requested platform. Every platform
    /// must be linked to the caller's account.
    async fn sync_mod(&self, caller: UserId, mod_id: ModId, request: SyncModRequest) -> ServiceResult<SyncJob>;

    async fn supported_platforms(&self, game_id: GameId) -> ServiceResult<Vec<SupportedPlatform>>;
}
