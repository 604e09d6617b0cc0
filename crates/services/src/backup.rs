//! Backup and recovery of player data (saves, configs, installed mods).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use gamehub_core::{BackupId, GameId, RestoreJobId, ServiceResult, UserId};

use crate::filter::{Page, PageRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backup {
    pub id: BackupId,
    pub owner_id: UserId,
    pub label: String,
    pub game_id: Option<GameId>,
    pub include_mods: bool,
    pub status: BackupStatus,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateBackupRequest {
    #[validate(length(min = 1, max = 100, message = "label must be 1-100 characters"))]
    pub label: String,

    pub game_id: Option<GameId>,

    #[serde(default)]
    pub include_mods: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BackupFilter {
    pub status: Option<BackupStatus>,

    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: Option<u32>,
}

impl BackupFilter {
    pub fn paging(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreJob {
    pub id: RestoreJobId,
    pub backup_id: BackupId,
    pub requested_by: UserId,
    pub status: RestoreStatus,
    pub requested_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Automatic backup schedule. Used as both the PUT body and the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BackupSchedule {
    pub enabled: bool,

    #[validate(range(min = 1, max = 168, message = "interval_hours must be between 1 and 168"))]
    pub interval_hours: u32,

    #[validate(range(min = 1, max = 100, message = "retain must be between 1 and 100"))]
    pub retain: u32,
}

impl Default for BackupSchedule {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_hours: 24,
            retain: 7,
        }
    }
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait BackupRecoveryService {
    async fn list_backups(&self, caller: UserId, filter: BackupFilter) -> ServiceResult<Page<Backup>>;

    async fn create_backup(&self, caller: UserId, request: CreateBackupRequest) -> ServiceResult<Backup>;

    async fn get_backup(&self, caller: UserId, backup_id: BackupId) -> ServiceResult<Backup>;

    async fn delete_backup(&self, caller: UserId, backup_id: BackupId) -> ServiceResult<()>;

    /// Only completed backups can be restored.
    async fn restore_backup(&self, caller: UserId, backup_id: BackupId) -> ServiceResult<RestoreJob>;

    async fn get_restore_job(&self, caller: UserId, restore_id: RestoreJobId) -> ServiceResult<RestoreJob>;

    async fn get_schedule(&self, caller: UserId) -> ServiceResult<BackupSchedule>;

    async fn update_schedule(&self, caller: UserId, schedule: BackupSchedule) -> ServiceResult<BackupSchedule>;
}
