use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;

use gamehub_core::{BackupId, RestoreJobId, ServiceError, ServiceResult, UserId};

use super::Guarded;
use crate::backup::{
    Backup, BackupFilter, BackupRecoveryService, BackupSchedule, BackupStatus, CreateBackupRequest,
    RestoreJob, RestoreStatus,
};
use crate::filter::Page;

/// Nominal archive size: 64 MiB base, four times that with mods.
const BASE_BACKUP_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Default)]
struct State {
    backups: HashMap<BackupId, Backup>,
    restores: HashMap<RestoreJobId, RestoreJob>,
    schedules: HashMap<UserId, BackupSchedule>,
}

impl State {
    fn owned_backup(&self, caller: UserId, backup_id: BackupId) -> ServiceResult<&Backup> {
        let backup = self.backups.get(&backup_id).ok_or(ServiceError::NotFound)?;
        if backup.owner_id != caller {
            return Err(ServiceError::Forbidden);
        }
        Ok(backup)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryBackupRecoveryService {
    state: Guarded<State>,
}

impl InMemoryBackupRecoveryService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BackupRecoveryService for InMemoryBackupRecoveryService {
    async fn list_backups(&self, caller: UserId, filter: BackupFilter) -> ServiceResult<Page<Backup>> {
        let state = self.state.lock()?;
        let mut mine: Vec<Backup> = state
            .backups
            .values()
            .filter(|b| b.owner_id == caller)
            .filter(|b| filter.status.is_none_or(|s| b.status == s))
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(filter.paging().paginate(mine))
    }

    async fn create_backup(&self, caller: UserId, request: CreateBackupRequest) -> ServiceResult<Backup> {
        let backup = Backup {
            id: BackupId::new(),
            owner_id: caller,
            label: request.label,
            game_id: request.game_id,
            include_mods: request.include_mods,
            status: BackupStatus::Completed,
            size_bytes: if request.include_mods {
                BASE_BACKUP_BYTES * 4
            } else {
                BASE_BACKUP_BYTES
            },
            created_at: Utc::now(),
        };
        self.state.lock()?.backups.insert(backup.id, backup.clone());
        tracing::debug!(backup_id = %backup.id, owner_id = %caller, "backup created");
        Ok(backup)
    }

    async fn get_backup(&self, caller: UserId, backup_id: BackupId) -> ServiceResult<Backup> {
        self.state.lock()?.owned_backup(caller, backup_id).cloned()
    }

    async fn delete_backup(&self, caller: UserId, backup_id: BackupId) -> ServiceResult<()> {
        let mut state = self.state.lock()?;
        state.owned_backup(caller, backup_id)?;
        if state
            .restores
            .values()
            .any(|r| r.backup_id == backup_id && r.status == RestoreStatus::Running)
        {
            return Err(ServiceError::invalid_state("backup is being restored"));
        }
        state.backups.remove(&backup_id);
        Ok(())
    }

    async fn restore_backup(&self, caller: UserId, backup_id: BackupId) -> ServiceResult<RestoreJob> {
        let mut state = self.state.lock()?;
        let backup = state.owned_backup(caller, backup_id)?;
        if backup.status != BackupStatus::Completed {
            return Err(ServiceError::invalid_state("only completed backups can be restored"));
        }

        let now = Utc::now();
        let job = RestoreJob {
            id: RestoreJobId::new(),
            backup_id,
            requested_by: caller,
            status: RestoreStatus::Completed,
            requested_at: now,
            completed_at: Some(now),
        };
        state.restores.insert(job.id, job.clone());
        Ok(job)
    }

    async fn get_restore_job(&self, caller: UserId, restore_id: RestoreJobId) -> ServiceResult<RestoreJob> {
        let state = self.state.lock()?;
        let job = state.restores.get(&restore_id).ok_or(ServiceError::NotFound)?;
        if job.requested_by != caller {
            return Err(ServiceError::Forbidden);
        }
        Ok(job.clone())
    }

    async fn get_schedule(&self, caller: UserId) -> ServiceResult<BackupSchedule> {
        Ok(self
            .state
            .lock()?
            .schedules
            .get(&caller)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_schedule(&self, caller: UserId, schedule: BackupSchedule) -> ServiceResult<BackupSchedule> {
        self.state.lock()?.schedules.insert(caller, schedule.clone());
        Ok(schedule)
    }
}
