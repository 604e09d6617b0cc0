use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use gamehub_core::{ConnectionId, GameId, ModId, ServiceError, ServiceResult, UserId};

use super::Guarded;
use crate::integration::{
    ConnectPlatformRequest, CrossPlatformIntegrationService, Platform, PlatformConnection,
    SupportedPlatform, SyncJob, SyncModRequest, SyncStatus,
};

#[derive(Debug, Default)]
struct State {
    connections: HashMap<ConnectionId, PlatformConnection>,
    jobs: Vec<SyncJob>,
}

#[derive(Debug, Default)]
pub struct InMemoryCrossPlatformIntegrationService {
    state: Guarded<State>,
}

impl InMemoryCrossPlatformIntegrationService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CrossPlatformIntegrationService for InMemoryCrossPlatformIntegrationService {
    async fn list_connections(&self, caller: UserId) -> ServiceResult<Vec<PlatformConnection>> {
        let state = self.state.lock()?;
        let mut mine: Vec<PlatformConnection> = state
            .connections
            .values()
            .filter(|c| c.user_id == caller)
            .cloned()
            .collect();
        mine.sort_by_key(|c| c.platform);
        Ok(mine)
    }

    async fn connect_platform(
        &self,
        caller: UserId,
        request: ConnectPlatformRequest,
    ) -> ServiceResult<PlatformConnection> {
        let mut state = self.state.lock()?;
        if state
            .connections
            .values()
            .any(|c| c.user_id == caller && c.platform == request.platform)
        {
            return Err(ServiceError::invalid_state(format!(
                "{:?} is already connected",
                request.platform
            )));
        }

        let connection = PlatformConnection {
            id: ConnectionId::new(),
            user_id: caller,
            platform: request.platform,
            external_account_id: request.external_account_id,
            connected_at: Utc::now(),
            last_synced_at: None,
        };
        state.connections.insert(connection.id, connection.clone());
        Ok(connection)
    }

    async fn get_connection(
        &self,
        caller: UserId,
        connection_id: ConnectionId,
    ) -> ServiceResult<PlatformConnection> {
        let state = self.state.lock()?;
        let connection = state.connections.get(&connection_id).ok_or(ServiceError::NotFound)?;
        if connection.user_id != caller {
            return Err(ServiceError::Forbidden);
        }
        Ok(connection.clone())
    }

    async fn disconnect_platform(&self, caller: UserId, connection_id: ConnectionId) -> ServiceResult<()> {
        let mut state = self.state.lock()?;
        match state.connections.get(&connection_id) {
            None => Err(ServiceError::NotFound),
            Some(c) if c.user_id != caller => Err(ServiceError::Forbidden),
            Some(_) => {
                state.connections.remove(&connection_id);
                Ok(())
            }
        }
    }

    async fn sync_mod(&self, caller: UserId, mod_id: ModId, request: SyncModRequest) -> ServiceResult<SyncJob> {
        let mut state = self.state.lock()?;
        let now = Utc::now();

        let mut platforms = request.platforms;
        platforms.sort();
        platforms.dedup();

        if let Some(missing) = platforms.iter().find(|p| {
            !state
                .connections
                .values()
                .any(|c| c.user_id == caller && c.platform == **p)
        }) {
            return Err(ServiceError::invalid_argument(format!("{missing:?} is not connected")));
        }

        for c in state.connections.values_mut() {
            if c.user_id == caller && platforms.contains(&c.platform) {
                c.last_synced_at = Some(now);
            }
        }

        let job = SyncJob {
            id: Uuid::now_v7(),
            mod_id,
            requested_by: caller,
            platforms,
            status: SyncStatus::Queued,
            requested_at: now,
        };
        state.jobs.push(job.clone());
        tracing::debug!(%mod_id, job_id = %job.id, "mod sync queued");
        Ok(job)
    }

    async fn supported_platforms(&self, game_id: GameId) -> ServiceResult<Vec<SupportedPlatform>> {
        Ok(Platform::ALL
            .iter()
            .map(|p| SupportedPlatform {
                game_id,
                platform: *p,
                cross_save: p.is_pc_store(),
                cross_play: true,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connect(platform: Platform) -> ConnectPlatformRequest {
        ConnectPlatformRequest {
            platform,
            external_account_id: "acct-1".into(),
        }
    }

    #[tokio::test]
    async fn sync_requires_every_platform_to_be_linked() {
        let svc = InMemoryCrossPlatformIntegrationService::new();
        let caller = UserId::new();
        svc.connect_platform(caller, connect(Platform::Steam)).await.unwrap();

        let err = svc
            .sync_mod(
                caller,
                ModId::new(),
                SyncModRequest {
                    platforms: vec![Platform::Steam, Platform::Xbox],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));

        let job = svc
            .sync_mod(
                caller,
                ModId::new(),
                SyncModRequest {
                    platforms: vec![Platform::Steam, Platform::Steam],
                },
            )
            .await
            .unwrap();
        assert_eq!(job.platforms, vec![Platform::Steam]);
    }

    #[tokio::test]
    async fn connections_are_private_to_their_owner() {
        let svc = InMemoryCrossPlatformIntegrationService::new();
        let owner = UserId::new();
        let c = svc.connect_platform(owner, connect(Platform::Epic)).await.unwrap();

        assert_eq!(svc.get_connection(UserId::new(), c.id).await, Err(ServiceError::Forbidden));
        assert_eq!(
            svc.disconnect_platform(UserId::new(), c.id).await,
            Err(ServiceError::Forbidden)
        );
        svc.disconnect_platform(owner, c.id).await.unwrap();
        assert_eq!(svc.get_connection(owner, c.id).await, Err(ServiceError::NotFound));
    }

    #[tokio::test]
    async fn connecting_the_same_platform_twice_is_invalid_state() {
        let svc = InMemoryCrossPlatformIntegrationService::new();
        let caller = UserId::new();
        svc.connect_platform(caller, connect(Platform::Gog)).await.unwrap();
        assert!(matches!(
            svc.connect_platform(caller, connect(Platform::Gog)).await,
            Err(ServiceError::InvalidState(_))
        ));
    }
}
