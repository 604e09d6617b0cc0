//! Service wiring: one shared handle per resource family.

use std::sync::Arc;

use gamehub_services::memory::{
    InMemoryBackupRecoveryService, InMemoryBusinessIntelligenceService, InMemoryCommunityService,
    InMemoryCrossPlatformIntegrationService, InMemoryEnterpriseAdminService,
    InMemoryGameOptimizationService, InMemoryRevenueService, InMemoryStreamingService,
};
use gamehub_services::{
    BackupRecoveryService, BusinessIntelligenceService, CommunityService,
    CrossPlatformIntegrationService, EnterpriseAdminService, GameOptimizationService,
    RevenueService, StreamingService,
};

use super::errors::{ErrorPolicy, ErrorTranslator};

/// Services handed to every handler through an `Extension`.
#[derive(Clone)]
pub struct AppServices {
    pub community: Arc<dyn CommunityService + Send + Sync>,
    pub integrations: Arc<dyn CrossPlatformIntegrationService + Send + Sync>,
    pub streaming: Arc<dyn StreamingService + Send + Sync>,
    pub revenue: Arc<dyn RevenueService + Send + Sync>,
    pub backups: Arc<dyn BackupRecoveryService + Send + Sync>,
    pub analytics: Arc<dyn BusinessIntelligenceService + Send + Sync>,
    pub organizations: Arc<dyn EnterpriseAdminService + Send + Sync>,
    pub optimization: Arc<dyn GameOptimizationService + Send + Sync>,
    pub errors: ErrorTranslator,
}

impl AppServices {
    /// In-memory backends for every family (dev server and black-box tests).
    pub fn in_memory(policy: ErrorPolicy) -> Self {
        Self {
            community: Arc::new(InMemoryCommunityService::new()),
            integrations: Arc::new(InMemoryCrossPlatformIntegrationService::new()),
            streaming: Arc::new(InMemoryStreamingService::new()),
            revenue: Arc::new(InMemoryRevenueService::new()),
            backups: Arc::new(InMemoryBackupRecoveryService::new()),
            analytics: Arc::new(InMemoryBusinessIntelligenceService::new()),
            organizations: Arc::new(InMemoryEnterpriseAdminService::new()),
            optimization: Arc::new(InMemoryGameOptimizationService::new()),
            errors: ErrorTranslator::new(policy),
        }
    }

    pub fn with_community(mut self, svc: impl CommunityService + Send + Sync + 'static) -> Self {
        self.community = Arc::new(svc);
        self
    }

    pub fn with_integrations(
        mut self,
        svc: impl CrossPlatformIntegrationService + Send + Sync + 'static,
    ) -> Self {
        self.integrations = Arc::new(svc);
        self
    }

    pub fn with_streaming(mut self, svc: impl StreamingService + Send + Sync + 'static) -> Self {
        self.streaming = Arc::new(svc);
        self
    }

    pub fn with_revenue(mut self, svc: impl RevenueService + Send + Sync + 'static) -> Self {
        self.revenue = Arc::new(svc);
        self
    }

    pub fn with_backups(mut self, svc: impl BackupRecoveryService + Send + Sync + 'static) -> Self {
        self.backups = Arc::new(svc);
        self
    }

    pub fn with_analytics(mut self, svc: impl BusinessIntelligenceService + Send + Sync + 'static) -> Self {
        self.analytics = Arc::new(svc);
        self
    }

    pub fn with_organizations(mut self, svc: impl EnterpriseAdminService + Send + Sync + 'static) -> Self {
        self.organizations = Arc::new(svc);
        self
    }

    pub fn with_optimization(mut self, svc: impl GameOptimizationService + Send + Sync + 'static) -> Self {
        self.optimization = Arc::new(svc);
        self
    }
}
