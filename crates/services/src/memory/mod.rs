//! In-memory service backends.
//!
//! These back the dev binary and the black-box test-suite. They keep just
//! enough state to produce every failure kind of the service boundary
//! (not found, forbidden, invalid argument, invalid state); they are not a
//! model of the production services.

use std::sync::{Mutex, MutexGuard};

use gamehub_core::{ServiceError, ServiceResult};

mod analytics;
mod backup;
mod community;
mod integration;
mod optimization;
mod organization;
mod revenue;
mod streaming;

pub use analytics::InMemoryBusinessIntelligenceService;
pub use backup::InMemoryBackupRecoveryService;
pub use community::InMemoryCommunityService;
pub use integration::InMemoryCrossPlatformIntegrationService;
pub use optimization::InMemoryGameOptimizationService;
pub use organization::InMemoryEnterpriseAdminService;
pub use revenue::InMemoryRevenueService;
pub use streaming::InMemoryStreamingService;

/// Mutex wrapper that reports poisoning as an unexpected service error.
#[derive(Debug, Default)]
struct Guarded<T>(Mutex<T>);

impl<T> Guarded<T> {
    fn lock(&self) -> ServiceResult<MutexGuard<'_, T>> {
        self.0
            .lock()
            .map_err(|_| ServiceError::unexpected("in-memory store lock poisoned"))
    }
}
