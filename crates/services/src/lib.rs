//! `gamehub-services`: the service boundary behind the HTTP layer.
//!
//! One async trait per resource family, plus the DTOs and filter structs that
//! cross it. Every operation returns [`gamehub_core::ServiceResult`], so callers
//! decide how each failure kind is surfaced.
//!
//! `memory` holds small in-memory backends used by the dev binary and the
//! black-box tests. Enable the `mock` feature for `mockall` doubles.

pub mod analytics;
pub mod backup;
pub mod community;
pub mod filter;
pub mod integration;
pub mod memory;
pub mod optimization;
pub mod organization;
pub mod revenue;
pub mod streaming;

pub use analytics::BusinessIntelligenceService;
pub use backup::BackupRecoveryService;
pub use community::CommunityService;
pub use filter::{DateRangeFilter, Page, PageRequest};
pub use integration::CrossPlatformIntegrationService;
pub use optimization::GameOptimizationService;
pub use organization::EnterpriseAdminService;
pub use revenue::RevenueService;
pub use streaming::StreamingService;

#[cfg(feature = "mock")]
pub use analytics::MockBusinessIntelligenceService;
#[cfg(feature = "mock")]
pub use backup::MockBackupRecoveryService;
#[cfg(feature = "mock")]
pub use community::MockCommunityService;
#[cfg(feature = "mock")]
pub use integration::MockCrossPlatformIntegrationService;
#[cfg(feature = "mock")]
pub use optimization::MockGameOptimizationService;
#[cfg(feature = "mock")]
pub use organization::MockEnterpriseAdminService;
#[cfg(feature = "mock")]
pub use revenue::MockRevenueService;
#[cfg(feature = "mock")]
pub use streaming::MockStreamingService;
