//! `gamehub-core`: identifiers and the service-boundary error model shared by
//! every other crate in the workspace.

pub mod error;
pub mod id;

pub use error::{ServiceError, ServiceResult};
pub use id::{
    BackupId, CommunityId, ConnectionId, GameId, ModId, OrganizationId, PayoutId,
    RecommendationId, ReportId, RestoreJobId, StreamId, SubscriptionId, UserId,
};
