//! Strongly-typed identifiers used across the platform.
//!
//! Every identifier is a UUID newtype. Path segments and token subjects are
//! parsed through `FromStr`, so a malformed value surfaces as
//! [`ServiceError::InvalidArgument`] rather than a panic.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ServiceError;

macro_rules! uuid_newtype {
    ($(#[$meta:meta])* $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(Uuid);

        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = ServiceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| ServiceError::invalid_argument(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

uuid_newtype!(
    /// Identity of a platform user (the caller of caller-scoped endpoints).
    UserId,
    "UserId"
);
uuid_newtype!(CommunityId, "CommunityId");
uuid_newtype!(OrganizationId, "OrganizationId");
uuid_newtype!(ModId, "ModId");
uuid_newtype!(GameId, "GameId");
uuid_newtype!(BackupId, "BackupId");
uuid_newtype!(RestoreJobId, "RestoreJobId");
uuid_newtype!(SubscriptionId, "SubscriptionId");
uuid_newtype!(PayoutId, "PayoutId");
uuid_newtype!(StreamId, "StreamId");
uuid_newtype!(
    /// A linked account on an external gaming platform.
    ConnectionId,
    "ConnectionId"
);
uuid_newtype!(ReportId, "ReportId");
uuid_newtype!(RecommendationId, "RecommendationId");
