use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier carried in the `roles` claim.
///
/// Roles are opaque strings at this layer. The only convention baked in is
/// that [`Role::ADMIN`] satisfies every role requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Platform administrator.
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));

    /// Access to financial reporting.
    pub const FINANCE: Role = Role(Cow::Borrowed("finance"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.as_str() == Self::ADMIN.as_str()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
