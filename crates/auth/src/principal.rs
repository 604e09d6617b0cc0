use thiserror::Error;

use gamehub_core::UserId;

use crate::{JwtClaims, Role};

/// A verified bearer of a token, as seen by request handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    subject: Option<String>,
    roles: Vec<Role>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("identity claim is missing")]
    MissingSubject,

    #[error("identity claim is not a user id: {0}")]
    MalformedSubject(String),
}

impl Principal {
    pub fn new(subject: Option<String>, roles: Vec<Role>) -> Self {
        Self { subject, roles }
    }

    pub fn from_claims(claims: JwtClaims) -> Self {
        Self::new(claims.sub, claims.roles)
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Resolve the caller identity.
    ///
    /// Fails when the subject is absent, blank, or not UUID-shaped.
    pub fn user_id(&self) -> Result<UserId, IdentityError> {
        let subject = self
            .subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(IdentityError::MissingSubject)?;

        subject
            .parse()
            .map_err(|_| IdentityError::MalformedSubject(subject.to_string()))
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.iter().any(|r| r.is_admin() || r == role)
    }
}
