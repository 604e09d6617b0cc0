//! Role-based authorization checks.
//!
//! - No IO
//! - No panics
//! - No business logic (pure policy check)

use thiserror::Error;

use crate::{Principal, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing role '{0}'")]
    MissingRole(String),
}

/// Require `required` (or admin) on the principal.
pub fn authorize_role(principal: &Principal, required: &Role) -> Result<(), AuthzError> {
    if principal.has_role(required) {
        Ok(())
    } else {
        Err(AuthzError::MissingRole(required.as_str().to_string()))
    }
}
