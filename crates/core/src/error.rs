//! Service-boundary error model.

use thiserror::Error;

/// Result type returned by every service-boundary operation.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// The fixed taxonomy of failures a service boundary can report.
///
/// The HTTP layer matches on the variant to pick a status code; the message
/// carried by the argument/state/unexpected variants is what the client sees.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The caller identity was missing or unusable.
    #[error("unauthenticated")]
    Unauthenticated,

    /// The caller is known but not allowed to perform the operation.
    #[error("forbidden")]
    Forbidden,

    /// The addressed entity does not exist (or is not visible to the caller).
    #[error("not found")]
    NotFound,

    /// Malformed input or a business-rule violation.
    #[error("{0}")]
    InvalidArgument(String),

    /// The entity is in a state that does not allow the operation
    /// (e.g. cancelling an already cancelled subscription).
    #[error("{0}")]
    InvalidState(String),

    /// Anything else the service layer could not handle.
    #[error("{0}")]
    Unexpected(String),
}

impl ServiceError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Short machine-readable name of the variant, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::InvalidState(_) => "invalid_state",
            Self::Unexpected(_) => "unexpected",
        }
    }
}
