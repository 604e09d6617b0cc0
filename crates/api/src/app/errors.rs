use core::fmt;
use core::str::FromStr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use gamehub_core::ServiceError;

/// Transport-level error returned by handlers and extractors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // 401/403/404 carry no body.
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED.into_response(),
            ApiError::Forbidden => StatusCode::FORBIDDEN.into_response(),
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::BadRequest(message) => message_body(StatusCode::BAD_REQUEST, message),
            ApiError::Internal => message_body(StatusCode::INTERNAL_SERVER_ERROR, "internal server error"),
        }
    }
}

pub fn message_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "message": message.into() }))).into_response()
}

/// How `ServiceError::Unexpected` reaches the client.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// 400 with the service's message, like every other client-visible failure.
    #[default]
    Legacy,
    /// 500 with a generic message; the detail only goes to the log.
    Strict,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown error policy '{0}' (expected 'legacy' or 'strict')")]
pub struct ParseErrorPolicyError(String);

impl FromStr for ErrorPolicy {
    type Err = ParseErrorPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(ErrorPolicy::Legacy),
            "strict" => Ok(ErrorPolicy::Strict),
            other => Err(ParseErrorPolicyError(other.to_string())),
        }
    }
}

/// Name of a handler operation plus the identifiers it was called with.
///
/// Only used for logging failed service calls.
#[derive(Debug, Clone)]
pub struct Operation {
    name: &'static str,
    entities: Vec<(&'static str, String)>,
}

impl Operation {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entities: Vec::new(),
        }
    }

    pub fn caller(self, caller: impl fmt::Display) -> Self {
        self.entity("caller_id", caller)
    }

    pub fn entity(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.entities.push((key, value.to_string()));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entities.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Maps service failures to responses and logs each one.
#[derive(Debug, Copy, Clone, Default)]
pub struct ErrorTranslator {
    policy: ErrorPolicy,
}

impl ErrorTranslator {
    pub fn new(policy: ErrorPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn translate(&self, op: &Operation, err: ServiceError) -> ApiError {
        let kind = err.kind();
        match &err {
            ServiceError::Unexpected(detail) => tracing::error!(
                operation = op.name(),
                entities = %op,
                kind,
                error = %detail,
                "service call failed"
            ),
            other => tracing::warn!(
                operation = op.name(),
                entities = %op,
                kind,
                error = %other,
                "service call rejected"
            ),
        }

        match err {
            ServiceError::Unauthenticated => ApiError::Unauthenticated,
            ServiceError::Forbidden => ApiError::Forbidden,
            ServiceError::NotFound => ApiError::NotFound,
            ServiceError::InvalidArgument(message) | ServiceError::InvalidState(message) => {
                ApiError::BadRequest(message)
            }
            ServiceError::Unexpected(message) => match self.policy {
                ErrorPolicy::Legacy => ApiError::BadRequest(message),
                ErrorPolicy::Strict => ApiError::Internal,
            },
        }
    }

    /// Pass a success through and translate a failure.
    pub fn check<T>(&self, op: &Operation, result: Result<T, ServiceError>) -> Result<T, ApiError> {
        result.map_err(|err| self.translate(op, err))
    }
}
