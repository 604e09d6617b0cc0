//! Process configuration read from the environment.

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

use gamehub_observability::LogFormat;

use crate::app::errors::ErrorPolicy;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not a valid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(name: &'static str, reason: impl ToString) -> Self {
        Self::Invalid {
            name,
            reason: reason.to_string(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Listen address (`GAMEHUB_BIND_ADDR`)
    pub bind_addr: SocketAddr,
    /// HS256 shared secret (`JWT_SECRET`)
    pub jwt_secret: String,
    /// Expected `iss` claim (`JWT_ISSUER`)
    pub jwt_issuer: Option<String>,
    /// How unexpected service failures are surfaced (`GAMEHUB_ERROR_POLICY`)
    pub error_policy: ErrorPolicy,
    /// Log line format (`LOG_FORMAT`)
    pub log_format: LogFormat,
    /// True when `JWT_SECRET` was not set and the dev secret is in use.
    pub insecure_dev_secret: bool,
}

impl ApiConfig {
    /// Defaults for everything but the signing secret.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: jwt_secret.into(),
            jwt_issuer: None,
            error_policy: ErrorPolicy::default(),
            log_format: LogFormat::default(),
            insecure_dev_secret: false,
        }
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.jwt_issuer = Some(issuer.into());
        self
    }

    /// Load configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a local `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = var("GAMEHUB_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("GAMEHUB_BIND_ADDR", e))?;

        let (jwt_secret, insecure_dev_secret) = match var("JWT_SECRET") {
            Some(secret) => (secret, false),
            None => (DEV_JWT_SECRET.to_string(), true),
        };

        let error_policy = match var("GAMEHUB_ERROR_POLICY") {
            Some(v) => v
                .parse()
                .map_err(|e| ConfigError::invalid("GAMEHUB_ERROR_POLICY", e))?,
            None => ErrorPolicy::default(),
        };

        let log_format = match var("LOG_FORMAT") {
            Some(v) => v.parse().map_err(|e| ConfigError::invalid("LOG_FORMAT", e))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            jwt_issuer: var("JWT_ISSUER"),
            error_policy,
            log_format,
            insecure_dev_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.error_policy, ErrorPolicy::Legacy);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.insecure_dev_secret);
        assert!(config.jwt_issuer.is_none());
    }

    #[test]
    fn explicit_values_are_used() {
        let config = load(&[
            ("GAMEHUB_BIND_ADDR", "127.0.0.1:9000"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_ISSUER", "gamehub"),
            ("GAMEHUB_ERROR_POLICY", "strict"),
            ("LOG_FORMAT", "pretty"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.jwt_secret, "s3cret");
        assert!(!config.insecure_dev_secret);
        assert_eq!(config.jwt_issuer.as_deref(), Some("gamehub"));
        assert_eq!(config.error_policy, ErrorPolicy::Strict);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn invalid_values_are_startup_errors() {
        assert!(matches!(
            load(&[("GAMEHUB_BIND_ADDR", "not-an-addr")]),
            Err(ConfigError::Invalid { name: "GAMEHUB_BIND_ADDR", .. })
        ));
        assert!(matches!(
            load(&[("GAMEHUB_ERROR_POLICY", "lenient")]),
            Err(ConfigError::Invalid { name: "GAMEHUB_ERROR_POLICY", .. })
        ));
        assert!(matches!(
            load(&[("LOG_FORMAT", "xml")]),
            Err(ConfigError::Invalid { name: "LOG_FORMAT", .. })
        ));
    }
}
