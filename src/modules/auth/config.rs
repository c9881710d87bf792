use std::env;
use thiserror::Error;

/// Behavior when a valid verification token is presented for an account
/// that is already active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyPolicy {
    /// Re-verification succeeds again
    #[default]
    IdempotentSuccess,
    /// Re-verification is rejected as an invalid token
    RejectAlreadyActive,
}

/// Configuration failures, all fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set")]
    MissingSecret,
}

/// Process-wide credential configuration, injected at startup.
/// The signing secret is read-only for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub verify_policy: VerifyPolicy,
}

impl AuthConfig {
    /// Create a configuration from an explicit secret; an empty secret is
    /// rejected immediately rather than at first token use
    pub fn new(jwt_secret: impl Into<String>) -> Result<Self, ConfigError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        Ok(Self {
            jwt_secret,
            verify_policy: VerifyPolicy::default(),
        })
    }

    /// Read the signing secret from the JWT_SECRET environment variable
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var("JWT_SECRET") {
            Ok(secret) => Self::new(secret),
            Err(_) => Err(ConfigError::MissingSecret),
        }
    }

    pub fn with_verify_policy(mut self, policy: VerifyPolicy) -> Self {
        self.verify_policy = policy;
        self
    }
}
