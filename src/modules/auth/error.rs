use log::error;
use thiserror::Error;

use super::store::StoreError;

/// Typed outcomes of the credential flows. The routing layer maps these to
/// transport responses; messages never carry password hashes, the signing
/// secret, or internal detail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    ValidationFailed(String),
    #[error("email is already in use")]
    EmailInUse,
    #[error("email does not exist")]
    EmailNotFound,
    #[error("account has not been activated")]
    AccountInactive,
    #[error("incorrect password")]
    InvalidPassword,
    #[error("invalid token")]
    InvalidToken,
    #[error("token has expired")]
    TokenExpired,
    #[error("token does not match")]
    TokenMismatch,
    #[error("token is invalid or has expired")]
    InvalidOrExpiredToken,
    #[error("user does not exist")]
    UserNotFound,
    #[error("failed to send notification email")]
    NotificationFailed,
    #[error("internal error")]
    Internal,
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AuthError::EmailInUse,
            StoreError::NotFound => AuthError::UserNotFound,
            StoreError::Backend(detail) => {
                // Full detail goes to the log, none of it to the caller
                error!("user store failure: {}", detail);
                AuthError::Internal
            }
        }
    }
}
