use chrono::NaiveDate;
use log::error;
use serde::{Deserialize, Serialize};

use super::config::{AuthConfig, VerifyPolicy};
use super::error::AuthError;
use super::password::{hash_password, validate_password, verify_password};
use super::store::{Gender, NewUser, UserStore, UserUpdate};
use super::tokens::{TokenKind, TokenSigner};
use crate::modules::email::{reset_email, verification_email, Notifier};
use crate::modules::utils::logging::log_auth_event;
use crate::modules::utils::time::Clock;

/// Registration input as handed over by the routing layer
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

/// Public fields of a freshly created user; the password hash never leaves
/// the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredUser {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
}

/// Access and refresh token issued by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// The credential service: registration, email verification, login, token
/// refresh and password reset over an external user store and notifier.
/// Every flow is a short-lived request handler; the only shared state is
/// the signing secret, read-only after construction.
pub struct CredentialService<S, N, C> {
    store: S,
    notifier: N,
    clock: C,
    signer: TokenSigner,
    verify_policy: VerifyPolicy,
}

impl<S: UserStore, N: Notifier, C: Clock> CredentialService<S, N, C> {
    pub fn new(config: AuthConfig, store: S, notifier: N, clock: C) -> Self {
        Self {
            signer: TokenSigner::new(config.jwt_secret.as_bytes()),
            verify_policy: config.verify_policy,
            store,
            notifier,
            clock,
        }
    }

    /// Register a new account. The user is created inactive together with
    /// its verification token, then the token is handed to the notifier.
    /// A failed notification leaves the created user in place.
    pub fn register(&self, request: RegistrationRequest) -> Result<RegisteredUser, AuthError> {
        validate_email(&request.email)?;
        validate_password(&request.password)
            .map_err(|e| AuthError::ValidationFailed(e.message().to_string()))?;

        if self.store.find_by_email(&request.email)?.is_some() {
            log_auth_event("register", &request.email, false, Some("email already in use"));
            return Err(AuthError::EmailInUse);
        }

        let now = self.clock.now();
        let token = self
            .signer
            .issue(TokenKind::EmailVerification, &request.email, None, None, now);

        // Concurrent registrations for the same email race here; the store's
        // uniqueness constraint picks the single winner.
        let user = self.store.create(NewUser {
            email: request.email,
            password_hash: hash_password(&request.password),
            first_name: request.first_name,
            last_name: request.last_name,
            birth_date: request.birth_date,
            gender: request.gender.unwrap_or(Gender::Other),
            is_admin: false,
            is_active: false,
            verification_token: Some(token.clone()),
            verification_token_expires: Some(now + TokenKind::EmailVerification.lifetime()),
            created_at: now,
        })?;

        let content = verification_email(&user.first_name, &token);
        if let Err(e) = self.notifier.send(&user.email, &content.subject, &content.text) {
            error!("verification email dispatch failed: {}", e);
            log_auth_event("register", &user.email, false, Some("notification failed"));
            return Err(AuthError::NotificationFailed);
        }

        log_auth_event("register", &user.email, true, None);
        Ok(RegisteredUser {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_active: user.is_active,
        })
    }

    /// Consume an email-verification token and activate the account.
    /// The stored expiry is checked in addition to the token's own, and the
    /// presented string must match the stored token exactly.
    pub fn verify_email(&self, token: &str) -> Result<(), AuthError> {
        let now = self.clock.now();
        let claims = self
            .signer
            .verify(token, TokenKind::EmailVerification, now)
            .map_err(|_| AuthError::InvalidToken)?;

        let user = self
            .store
            .find_by_email(&claims.email)?
            .ok_or(AuthError::UserNotFound)?;

        match user.verification_token_expires {
            Some(expires) if now <= expires => {}
            _ => {
                log_auth_event("verify_email", &user.email, false, Some("token expired"));
                return Err(AuthError::TokenExpired);
            }
        }

        if user.verification_token.as_deref() != Some(token) {
            log_auth_event("verify_email", &user.email, false, Some("token mismatch"));
            return Err(AuthError::TokenMismatch);
        }

        if user.is_active {
            return match self.verify_policy {
                VerifyPolicy::IdempotentSuccess => Ok(()),
                VerifyPolicy::RejectAlreadyActive => Err(AuthError::InvalidToken),
            };
        }

        self.store.update(
            user.id,
            UserUpdate {
                is_active: Some(true),
                ..Default::default()
            },
        )?;

        log_auth_event("verify_email", &user.email, true, None);
        Ok(())
    }

    /// Authenticate with email and password, issuing an access/refresh token
    /// pair. Existence is checked before activation, activation before the
    /// password.
    pub fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = match self.store.find_by_email(email)? {
            Some(user) => user,
            None => {
                log_auth_event("login", email, false, Some("unknown email"));
                return Err(AuthError::EmailNotFound);
            }
        };

        if !user.is_active {
            log_auth_event("login", email, false, Some("account not activated"));
            return Err(AuthError::AccountInactive);
        }

        if !verify_password(password, &user.password_hash) {
            log_auth_event("login", email, false, Some("wrong password"));
            return Err(AuthError::InvalidPassword);
        }

        let now = self.clock.now();
        let access_token = self.signer.issue(
            TokenKind::Access,
            &user.email,
            Some(user.id),
            Some(user.is_admin),
            now,
        );
        let refresh_token = self.signer.issue(
            TokenKind::Refresh,
            &user.email,
            Some(user.id),
            Some(user.is_admin),
            now,
        );

        log_auth_event("login", email, true, None);
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Mint a new access token from a still-valid refresh token. The refresh
    /// token itself is not rotated and stays usable until its own expiry.
    pub fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let now = self.clock.now();
        let claims = self
            .signer
            .verify(refresh_token, TokenKind::Refresh, now)
            .map_err(|_| AuthError::InvalidOrExpiredToken)?;

        let user_id = claims.user_id.ok_or(AuthError::InvalidOrExpiredToken)?;
        let user = match self.store.find_by_id(user_id)? {
            Some(user) if user.is_active => user,
            _ => {
                log_auth_event("refresh", &claims.email, false, Some("user missing or inactive"));
                return Err(AuthError::UserNotFound);
            }
        };

        log_auth_event("refresh", &user.email, true, None);
        Ok(self.signer.issue(
            TokenKind::Access,
            &user.email,
            Some(user.id),
            Some(user.is_admin),
            now,
        ))
    }

    /// Request a password reset. Unknown emails get the same success-shaped
    /// outcome as known ones, and no token is issued for them.
    pub fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        validate_email(email)?;

        let user = match self.store.find_by_email(email)? {
            Some(user) => user,
            None => {
                // Indistinguishable from the success path so callers cannot
                // probe which emails are registered
                log_auth_event(
                    "password_reset_request",
                    email,
                    true,
                    Some("unknown email, no token issued"),
                );
                return Ok(());
            }
        };

        let token = self.signer.issue(
            TokenKind::PasswordReset,
            &user.email,
            None,
            None,
            self.clock.now(),
        );

        let content = reset_email(&user.first_name, &token);
        if let Err(e) = self.notifier.send(&user.email, &content.subject, &content.text) {
            error!("reset email dispatch failed: {}", e);
            log_auth_event("password_reset_request", email, false, Some("notification failed"));
            return Err(AuthError::NotificationFailed);
        }

        log_auth_event("password_reset_request", email, true, None);
        Ok(())
    }

    /// Consume a reset token and overwrite the stored password hash. Any
    /// token problem collapses to a single coarse error so the caller cannot
    /// tell which check failed. Existing access/refresh tokens stay valid
    /// until their own expiry.
    pub fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        validate_password(new_password)
            .map_err(|e| AuthError::ValidationFailed(e.message().to_string()))?;

        let claims = self
            .signer
            .verify(token, TokenKind::PasswordReset, self.clock.now())
            .map_err(|_| AuthError::InvalidOrExpiredToken)?;

        let user = self
            .store
            .find_by_email(&claims.email)?
            .ok_or(AuthError::UserNotFound)?;

        self.store.update(
            user.id,
            UserUpdate {
                password_hash: Some(hash_password(new_password)),
                ..Default::default()
            },
        )?;

        log_auth_event("password_reset", &user.email, true, None);
        Ok(())
    }
}

/// Syntactic email check; the store remains the authority on uniqueness
fn validate_email(email: &str) -> Result<(), AuthError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(AuthError::ValidationFailed(
            "email is not a valid email address".to_string(),
        ))
    }
}
