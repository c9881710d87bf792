pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod store;
pub mod tokens;

// Re-export the main types and functions
pub use config::{AuthConfig, ConfigError, VerifyPolicy};
pub use error::AuthError;
pub use password::{hash_password, validate_password, verify_password, PasswordError};
pub use service::{CredentialService, RegisteredUser, RegistrationRequest, TokenPair};
pub use store::{Gender, InMemoryUserStore, NewUser, StoreError, User, UserStore, UserUpdate};
pub use tokens::{Claims, TokenError, TokenKind, TokenSigner};
