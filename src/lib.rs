// First, declare the modules folder itself
mod modules;

// Re-export everything from modules for easier access
pub use modules::{auth, email, utils};

// Re-export commonly used types
pub use modules::auth::config::{AuthConfig, VerifyPolicy};
pub use modules::auth::error::AuthError;
pub use modules::auth::service::{CredentialService, RegistrationRequest};
pub use modules::auth::store::{InMemoryUserStore, User, UserStore};
pub use modules::email::Notifier;
pub use modules::utils::time::{Clock, SystemClock};

// Token lifetimes in seconds
pub const VERIFICATION_TOKEN_DURATION: u64 = 24 * 60 * 60;
pub const ACCESS_TOKEN_DURATION: u64 = 2 * 60 * 60;
pub const REFRESH_TOKEN_DURATION: u64 = 7 * 24 * 60 * 60;
pub const RESET_TOKEN_DURATION: u64 = 30 * 60;

// Type aliases
pub type HmacSha256 = hmac::Hmac<sha2::Sha256>;
