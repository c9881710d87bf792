pub mod notifier;
mod smtp;
mod templates;

pub use notifier::{Notifier, NotifierError, SmtpNotifier};
pub use smtp::SmtpCredentials;
pub use templates::{reset_email, verification_email, EmailContent};
