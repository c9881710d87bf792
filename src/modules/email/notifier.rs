use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::transport::smtp::PoolConfig;
use lettre::{Message, SmtpTransport, Transport};
use log::info;
use thiserror::Error;

use super::smtp::SmtpCredentials;

/// Delivery failure reported by a notifier
#[derive(Debug, Error)]
#[error("{0}")]
pub struct NotifierError(pub String);

/// Delivery contract for outbound mail. The credential service only builds
/// subject and body; implementors own the transport.
pub trait Notifier {
    fn send(&self, to_email: &str, subject: &str, body: &str) -> Result<(), NotifierError>;
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn send(&self, to_email: &str, subject: &str, body: &str) -> Result<(), NotifierError> {
        (**self).send(to_email, subject, body)
    }
}

/// Notifier backed by an SMTP relay with required TLS
pub struct SmtpNotifier {
    creds: SmtpCredentials,
    from_name: String,
}

impl SmtpNotifier {
    pub fn new(creds: SmtpCredentials, from_name: impl Into<String>) -> Self {
        Self {
            creds,
            from_name: from_name.into(),
        }
    }
}

impl Notifier for SmtpNotifier {
    /// Function to send emails through the configured SMTP relay
    fn send(&self, to_email: &str, subject: &str, body: &str) -> Result<(), NotifierError> {
        // Create email message
        let email = Message::builder()
            .from(
                format!("{} <{}>", self.from_name, self.creds.username)
                    .parse()
                    .map_err(|e| NotifierError(format!("Invalid from address: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| NotifierError(format!("Invalid to address: {}", e)))?)
            .subject(subject)
            .header(lettre::message::header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifierError(format!("Failed to create email: {}", e)))?;

        // Configure TLS parameters
        let tls_parameters = TlsParameters::builder(self.creds.host.clone())
            .build()
            .map_err(|e| NotifierError(format!("Failed to build TLS parameters: {}", e)))?;

        // Set up SMTP transport with explicit TLS configuration
        let mailer = SmtpTransport::relay(&self.creds.host)
            .map_err(|e| NotifierError(format!("Failed to create SMTP transport: {}", e)))?
            .credentials(Credentials::new(
                self.creds.username.clone(),
                self.creds.password.clone(),
            ))
            .port(self.creds.port)
            .tls(Tls::Required(tls_parameters))
            .pool_config(PoolConfig::new().max_size(1))
            .timeout(Some(std::time::Duration::from_secs(10)))
            .build();

        // Send the email
        match mailer.send(&email) {
            Ok(_) => {
                info!("Email sent successfully to: {}", to_email);
                Ok(())
            }
            Err(e) => Err(NotifierError(format!("Failed to send email: {}", e))),
        }
    }
}
