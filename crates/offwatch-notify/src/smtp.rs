//! SMTP relay mailer (STARTTLS + login)

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::NotifyError;
use crate::message::OutgoingEmail;
use crate::traits::Mailer;

/// Default submission relay
pub const DEFAULT_SMTP_HOST: &str = "email-smtp.us-east-1.amazonaws.com";

/// Default submission port (STARTTLS)
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Relay connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct SmtpSettings {
    /// Relay hostname
    #[serde(default = "default_host")]
    pub host: String,
    /// Submission port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Login user
    pub username: String,
    /// Login password
    pub password: String,
}

fn default_host() -> String {
    DEFAULT_SMTP_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_SMTP_PORT
}

impl SmtpSettings {
    /// Settings for the default relay
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Set relay host
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set relay port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sends through an authenticated STARTTLS relay
pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    /// Create a new mailer
    #[must_use]
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
        if self.settings.host.is_empty() {
            return Err(NotifyError::ConfigError("relay host is empty".to_string()));
        }

        let credentials = Credentials::new(
            self.settings.username.clone(),
            self.settings.password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.host)?
            .port(self.settings.port)
            .credentials(credentials)
            .build();

        Ok(transport)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, email), fields(host = %self.settings.host, port = self.settings.port))]
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError> {
        let message = email.to_message()?;
        let transport = self.transport()?;

        let response = transport.send(message).await?;

        debug!(code = %response.code(), "relay accepted message");

        Ok(())
    }

    fn mailer_type(&self) -> &'static str {
        "smtp"
    }
}
