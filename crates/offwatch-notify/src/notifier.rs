//! Fire-and-forget report notifier

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::NotifyError;
use crate::message::OutgoingEmail;
use crate::traits::Mailer;

/// Sends reports from a fixed sender address
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    from: String,
}

impl Notifier {
    /// Create a notifier
    pub fn new(mailer: Arc<dyn Mailer>, from: impl Into<String>) -> Self {
        Self {
            mailer,
            from: from.into(),
        }
    }

    /// Send and report the outcome
    ///
    /// # Errors
    /// Returns an error if the message cannot be built or the relay rejects it.
    pub async fn try_send(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        let email = OutgoingEmail::new(self.from.as_str(), recipient, subject, body);
        self.mailer.send(&email).await
    }

    /// Send, logging and dropping any failure
    #[instrument(skip(self, body), fields(mailer = self.mailer.mailer_type()))]
    pub async fn send_email(&self, recipient: &str, subject: &str, body: &str) {
        match self.try_send(recipient, subject, body).await {
            Ok(()) => info!("report email sent"),
            Err(e) => warn!(error = %e, "failed to send the email"),
        }
    }
}
