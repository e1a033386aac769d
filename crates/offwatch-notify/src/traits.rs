//! Mailer trait

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::message::OutgoingEmail;

/// Delivers one email per call over its own relay session
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError>;

    fn mailer_type(&self) -> &'static str;
}
