//! offwatch-notify: report delivery over SMTP
//!
//! Builds a plain-text MIME message and hands it to a [`Mailer`]. The [`Notifier`]
//! suppresses delivery failures after logging them.

pub mod error;
pub mod message;
pub mod notifier;
pub mod smtp;
pub mod traits;

pub use error::NotifyError;
pub use message::OutgoingEmail;
pub use notifier::Notifier;
pub use smtp::{SmtpMailer, SmtpSettings};
pub use traits::Mailer;
