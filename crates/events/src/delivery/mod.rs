//! External delivery channels for admin notifications.

pub mod email;

use email::EmailError;

/// Something that can deliver a plain-text email.
///
/// [`email::EmailDelivery`] is the production implementation; tests plug in
/// recording or failing transports.
#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError>;
}
