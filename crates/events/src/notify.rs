//! Admin notice for new contact form submissions.
//!
//! Delivery is fire-and-forget: a missing recipient or transport turns the
//! notifier into a no-op, and delivery errors are logged and dropped. The
//! contact submission itself never depends on the outcome.

use std::sync::Arc;

use enki_db::models::contact_message::ContactMessage;

use crate::delivery::MailTransport;

/// Placeholder for optional fields left blank on the form.
const MISSING_FIELD: &str = "N/A";

/// Rendered subject and body of the admin notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactNotice {
    pub subject: String,
    pub body: String,
}

impl ContactNotice {
    /// Render the notice for `message`, deep-linking into the admin panel.
    pub fn for_message(message: &ContactMessage, admin_panel_url: &str) -> Self {
        let link = format!(
            "{}/messages/{}",
            admin_panel_url.trim_end_matches('/'),
            message.id
        );
        let body = format!(
            "You have received a new contact message from your website.\n\n\
             Name: {}\n\
             Email: {}\n\
             Phone: {}\n\
             Company: {}\n\n\
             Message:\n{}\n\n\
             View in Admin Panel: {link}\n\n\
             Please respond to this inquiry as soon as possible.",
            message.name,
            message.email,
            message.phone.as_deref().unwrap_or(MISSING_FIELD),
            message.company.as_deref().unwrap_or(MISSING_FIELD),
            message.message,
        );
        Self {
            subject: format!("New Contact Message from {}", message.name),
            body,
        }
    }
}

/// Sends [`ContactNotice`]s to the configured admin address.
#[derive(Clone)]
pub struct ContactNotifier {
    admin_email: Option<String>,
    admin_panel_url: String,
    transport: Option<Arc<dyn MailTransport>>,
}

impl ContactNotifier {
    pub fn new(
        admin_email: Option<String>,
        admin_panel_url: impl Into<String>,
        transport: Option<Arc<dyn MailTransport>>,
    ) -> Self {
        Self {
            admin_email: admin_email.filter(|e| !e.trim().is_empty()),
            admin_panel_url: admin_panel_url.into(),
            transport,
        }
    }

    /// A notifier that never sends anything.
    pub fn disabled() -> Self {
        Self::new(None, String::new(), None)
    }

    pub fn is_enabled(&self) -> bool {
        self.admin_email.is_some() && self.transport.is_some()
    }

    /// Notify the admin about `message`.
    ///
    /// Returns whether a mail was handed to the transport successfully.
    /// Never fails.
    pub async fn notify_new_message(&self, message: &ContactMessage) -> bool {
        let (Some(to), Some(transport)) = (&self.admin_email, &self.transport) else {
            tracing::debug!(message_id = %message.id, "Admin notification disabled, skipping");
            return false;
        };

        let notice = ContactNotice::for_message(message, &self.admin_panel_url);
        match transport.send(to, &notice.subject, &notice.body).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    message_id = %message.id,
                    error = %e,
                    "Failed to send contact notification",
                );
                false
            }
        }
    }

    /// Run [`ContactNotifier::notify_new_message`] in the background.
    pub fn spawn_notify(&self, message: ContactMessage) {
        if !self.is_enabled() {
            return;
        }
        let notifier = self.clone();
        tokio::spawn(async move {
            notifier.notify_new_message(&message).await;
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::delivery::email::EmailError;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait::async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), body.to_string()));
            Ok(())
        }
    }

    struct FailingTransport;

    #[async_trait::async_trait]
    impl MailTransport for FailingTransport {
        async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), EmailError> {
            Err(EmailError::Build("relay unavailable".to_string()))
        }
    }

    fn message(phone: Option<&str>, company: Option<&str>) -> ContactMessage {
        ContactMessage {
            id: uuid::Uuid::new_v4(),
            name: "Elif".to_string(),
            email: "elif@example.com".to_string(),
            phone: phone.map(str::to_string),
            company: company.map(str::to_string),
            message: "We need a launch video.".to_string(),
            status: "new".to_string(),
            read_at: None,
            responded_at: None,
            response_note: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn notice_lists_fields_with_fallbacks() {
        let msg = message(None, Some("Orbit"));
        let notice = ContactNotice::for_message(&msg, "https://admin.example.com/admin/");
        assert_eq!(notice.subject, "New Contact Message from Elif");
        assert!(notice.body.contains("Email: elif@example.com"));
        assert!(notice.body.contains("Phone: N/A"));
        assert!(notice.body.contains("Company: Orbit"));
        assert!(notice.body.contains("We need a launch video."));
        assert!(notice
            .body
            .contains(&format!("https://admin.example.com/admin/messages/{}", msg.id)));
    }

    #[tokio::test]
    async fn sends_to_admin_address() {
        let transport = Arc::new(RecordingTransport::default());
        let notifier = ContactNotifier::new(
            Some("admin@enkimedia.com".to_string()),
            "http://localhost:3000/admin",
            Some(transport.clone()),
        );
        assert!(notifier.notify_new_message(&message(None, None)).await);

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "admin@enkimedia.com");
        assert_eq!(sent[0].1, "New Contact Message from Elif");
    }

    #[tokio::test]
    async fn missing_admin_address_is_a_no_op() {
        let transport = Arc::new(RecordingTransport::default());
        let notifier = ContactNotifier::new(None, "http://x", Some(transport.clone()));
        assert!(!notifier.is_enabled());
        assert!(!notifier.notify_new_message(&message(None, None)).await);
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_admin_address_counts_as_missing() {
        let notifier = ContactNotifier::new(
            Some("  ".to_string()),
            "http://x",
            Some(Arc::new(RecordingTransport::default())),
        );
        assert!(!notifier.is_enabled());
    }

    #[tokio::test]
    async fn transport_failure_is_swallowed() {
        let notifier = ContactNotifier::new(
            Some("admin@enkimedia.com".to_string()),
            "http://x",
            Some(Arc::new(FailingTransport)),
        );
        assert!(!notifier.notify_new_message(&message(Some("555"), None)).await);
    }

    #[tokio::test]
    async fn disabled_notifier_sends_nothing() {
        assert!(!ContactNotifier::disabled().notify_new_message(&message(None, None)).await);
    }
}
