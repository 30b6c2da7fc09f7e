//! Enki Media outbound notifications.
//!
//! - [`delivery`]: mail transports ([`MailTransport`] and the SMTP
//!   implementation [`EmailDelivery`]).
//! - [`notify`]: [`ContactNotifier`], the best-effort admin notice sent when a
//!   contact form is submitted.

pub mod delivery;
pub mod notify;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use delivery::MailTransport;
pub use notify::{ContactNotice, ContactNotifier};
