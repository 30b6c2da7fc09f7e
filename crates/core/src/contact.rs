//! Contact message status workflow.
//!
//! Messages move `new` -> `read` -> `responded`; `responded` is also
//! reachable straight from `new`. The repository executes the transitions;
//! this module decides which one a request asks for.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const STATUS_NEW: &str = "new";
pub const STATUS_READ: &str = "read";
pub const STATUS_RESPONDED: &str = "responded";

/// Valid values for `contact_messages.status`.
pub const VALID_STATUSES: &[&str] = &[STATUS_NEW, STATUS_READ, STATUS_RESPONDED];

// ---------------------------------------------------------------------------
// MessageStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a contact message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    New,
    Read,
    Responded,
}

impl MessageStatus {
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            STATUS_NEW => Ok(Self::New),
            STATUS_READ => Ok(Self::Read),
            STATUS_RESPONDED => Ok(Self::Responded),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: {VALID_STATUSES:?}"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => STATUS_NEW,
            Self::Read => STATUS_READ,
            Self::Responded => STATUS_RESPONDED,
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// The repository operation a status-change request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// Set `status = read` and refresh `read_at`.
    MarkRead,
    /// Set `status = responded`, refresh `responded_at` and overwrite
    /// `response_note` (possibly with `NULL`).
    MarkResponded { note: Option<String> },
    /// Plain field update without touching the timestamps. Only reached for
    /// `new`, which lets an admin put a message back into the inbox.
    ///
    /// `note` is `None` when the request left the note out (keep it) and
    /// `Some(None)` when it sent an empty one (clear it).
    Reset {
        status: MessageStatus,
        note: Option<Option<String>>,
    },
}

impl StatusUpdate {
    /// Resolve a requested target status into the operation to run.
    ///
    /// `note` distinguishes an omitted note (`None`) from an explicitly empty
    /// one (`Some(None)`); only [`StatusUpdate::Reset`] cares.
    pub fn plan(target: MessageStatus, note: Option<Option<String>>) -> Self {
        match target {
            MessageStatus::Read => Self::MarkRead,
            MessageStatus::Responded => Self::MarkResponded {
                note: note.flatten(),
            },
            MessageStatus::New => Self::Reset {
                status: target,
                note,
            },
        }
    }
}

/// Whether opening a message should mark it as read.
///
/// Only `new` messages transition on view; re-viewing a read message leaves
/// `read_at` untouched.
pub fn marks_read_on_view(current: &str) -> bool {
    current == STATUS_NEW
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn status_names_round_trip() {
        for name in VALID_STATUSES {
            assert_eq!(MessageStatus::from_name(name).unwrap().as_str(), *name);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_matches!(
            MessageStatus::from_name("archived"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn read_plans_mark_read_and_drops_note() {
        assert_eq!(
            StatusUpdate::plan(MessageStatus::Read, Some(Some("ignored".into()))),
            StatusUpdate::MarkRead
        );
    }

    #[test]
    fn responded_keeps_note() {
        assert_eq!(
            StatusUpdate::plan(MessageStatus::Responded, Some(Some("Thanks".into()))),
            StatusUpdate::MarkResponded {
                note: Some("Thanks".into())
            }
        );
        assert_eq!(
            StatusUpdate::plan(MessageStatus::Responded, None),
            StatusUpdate::MarkResponded { note: None }
        );
    }

    #[test]
    fn new_is_a_plain_reset() {
        assert_eq!(
            StatusUpdate::plan(MessageStatus::New, None),
            StatusUpdate::Reset {
                status: MessageStatus::New,
                note: None
            }
        );
    }

    #[test]
    fn reset_keeps_omitted_note_apart_from_cleared_note() {
        assert_eq!(
            StatusUpdate::plan(MessageStatus::New, Some(None)),
            StatusUpdate::Reset {
                status: MessageStatus::New,
                note: Some(None)
            }
        );
        assert_eq!(
            StatusUpdate::plan(MessageStatus::Responded, Some(None)),
            StatusUpdate::MarkResponded { note: None }
        );
    }

    #[test]
    fn only_new_messages_mark_read_on_view() {
        assert!(marks_read_on_view(STATUS_NEW));
        assert!(!marks_read_on_view(STATUS_READ));
        assert!(!marks_read_on_view(STATUS_RESPONDED));
    }
}
