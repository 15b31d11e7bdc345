//! Messages sent through the public contact form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// Whether an admin has read the message yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Unread,
    Read,
}

impl ContactStatus {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "unread" => Some(Self::Unread),
            "read" => Some(Self::Read),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
        }
    }
}

/// A stored contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub submitted_at: DateTime<Utc>,
}

/// A validated message waiting for an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

impl ContactDraft {
    /// Assign an id. New messages are unread.
    #[must_use]
    pub fn into_record(self, id: RecordId) -> ContactMessage {
        ContactMessage {
            id,
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            status: ContactStatus::Unread,
            submitted_at: self.submitted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(ContactStatus::parse("read"), Some(ContactStatus::Read));
        assert_eq!(ContactStatus::parse("unread"), Some(ContactStatus::Unread));
        assert_eq!(ContactStatus::parse("archived"), None);
        assert_eq!(ContactStatus::Read.as_str(), "read");
    }

    #[test]
    fn test_new_message_is_unread() {
        let message = ContactDraft {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            subject: "Sponsorship".to_string(),
            message: "Hello".to_string(),
            submitted_at: DateTime::default(),
        }
        .into_record(RecordId::generate(0));

        assert_eq!(message.status, ContactStatus::Unread);
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["status"], "unread");
        assert_eq!(value["submittedAt"], "1970-01-01T00:00:00Z");
    }
}
