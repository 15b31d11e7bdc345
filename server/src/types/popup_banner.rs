//! Promotional popup banners.
//!
//! # Invariants
//!
//! - At most one banner is active at a time. Publishing a banner deactivates
//!   all others; stores enforce this inside a single critical section.
//! - Retracting a banner only clears `active`; the record stays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// A popup banner shown to site visitors while active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupBanner {
    pub id: RecordId,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PopupBanner {
    /// Mark the banner inactive as of `at`.
    pub fn deactivate(&mut self, at: DateTime<Utc>) {
        self.active = false;
        self.updated_at = at;
    }
}

/// A validated banner waiting for an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupDraft {
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub link_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PopupDraft {
    /// Assign an id. The result is always active.
    #[must_use]
    pub fn into_record(self, id: RecordId) -> PopupBanner {
        PopupBanner {
            id,
            title: self.title,
            message: self.message,
            link: self.link,
            link_text: self.link_text,
            active: true,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::timestamp_from_ms;

    #[test]
    fn test_draft_is_published_active() {
        let draft = PopupDraft {
            title: "Merch drop".to_string(),
            message: "New jerseys".to_string(),
            link: Some("/merch.html".to_string()),
            link_text: None,
            created_at: timestamp_from_ms(1_000),
        };
        let banner = draft.into_record(RecordId::generate(1));
        assert!(banner.active);
        assert_eq!(banner.created_at, banner.updated_at);
    }

    #[test]
    fn test_deactivate_bumps_updated_at() {
        let mut banner = PopupDraft {
            title: "t".to_string(),
            message: "m".to_string(),
            link: None,
            link_text: None,
            created_at: timestamp_from_ms(1_000),
        }
        .into_record(RecordId::generate(1));

        banner.deactivate(timestamp_from_ms(9_000));
        assert!(!banner.active);
        assert_eq!(banner.updated_at, timestamp_from_ms(9_000));
        assert_eq!(banner.created_at, timestamp_from_ms(1_000));
    }

    #[test]
    fn test_absent_link_is_omitted() {
        let banner = PopupDraft {
            title: "t".to_string(),
            message: "m".to_string(),
            link: None,
            link_text: None,
            created_at: timestamp_from_ms(0),
        }
        .into_record(RecordId::generate(0));

        let value = serde_json::to_value(&banner).unwrap();
        assert!(value.get("link").is_none());
        assert!(value.get("linkText").is_none());
        assert_eq!(value["active"], true);
    }
}
