//! Recruitment applications.
//!
//! An application is a bag of applicant-supplied fields (in-game name, rank,
//! region, role-specific answers, ...) plus a server-owned lifecycle: an id,
//! a status and a submission timestamp.
//!
//! # Invariants
//!
//! - New applications always start as `pending`.
//! - The only status an admin may set is `approved` or `rejected`.
//! - Applicant fields never shadow the server-owned keys (`id`, `status`,
//!   `submittedAt`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RecordId;

/// Fields an applicant must fill in for the submission to be accepted.
pub const REQUIRED_APPLICATION_FIELDS: [&str; 6] = [
    "ign",
    "rank",
    "region",
    "experience",
    "favoriteHero",
    "whyJoin",
];

/// Keys owned by the server. Submitted values for these are discarded.
const RESERVED_FIELDS: [&str; 3] = ["id", "status", "submittedAt"];

/// Review state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Parse a reviewer decision. `pending` is not a decision.
    #[must_use]
    pub fn decision(value: &str) -> Option<Self> {
        match value {
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: RecordId,
    /// Applicant-supplied fields, flattened into the serialized record.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
}

impl Application {
    /// Look up an applicant field as a string.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// An application that has passed validation but has no id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationDraft {
    pub fields: Map<String, Value>,
    pub submitted_at: DateTime<Utc>,
}

impl ApplicationDraft {
    /// Build a draft from submitted fields.
    ///
    /// # Errors
    ///
    /// Returns the names of required fields that are absent, not strings,
    /// or blank.
    pub fn new(
        mut fields: Map<String, Value>,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, Vec<&'static str>> {
        let missing = missing_fields(&fields);
        if !missing.is_empty() {
            return Err(missing);
        }

        for key in RESERVED_FIELDS {
            fields.remove(key);
        }

        Ok(Self {
            fields,
            submitted_at,
        })
    }

    /// Assign an id. The result is always pending.
    #[must_use]
    pub fn into_record(self, id: RecordId) -> Application {
        Application {
            id,
            fields: self.fields,
            status: ApplicationStatus::Pending,
            submitted_at: self.submitted_at,
        }
    }
}

/// Required fields that are absent, not strings, or blank.
#[must_use]
pub fn missing_fields(fields: &Map<String, Value>) -> Vec<&'static str> {
    REQUIRED_APPLICATION_FIELDS
        .into_iter()
        .filter(|name| {
            fields
                .get(*name)
                .and_then(Value::as_str)
                .is_none_or(|value| value.trim().is_empty())
        })
        .collect()
}
