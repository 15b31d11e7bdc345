//! Admin login check.
//!
//! Operators are authenticated against a fixed allow-list of
//! (username, password) pairs loaded from configuration. The check is plain
//! equality. It sits behind [`CredentialCheck`] so a hashed or external
//! implementation can replace it without touching the login handler.
//!
//! # Invariants
//! - The allow-list is never empty.
//! - No entry has an empty username or password.

/// Error returned when admin credentials are misconfigured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// No admin credentials were configured.
    Empty,
    /// An entry is not of the form `username:password`.
    Malformed(String),
    /// An entry has an empty username or password.
    EmptyField(String),
}

impl std::fmt::Display for CredentialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "at least one admin credential is required"),
            Self::Malformed(entry) => {
                write!(f, "credential entry '{entry}' must be username:password")
            }
            Self::EmptyField(username) => write!(
                f,
                "credential for '{username}' must have a non-empty username and password"
            ),
        }
    }
}

impl std::error::Error for CredentialError {}

/// Decides whether a login attempt names a known operator.
pub trait CredentialCheck: Send + Sync {
    fn check(&self, username: &str, password: &str) -> bool;
}

/// One configured admin account.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredential {
    pub username: String,
    pub password: String,
}

impl AdminCredential {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Parse a `username:password` entry. The password may itself contain
    /// colons; the username may not.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Malformed` if there is no colon.
    pub fn parse(entry: &str) -> Result<Self, CredentialError> {
        let (username, password) = entry
            .split_once(':')
            .ok_or_else(|| CredentialError::Malformed(redact(entry)))?;
        Ok(Self::new(username.trim(), password))
    }
}

// Passwords never reach logs.
impl std::fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn redact(entry: &str) -> String {
    let visible: String = entry.chars().take(3).collect();
    format!("{visible}...")
}

/// Allow-list of admin accounts, compared by exact equality.
#[derive(Debug, Clone)]
pub struct AdminAllowList {
    entries: Vec<AdminCredential>,
}

impl AdminAllowList {
    /// Build the allow-list.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Empty` if `entries` is empty, or
    /// `CredentialError::EmptyField` if any entry has a blank part.
    pub fn new(entries: Vec<AdminCredential>) -> Result<Self, CredentialError> {
        if entries.is_empty() {
            return Err(CredentialError::Empty);
        }
        if let Some(bad) = entries
            .iter()
            .find(|c| c.username.is_empty() || c.password.is_empty())
        {
            return Err(CredentialError::EmptyField(bad.username.clone()));
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CredentialCheck for AdminAllowList {
    fn check(&self, username: &str, password: &str) -> bool {
        self.entries
            .iter()
            .any(|c| c.username == username && c.password == password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow_list() -> AdminAllowList {
        AdminAllowList::new(vec![
            AdminCredential::new("admin", "hunter2"),
            AdminCredential::new("coach", "s3cret:with:colons"),
        ])
        .unwrap()
    }

    #[test]
    fn test_check_accepts_every_configured_pair() {
        let list = allow_list();
        assert!(list.check("admin", "hunter2"));
        assert!(list.check("coach", "s3cret:with:colons"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_check_rejects_mismatched_pairs() {
        let list = allow_list();
        assert!(!list.check("admin", "wrong"));
        assert!(!list.check("admin", "s3cret:with:colons"));
        assert!(!list.check("coach", "hunter2"));
        assert!(!list.check("Admin", "hunter2"));
        assert!(!list.check("", ""));
    }

    #[test]
    fn test_new_rejects_empty_list() {
        assert_eq!(
            AdminAllowList::new(Vec::new()).unwrap_err(),
            CredentialError::Empty
        );
    }

    #[test]
    fn test_new_rejects_blank_fields() {
        let err = AdminAllowList::new(vec![AdminCredential::new("admin", "")]).unwrap_err();
        assert_eq!(err, CredentialError::EmptyField("admin".to_string()));

        let err = AdminAllowList::new(vec![AdminCredential::new("", "pw")]).unwrap_err();
        assert_eq!(err, CredentialError::EmptyField(String::new()));
    }

    #[test]
    fn test_parse_splits_on_first_colon() {
        let credential = AdminCredential::parse("coach:a:b").unwrap();
        assert_eq!(credential.username, "coach");
        assert_eq!(credential.password, "a:b");
    }

    #[test]
    fn test_parse_rejects_missing_colon() {
        assert!(matches!(
            AdminCredential::parse("adminhunter2"),
            Err(CredentialError::Malformed(_))
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", AdminCredential::new("admin", "hunter2"));
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }
}
