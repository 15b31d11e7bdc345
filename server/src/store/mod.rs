//! Record persistence.
//!
//! All record kinds live behind the [`RecordStore`] trait. Two backends are
//! provided and picked at startup:
//!
//! - [`MemoryStore`]: ordered in-process collections behind one mutex. Data
//!   is lost on restart.
//! - [`DocumentStore`]: one document collection per record kind in an
//!   embedded `redb` file. Each record is a JSON document keyed by its id.
//!
//! # Pre-conditions
//! - Drafts passed to `insert_*` have already been validated.
//!
//! # Post-conditions
//! - Every operation is a single critical section: a mutex guard for the
//!   memory store, a single transaction for the document store.
//! - `publish_popup` leaves exactly one active banner, and no reader can
//!   observe an intermediate state.
//!
//! # Invariants
//! - Listing returns records in insertion order.
//! - Ids are assigned by the store and never reused.

mod document;
mod memory;

#[cfg(test)]
mod contract;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

pub use document::DocumentStore;
pub use memory::MemoryStore;

use crate::time::TimeSource;
use crate::types::{
    Application, ApplicationDraft, ApplicationStatus, ContactDraft, ContactMessage, ContactStatus,
    NewsDraft, NewsItem, PopupBanner, PopupDraft, RecordId,
};

/// Error returned by store operations.
#[derive(Debug)]
pub enum StoreError {
    /// The backing store cannot be reached or its lock is poisoned.
    Unavailable(String),
    /// A stored document could not be decoded or encoded.
    Corrupt(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "store unavailable: {reason}"),
            Self::Corrupt(reason) => write!(f, "corrupt document: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Corrupt(e.to_string())
    }
}

/// Which backend holds the records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local collections.
    Memory,
    /// Embedded document database at the given file path.
    Document { path: PathBuf },
}

/// Persistence boundary for every record kind.
///
/// Implementations must be safe to share across request handlers.
pub trait RecordStore: Send + Sync {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// All applications, oldest first.
    fn list_applications(&self) -> Result<Vec<Application>, StoreError>;

    /// Store a new application and return it with its assigned id.
    fn insert_application(&self, draft: ApplicationDraft) -> Result<Application, StoreError>;

    /// Overwrite an application's status. Returns `None` if no record has `id`.
    fn update_application_status(
        &self,
        id: RecordId,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, StoreError>;

    /// Remove an application, returning the removed record.
    fn remove_application(&self, id: RecordId) -> Result<Option<Application>, StoreError>;

    /// All news items in insertion order. Callers sort for display.
    fn list_news(&self) -> Result<Vec<NewsItem>, StoreError>;

    fn insert_news(&self, draft: NewsDraft) -> Result<NewsItem, StoreError>;

    fn remove_news(&self, id: RecordId) -> Result<Option<NewsItem>, StoreError>;

    /// The single active banner, if any.
    fn active_popup(&self) -> Result<Option<PopupBanner>, StoreError>;

    /// Deactivate every active banner and insert `draft` as the active one,
    /// atomically.
    fn publish_popup(&self, draft: PopupDraft) -> Result<PopupBanner, StoreError>;

    /// Clear `active` on a banner without deleting it.
    fn retract_popup(
        &self,
        id: RecordId,
        at: DateTime<Utc>,
    ) -> Result<Option<PopupBanner>, StoreError>;

    fn list_contacts(&self) -> Result<Vec<ContactMessage>, StoreError>;

    fn insert_contact(&self, draft: ContactDraft) -> Result<ContactMessage, StoreError>;

    fn update_contact_status(
        &self,
        id: RecordId,
        status: ContactStatus,
    ) -> Result<Option<ContactMessage>, StoreError>;

    fn remove_contact(&self, id: RecordId) -> Result<Option<ContactMessage>, StoreError>;
}

/// Open the configured backend.
///
/// For the document backend this creates the parent directory and the
/// database file if needed, and creates every collection up front.
///
/// # Errors
///
/// Returns `StoreError::Unavailable` if the database cannot be opened.
pub fn open(
    backend: &StoreBackend,
    clock: Arc<dyn TimeSource>,
) -> Result<Arc<dyn RecordStore>, StoreError> {
    match backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new(clock))),
        StoreBackend::Document { path } => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Unavailable(format!(
                        "cannot create {}: {e}",
                        parent.display()
                    ))
                })?;
            }
            Ok(Arc::new(DocumentStore::open(path, clock)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::SystemTimeSource;

    #[test]
    fn test_open_memory_backend() {
        let store = open(&StoreBackend::Memory, Arc::new(SystemTimeSource)).unwrap();
        assert_eq!(store.backend_name(), "memory");
        assert!(store.list_applications().unwrap().is_empty());
    }

    #[test]
    fn test_open_document_backend_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("clubhouse.redb");

        let store = open(
            &StoreBackend::Document { path: path.clone() },
            Arc::new(SystemTimeSource),
        )
        .unwrap();
        assert_eq!(store.backend_name(), "document");
        assert!(path.is_file());
    }

    #[test]
    fn test_store_error_display() {
        assert_eq!(
            StoreError::Unavailable("lock poisoned".to_string()).to_string(),
            "store unavailable: lock poisoned"
        );
        assert_eq!(
            StoreError::Corrupt("bad json".to_string()).to_string(),
            "corrupt document: bad json"
        );
    }
}
