//! Document-collection store backed by an embedded `redb` database.
//!
//! Each record kind is a table mapping the record id (24 hex chars) to the
//! record serialized as a JSON document. Ids are generated by the store and
//! sort in creation order, so a table scan yields insertion order.
//!
//! # Atomicity
//!
//! redb serializes write transactions, and every mutating operation here
//! runs inside exactly one. `publish_popup` deactivates the previous banner
//! and inserts the new one in the same transaction, so readers see either
//! the old active banner or the new one, never zero or two.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{RecordStore, StoreError};
use crate::time::TimeSource;
use crate::types::{
    Application, ApplicationDraft, ApplicationStatus, ContactDraft, ContactMessage, ContactStatus,
    NewsDraft, NewsItem, PopupBanner, PopupDraft, RecordId,
};

const APPLICATIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("applications");
const NEWS: TableDefinition<&str, &[u8]> = TableDefinition::new("news");
const POPUPS: TableDefinition<&str, &[u8]> = TableDefinition::new("popups");
const CONTACTS: TableDefinition<&str, &[u8]> = TableDefinition::new("contacts");

macro_rules! unavailable_from {
    ($($error:ty),* $(,)?) => {
        $(
            impl From<$error> for StoreError {
                fn from(e: $error) -> Self {
                    Self::Unavailable(e.to_string())
                }
            }
        )*
    };
}

unavailable_from!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

/// Store backed by a single redb file.
pub struct DocumentStore {
    db: Database,
    clock: Arc<dyn TimeSource>,
}

impl DocumentStore {
    /// Open (or create) the database at `path` and make sure every
    /// collection exists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the file cannot be opened or is
    /// locked by another process.
    pub fn open(path: &Path, clock: Arc<dyn TimeSource>) -> Result<Self, StoreError> {
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        write_txn.open_table(APPLICATIONS)?;
        write_txn.open_table(NEWS)?;
        write_txn.open_table(POPUPS)?;
        write_txn.open_table(CONTACTS)?;
        write_txn.commit()?;

        tracing::info!("opened document store at {}", path.display());
        Ok(Self { db, clock })
    }

    fn next_id(&self) -> RecordId {
        RecordId::generate(self.clock.now_secs())
    }

    fn list<T: DeserializeOwned>(
        &self,
        table: TableDefinition<&str, &[u8]>,
    ) -> Result<Vec<T>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;

        let mut records = Vec::new();
        for entry in table.iter()? {
            let (_, document) = entry?;
            records.push(serde_json::from_slice(document.value())?);
        }
        Ok(records)
    }

    fn insert<T: Serialize>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        id: RecordId,
        record: &T,
    ) -> Result<(), StoreError> {
        let document = serde_json::to_vec(record)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(table)?;
            table.insert(id.to_hex().as_str(), document.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Read, modify and write back one document in a single transaction.
    fn update<T: Serialize + DeserializeOwned>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        id: RecordId,
        apply: impl FnOnce(&mut T),
    ) -> Result<Option<T>, StoreError> {
        let key = id.to_hex();
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(table)?;

            let existing: Option<Vec<u8>> =
                table.get(key.as_str())?.map(|guard| guard.value().to_vec());

            match existing {
                None => None,
                Some(bytes) => {
                    let mut record: T = serde_json::from_slice(&bytes)?;
                    apply(&mut record);
                    let document = serde_json::to_vec(&record)?;
                    table.insert(key.as_str(), document.as_slice())?;
                    Some(record)
                }
            }
        };

        if updated.is_some() {
            write_txn.commit()?;
        } else {
            write_txn.abort()?;
        }
        Ok(updated)
    }

    fn remove<T: DeserializeOwned>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        id: RecordId,
    ) -> Result<Option<T>, StoreError> {
        let key = id.to_hex();
        let write_txn = self.db.begin_write()?;
        let removed: Option<Vec<u8>> = {
            let mut table = write_txn.open_table(table)?;
            let removed = table.remove(key.as_str())?;
            removed.map(|guard| guard.value().to_vec())
        };

        match removed {
            None => {
                write_txn.abort()?;
                Ok(None)
            }
            Some(bytes) => {
                let record = serde_json::from_slice(&bytes)?;
                write_txn.commit()?;
                Ok(Some(record))
            }
        }
    }
}

impl RecordStore for DocumentStore {
    fn backend_name(&self) -> &'static str {
        "document"
    }

    fn list_applications(&self) -> Result<Vec<Application>, StoreError> {
        self.list(APPLICATIONS)
    }

    fn insert_application(&self, draft: ApplicationDraft) -> Result<Application, StoreError> {
        let record = draft.into_record(self.next_id());
        self.insert(APPLICATIONS, record.id, &record)?;
        Ok(record)
    }

    fn update_application_status(
        &self,
        id: RecordId,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, StoreError> {
        self.update(APPLICATIONS, id, |application: &mut Application| {
            application.status = status;
        })
    }

    fn remove_application(&self, id: RecordId) -> Result<Option<Application>, StoreError> {
        self.remove(APPLICATIONS, id)
    }

    fn list_news(&self) -> Result<Vec<NewsItem>, StoreError> {
        self.list(NEWS)
    }

    fn insert_news(&self, draft: NewsDraft) -> Result<NewsItem, StoreError> {
        let record = draft.into_record(self.next_id());
        self.insert(NEWS, record.id, &record)?;
        Ok(record)
    }

    fn remove_news(&self, id: RecordId) -> Result<Option<NewsItem>, StoreError> {
        self.remove(NEWS, id)
    }

    fn active_popup(&self) -> Result<Option<PopupBanner>, StoreError> {
        let popups: Vec<PopupBanner> = self.list(POPUPS)?;
        Ok(popups.into_iter().find(|p| p.active))
    }

    fn publish_popup(&self, draft: PopupDraft) -> Result<PopupBanner, StoreError> {
        let at = draft.created_at;
        let record = draft.into_record(self.next_id());
        let document = serde_json::to_vec(&record)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(POPUPS)?;

            let mut deactivated = Vec::new();
            for entry in table.iter()? {
                let (key, value) = entry?;
                let mut popup: PopupBanner = serde_json::from_slice(value.value())?;
                if popup.active {
                    popup.deactivate(at);
                    deactivated.push((key.value().to_string(), serde_json::to_vec(&popup)?));
                }
            }

            for (key, updated) in &deactivated {
                table.insert(key.as_str(), updated.as_slice())?;
            }
            table.insert(record.id.to_hex().as_str(), document.as_slice())?;
        }
        write_txn.commit()?;

        Ok(record)
    }

    fn retract_popup(
        &self,
        id: RecordId,
        at: DateTime<Utc>,
    ) -> Result<Option<PopupBanner>, StoreError> {
        self.update(POPUPS, id, |popup: &mut PopupBanner| popup.deactivate(at))
    }

    fn list_contacts(&self) -> Result<Vec<ContactMessage>, StoreError> {
        self.list(CONTACTS)
    }

    fn insert_contact(&self, draft: ContactDraft) -> Result<ContactMessage, StoreError> {
        let record = draft.into_record(self.next_id());
        self.insert(CONTACTS, record.id, &record)?;
        Ok(record)
    }

    fn update_contact_status(
        &self,
        id: RecordId,
        status: ContactStatus,
    ) -> Result<Option<ContactMessage>, StoreError> {
        self.update(CONTACTS, id, |contact: &mut ContactMessage| {
            contact.status = status;
        })
    }

    fn remove_contact(&self, id: RecordId) -> Result<Option<ContactMessage>, StoreError> {
        self.remove(CONTACTS, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;
    use crate::time::ManualTimeSource;

    /// Keeps the temp directory alive for as long as the store is used.
    struct TestStore {
        store: DocumentStore,
        _dir: tempfile::TempDir,
    }

    fn new_store() -> TestStore {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(
            &dir.path().join("test.redb"),
            Arc::new(ManualTimeSource::new(contract::START_MS)),
        )
        .unwrap();
        TestStore { store, _dir: dir }
    }

    #[test]
    fn test_application_lifecycle() {
        contract::application_lifecycle(&new_store().store);
    }

    #[test]
    fn test_unknown_ids_do_not_mutate() {
        contract::unknown_ids_do_not_mutate(&new_store().store);
    }

    #[test]
    fn test_news_insert_and_remove() {
        contract::news_insert_and_remove(&new_store().store);
    }

    #[test]
    fn test_publish_popup_keeps_one_active() {
        contract::publish_popup_keeps_one_active(&new_store().store);
    }

    #[test]
    fn test_retract_popup_keeps_record() {
        contract::retract_popup_keeps_record(&new_store().store);
    }

    #[test]
    fn test_contact_lifecycle() {
        contract::contact_lifecycle(&new_store().store);
    }

    #[test]
    fn test_concurrent_inserts_get_distinct_ids() {
        let test = new_store();
        contract::concurrent_inserts_get_distinct_ids(Arc::new(test.store));
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reopen.redb");
        let clock: Arc<dyn TimeSource> = Arc::new(ManualTimeSource::new(contract::START_MS));

        let inserted = {
            let store = DocumentStore::open(&path, Arc::clone(&clock)).unwrap();
            store.insert_news(contract::news_draft("Persisted", 1_000)).unwrap()
        };

        let store = DocumentStore::open(&path, clock).unwrap();
        assert_eq!(store.list_news().unwrap(), vec![inserted]);
    }

    #[test]
    fn test_corrupt_document_is_reported() {
        let test = new_store();
        let id = RecordId::generate(1);
        let write_txn = test.store.db.begin_write().unwrap();
        {
            let mut table = write_txn.open_table(NEWS).unwrap();
            table
                .insert(id.to_hex().as_str(), b"not json".as_slice())
                .unwrap();
        }
        write_txn.commit().unwrap();

        assert!(matches!(
            test.store.list_news(),
            Err(StoreError::Corrupt(_))
        ));
    }
}
