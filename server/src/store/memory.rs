//! Process-local record store.
//!
//! All collections sit behind one `Mutex`, so every read-modify-write
//! (scan, update, write back) happens under a single guard.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::{RecordStore, StoreError};
use crate::time::TimeSource;
use crate::types::{
    Application, ApplicationDraft, ApplicationStatus, ContactDraft, ContactMessage, ContactStatus,
    NewsDraft, NewsItem, PopupBanner, PopupDraft, RecordId,
};

#[derive(Default)]
struct Collections {
    applications: Vec<Application>,
    news: Vec<NewsItem>,
    popups: Vec<PopupBanner>,
    contacts: Vec<ContactMessage>,
}

/// In-memory store. Records are kept in insertion order.
pub struct MemoryStore {
    collections: Mutex<Collections>,
    clock: Arc<dyn TimeSource>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self {
            collections: Mutex::new(Collections::default()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, StoreError> {
        self.collections
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn next_id(&self) -> RecordId {
        RecordId::generate(self.clock.now_secs())
    }
}

/// Remove the record with `id` from `records`, keeping the order of the rest.
fn take<T>(records: &mut Vec<T>, id: RecordId, id_of: impl Fn(&T) -> RecordId) -> Option<T> {
    let index = records.iter().position(|r| id_of(r) == id)?;
    Some(records.remove(index))
}

impl RecordStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn list_applications(&self) -> Result<Vec<Application>, StoreError> {
        Ok(self.lock()?.applications.clone())
    }

    fn insert_application(&self, draft: ApplicationDraft) -> Result<Application, StoreError> {
        let record = draft.into_record(self.next_id());
        self.lock()?.applications.push(record.clone());
        Ok(record)
    }

    fn update_application_status(
        &self,
        id: RecordId,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, StoreError> {
        let mut collections = self.lock()?;
        let updated = collections
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .map(|application| {
                application.status = status;
                application.clone()
            });
        Ok(updated)
    }

    fn remove_application(&self, id: RecordId) -> Result<Option<Application>, StoreError> {
        Ok(take(&mut self.lock()?.applications, id, |a| a.id))
    }

    fn list_news(&self) -> Result<Vec<NewsItem>, StoreError> {
        Ok(self.lock()?.news.clone())
    }

    fn insert_news(&self, draft: NewsDraft) -> Result<NewsItem, StoreError> {
        let record = draft.into_record(self.next_id());
        self.lock()?.news.push(record.clone());
        Ok(record)
    }

    fn remove_news(&self, id: RecordId) -> Result<Option<NewsItem>, StoreError> {
        Ok(take(&mut self.lock()?.news, id, |n| n.id))
    }

    fn active_popup(&self) -> Result<Option<PopupBanner>, StoreError> {
        Ok(self.lock()?.popups.iter().find(|p| p.active).cloned())
    }

    fn publish_popup(&self, draft: PopupDraft) -> Result<PopupBanner, StoreError> {
        let at = draft.created_at;
        let record = draft.into_record(self.next_id());

        let mut collections = self.lock()?;
        for popup in collections.popups.iter_mut().filter(|p| p.active) {
            popup.deactivate(at);
        }
        collections.popups.push(record.clone());
        drop(collections);

        Ok(record)
    }

    fn retract_popup(
        &self,
        id: RecordId,
        at: DateTime<Utc>,
    ) -> Result<Option<PopupBanner>, StoreError> {
        let mut collections = self.lock()?;
        let retracted = collections
            .popups
            .iter_mut()
            .find(|p| p.id == id)
            .map(|popup| {
                popup.deactivate(at);
                popup.clone()
            });
        Ok(retracted)
    }

    fn list_contacts(&self) -> Result<Vec<ContactMessage>, StoreError> {
        Ok(self.lock()?.contacts.clone())
    }

    fn insert_contact(&self, draft: ContactDraft) -> Result<ContactMessage, StoreError> {
        let record = draft.into_record(self.next_id());
        self.lock()?.contacts.push(record.clone());
        Ok(record)
    }

    fn update_contact_status(
        &self,
        id: RecordId,
        status: ContactStatus,
    ) -> Result<Option<ContactMessage>, StoreError> {
        let mut collections = self.lock()?;
        let updated = collections
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .map(|contact| {
                contact.status = status;
                contact.clone()
            });
        Ok(updated)
    }

    fn remove_contact(&self, id: RecordId) -> Result<Option<ContactMessage>, StoreError> {
        Ok(take(&mut self.lock()?.contacts, id, |c| c.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;
    use crate::time::ManualTimeSource;

    fn new_store() -> MemoryStore {
        MemoryStore::new(Arc::new(ManualTimeSource::new(contract::START_MS)))
    }

    #[test]
    fn test_application_lifecycle() {
        contract::application_lifecycle(&new_store());
    }

    #[test]
    fn test_unknown_ids_do_not_mutate() {
        contract::unknown_ids_do_not_mutate(&new_store());
    }

    #[test]
    fn test_news_insert_and_remove() {
        contract::news_insert_and_remove(&new_store());
    }

    #[test]
    fn test_publish_popup_keeps_one_active() {
        contract::publish_popup_keeps_one_active(&new_store());
    }

    #[test]
    fn test_retract_popup_keeps_record() {
        contract::retract_popup_keeps_record(&new_store());
    }

    #[test]
    fn test_contact_lifecycle() {
        contract::contact_lifecycle(&new_store());
    }

    #[test]
    fn test_concurrent_inserts_get_distinct_ids() {
        contract::concurrent_inserts_get_distinct_ids(Arc::new(new_store()));
    }

    #[test]
    fn test_poisoned_lock_reports_unavailable() {
        let store = Arc::new(new_store());
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.collections.lock().unwrap();
            panic!("poison the store lock");
        })
        .join();

        assert!(matches!(
            store.list_news(),
            Err(StoreError::Unavailable(_))
        ));
    }
}
