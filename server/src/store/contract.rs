//! Behaviour every `RecordStore` backend must share.
//!
//! Each backend's test module calls these with a fresh store.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Value, json};

use super::RecordStore;
use crate::time::timestamp_from_ms;
use crate::types::{
    ApplicationDraft, ApplicationStatus, ContactDraft, ContactStatus, NewsDraft, PopupDraft,
    RecordId,
};

pub const START_MS: u64 = 1_700_000_000_000;

pub fn application_draft(ign: &str) -> ApplicationDraft {
    let Value::Object(fields) = json!({
        "ign": ign,
        "rank": "Gold",
        "region": "NA",
        "experience": "2y",
        "favoriteHero": "X",
        "whyJoin": "fun",
    }) else {
        unreachable!()
    };
    ApplicationDraft::new(fields, timestamp_from_ms(START_MS)).unwrap()
}

pub fn news_draft(title: &str, published_ms: u64) -> NewsDraft {
    NewsDraft {
        title: title.to_string(),
        description: "description".to_string(),
        banner_url: String::new(),
        published_at: timestamp_from_ms(published_ms),
    }
}

pub fn popup_draft(title: &str, created_ms: u64) -> PopupDraft {
    PopupDraft {
        title: title.to_string(),
        message: "message".to_string(),
        link: None,
        link_text: None,
        created_at: timestamp_from_ms(created_ms),
    }
}

pub fn contact_draft(subject: &str) -> ContactDraft {
    ContactDraft {
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        subject: subject.to_string(),
        message: "hello".to_string(),
        submitted_at: timestamp_from_ms(START_MS),
    }
}

fn unknown_id() -> RecordId {
    RecordId([0xEE; 12])
}

pub fn application_lifecycle(store: &dyn RecordStore) {
    let first = store.insert_application(application_draft("Foo")).unwrap();
    let second = store.insert_application(application_draft("Bar")).unwrap();
    assert_eq!(first.status, ApplicationStatus::Pending);

    let listed = store.list_applications().unwrap();
    assert_eq!(listed, vec![first.clone(), second.clone()]);

    let approved = store
        .update_application_status(first.id, ApplicationStatus::Approved)
        .unwrap()
        .unwrap();
    assert_eq!(approved.status, ApplicationStatus::Approved);
    assert_eq!(approved.fields, first.fields);

    // A decided application can still be overwritten.
    let rejected = store
        .update_application_status(first.id, ApplicationStatus::Rejected)
        .unwrap()
        .unwrap();
    assert_eq!(rejected.status, ApplicationStatus::Rejected);

    let removed = store.remove_application(second.id).unwrap().unwrap();
    assert_eq!(removed, second);
    assert_eq!(store.list_applications().unwrap(), vec![rejected]);
    assert!(store.remove_application(second.id).unwrap().is_none());
}

pub fn unknown_ids_do_not_mutate(store: &dyn RecordStore) {
    let application = store.insert_application(application_draft("Foo")).unwrap();
    let news = store.insert_news(news_draft("Kept", START_MS)).unwrap();
    let popup = store.publish_popup(popup_draft("Kept", START_MS)).unwrap();
    let contact = store.insert_contact(contact_draft("Kept")).unwrap();

    let id = unknown_id();
    assert!(
        store
            .update_application_status(id, ApplicationStatus::Approved)
            .unwrap()
            .is_none()
    );
    assert!(store.remove_application(id).unwrap().is_none());
    assert!(store.remove_news(id).unwrap().is_none());
    assert!(
        store
            .retract_popup(id, timestamp_from_ms(START_MS))
            .unwrap()
            .is_none()
    );
    assert!(
        store
            .update_contact_status(id, ContactStatus::Read)
            .unwrap()
            .is_none()
    );
    assert!(store.remove_contact(id).unwrap().is_none());

    assert_eq!(store.list_applications().unwrap(), vec![application]);
    assert_eq!(store.list_news().unwrap(), vec![news]);
    assert_eq!(store.active_popup().unwrap(), Some(popup));
    assert_eq!(store.list_contacts().unwrap(), vec![contact]);
}

pub fn news_insert_and_remove(store: &dyn RecordStore) {
    let older = store.insert_news(news_draft("Older", START_MS)).unwrap();
    let newer = store.insert_news(news_draft("Newer", START_MS + 5_000)).unwrap();
    assert_ne!(older.id, newer.id);
    assert_eq!(store.list_news().unwrap(), vec![older.clone(), newer.clone()]);

    let removed = store.remove_news(older.id).unwrap().unwrap();
    assert_eq!(removed, older);
    assert_eq!(store.list_news().unwrap(), vec![newer]);
}

pub fn publish_popup_keeps_one_active(store: &dyn RecordStore) {
    assert!(store.active_popup().unwrap().is_none());

    for i in 0..5 {
        let published = store
            .publish_popup(popup_draft(&format!("Popup {i}"), START_MS + i))
            .unwrap();
        assert!(published.active);
        assert_eq!(store.active_popup().unwrap(), Some(published));
    }

    let active_count = count_active(store);
    assert_eq!(active_count, 1);
}

pub fn retract_popup_keeps_record(store: &dyn RecordStore) {
    let popup = store.publish_popup(popup_draft("Sale", START_MS)).unwrap();

    let retracted = store
        .retract_popup(popup.id, timestamp_from_ms(START_MS + 60_000))
        .unwrap()
        .unwrap();
    assert!(!retracted.active);
    assert_eq!(retracted.updated_at, timestamp_from_ms(START_MS + 60_000));
    assert_eq!(retracted.created_at, popup.created_at);
    assert!(store.active_popup().unwrap().is_none());

    // Retracting again still finds the record.
    assert!(
        store
            .retract_popup(popup.id, timestamp_from_ms(START_MS + 120_000))
            .unwrap()
            .is_some()
    );
}

pub fn contact_lifecycle(store: &dyn RecordStore) {
    let contact = store.insert_contact(contact_draft("Sponsorship")).unwrap();
    assert_eq!(contact.status, ContactStatus::Unread);

    let read = store
        .update_contact_status(contact.id, ContactStatus::Read)
        .unwrap()
        .unwrap();
    assert_eq!(read.status, ContactStatus::Read);
    assert_eq!(store.list_contacts().unwrap(), vec![read.clone()]);

    assert_eq!(store.remove_contact(contact.id).unwrap(), Some(read));
    assert!(store.list_contacts().unwrap().is_empty());
}

pub fn concurrent_inserts_get_distinct_ids<S: RecordStore + 'static>(store: Arc<S>) {
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                (0..25)
                    .map(|i| {
                        store
                            .insert_application(application_draft(&format!("w{worker}-{i}")))
                            .unwrap()
                            .id
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "duplicate id {id}");
        }
    }
    assert_eq!(ids.len(), 200);
    assert_eq!(store.list_applications().unwrap().len(), 200);
}

fn count_active(store: &dyn RecordStore) -> usize {
    // Retract the active banner and make sure nothing else was active.
    let mut count = 0;
    while let Some(popup) = store.active_popup().unwrap() {
        count += 1;
        store
            .retract_popup(popup.id, timestamp_from_ms(START_MS))
            .unwrap();
    }
    count
}
