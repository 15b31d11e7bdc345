//! Record types held by the store.

pub mod application;
pub mod contact_message;
pub mod ids;
pub mod news_item;
pub mod popup_banner;

pub use application::{
    Application, ApplicationDraft, ApplicationStatus, REQUIRED_APPLICATION_FIELDS,
};
pub use contact_message::{ContactDraft, ContactMessage, ContactStatus};
pub use ids::{ParseRecordIdError, RecordId};
pub use news_item::{NewsDraft, NewsItem};
pub use popup_banner::{PopupBanner, PopupDraft};

/// Trim a submitted text field, treating blank input as absent.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  hi ".to_string())), Some("hi".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }
}
