//! News feed entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// A published news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    /// Banner image URL. Empty when the article has no banner.
    #[serde(default)]
    pub banner_url: String,
    pub published_at: DateTime<Utc>,
}

impl NewsItem {
    /// Order a feed newest first. Articles published in the same instant
    /// keep newest-inserted first.
    pub fn sort_newest_first(items: &mut [Self]) {
        items.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| b.id.cmp(&a.id))
        });
    }
}

/// A validated article waiting for an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsDraft {
    pub title: String,
    pub description: String,
    pub banner_url: String,
    pub published_at: DateTime<Utc>,
}

impl NewsDraft {
    #[must_use]
    pub fn into_record(self, id: RecordId) -> NewsItem {
        NewsItem {
            id,
            title: self.title,
            description: self.description,
            banner_url: self.banner_url,
            published_at: self.published_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::timestamp_from_ms;

    fn item(published_ms: u64, counter: u8) -> NewsItem {
        let mut bytes = [0u8; 12];
        bytes[11] = counter;
        NewsItem {
            id: RecordId(bytes),
            title: format!("t{counter}"),
            description: "d".to_string(),
            banner_url: String::new(),
            published_at: timestamp_from_ms(published_ms),
        }
    }

    #[test]
    fn test_sort_newest_first() {
        let mut items = vec![item(2_000, 1), item(5_000, 2), item(1_000, 3), item(4_000, 4)];
        NewsItem::sort_newest_first(&mut items);

        let order: Vec<u64> = items
            .iter()
            .map(|i| u64::try_from(i.published_at.timestamp_millis()).unwrap())
            .collect();
        assert_eq!(order, vec![5_000, 4_000, 2_000, 1_000]);
    }

    #[test]
    fn test_sort_ties_newest_insert_first() {
        let mut items = vec![item(1_000, 1), item(1_000, 2), item(1_000, 3)];
        NewsItem::sort_newest_first(&mut items);

        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["t3", "t2", "t1"]);
    }

    #[test]
    fn test_missing_banner_defaults_to_empty() {
        let json = r#"{
            "id": "6553f100abcdef012300002a",
            "title": "Roster update",
            "description": "New signing",
            "publishedAt": "2024-01-01T00:00:00Z"
        }"#;
        let item: NewsItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.banner_url, "");
    }
}
