//! Product records as supplied by the commerce backend.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub identifier: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_bio: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub binding: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub imprint: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub illustrations: Option<String>,
    #[serde(default)]
    pub edition: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub additional_images: Vec<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Item {
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            subtitle: None,
            description: None,
            author: None,
            author_bio: None,
            price: None,
            binding: None,
            page_count: None,
            imprint: None,
            dimensions: None,
            release_date: None,
            weight: None,
            illustrations: None,
            edition: None,
            image_url: None,
            additional_images: vec![],
            vendor: None,
            tags: BTreeSet::new(),
        }
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn with_author_bio(mut self, text: impl Into<String>) -> Self {
        self.author_bio = Some(text.into());
        self
    }
}

/// Drops repeated identifiers, keeping the first occurrence and the original order.
///
/// This is a caller-side pre-pass; the planner never deduplicates on its own.
pub fn dedup_by_identifier(items: &[Item]) -> Vec<Item> {
    first_occurrences(items).into_iter().map(|i| items[i].clone()).collect()
}

/// Indices of the first item carrying each identifier, in input order.
pub fn first_occurrences(items: &[Item]) -> Vec<usize> {
    let mut seen = HashSet::new();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| seen.insert(item.identifier.as_str()))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_item() {
        let item: Item = serde_json::from_str(
            r#"{"identifier": "9780306406157", "title": "Optics", "authorBio": "Physicist"}"#,
        )
        .unwrap();
        assert_eq!(item.title, "Optics");
        assert_eq!(item.author_bio.as_deref(), Some("Physicist"));
        assert!(item.description.is_none());
        assert!(item.tags.is_empty());
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let items = vec![
            Item::new("a", "First"),
            Item::new("b", "Second"),
            Item::new("a", "Duplicate"),
        ];
        let deduped = dedup_by_identifier(&items);
        let titles: Vec<_> = deduped.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }
}
