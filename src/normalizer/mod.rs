mod text;

pub use text::{decode_entities, strip_html};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::{Article, FeedDescriptor, RawItem, PLACEHOLDER_LINK, UNTITLED};

/// Maps parsed entries onto [`Article`]. Stateless; cheap to clone into
/// concurrent tasks.
#[derive(Debug, Clone, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize using the current wall clock for undated items.
    ///
    /// An item without a publish date gets "now", so it can land in a
    /// different position on every aggregation run.
    pub fn normalize(&self, raw: &RawItem, feed: &FeedDescriptor) -> Article {
        self.normalize_at(raw, feed, Utc::now())
    }

    pub fn normalize_at(&self, raw: &RawItem, feed: &FeedDescriptor, now: DateTime<Utc>) -> Article {
        let title = non_empty(&raw.title)
            .map(decode_entities)
            .unwrap_or_else(|| UNTITLED.to_string());

        let link = non_empty(&raw.link)
            .map(str::to_string)
            .unwrap_or_else(|| PLACEHOLDER_LINK.to_string());

        let pub_date = non_empty(&raw.pub_date)
            .map(str::to_string)
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true));

        Article {
            title,
            link,
            pub_date,
            content_snippet: raw.content_snippet.clone(),
            content: raw.content.clone(),
            creator: raw.creator.as_deref().map(decode_entities),
            iso_date: raw.iso_date.clone(),
            feed_name: feed.name.clone(),
        }
    }

    pub fn normalize_all(&self, raw: &[RawItem], feed: &FeedDescriptor) -> Vec<Article> {
        let now = Utc::now();
        raw.iter()
            .map(|item| self.normalize_at(item, feed, now))
            .collect()
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
