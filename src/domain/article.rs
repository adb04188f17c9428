use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNTITLED: &str = "No Title";
pub const PLACEHOLDER_LINK: &str = "#";

/// A normalized feed entry. `title`, `link` and `pub_date` are always
/// populated; see [`Normalizer`](crate::normalizer::Normalizer) for the
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub link: String,
    pub pub_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_date: Option<String>,
    pub feed_name: String,
}

impl Article {
    /// The publish date as an instant, or `None` if it is in no format we
    /// recognise.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.pub_date)
    }

    pub fn display_date(&self) -> String {
        match self.published_at() {
            Some(d) => d.format("%Y-%m-%d %H:%M").to_string(),
            None => self.pub_date.clone(),
        }
    }

    /// Best available text for a preview line.
    pub fn display_snippet(&self) -> &str {
        self.content_snippet
            .as_deref()
            .or(self.content.as_deref())
            .unwrap_or("")
    }
}

/// Parse the timestamp formats feeds actually emit.
///
/// RFC 3339 and RFC 2822 carry their own offsets. Offset-less date-times and
/// bare dates, including spelled-out ones like "January 2, 2020", are read
/// as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Misspelled or long weekday names ("Thurs, ...") break RFC 2822; the
    // weekday is optional there.
    if let Some((_, rest)) = s.split_once(", ") {
        if let Ok(dt) = DateTime::parse_from_rfc2822(rest) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    const DATE_TIMES: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%a, %d %b %Y %H:%M:%S",
        "%d %b %Y %H:%M:%S",
        "%B %d, %Y %H:%M:%S",
    ];
    for fmt in DATE_TIMES {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    const DATES: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%d %B %Y", "%a, %d %b %Y"];
    DATES
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
