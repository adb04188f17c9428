use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use feed_rs::model::Entry;
use feed_rs::parser::Builder;

use crate::app::{FeedboardError, Result};
use crate::domain::{parse_timestamp, RawItem};
use crate::normalizer::strip_html;

/// Turns RSS 0.9x/1.0/2.0, Atom and JSON Feed bodies into [`RawItem`]s.
///
/// Holds no state, so one instance is shared by every concurrent fetch.
#[derive(Debug, Clone, Default)]
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, body: &[u8]) -> Result<Vec<RawItem>> {
        let dates = Rc::new(RefCell::new(RawDates::default()));
        let recorder = Rc::clone(&dates);
        let parser = Builder::new()
            .timestamp_parser(move |text| Some(recorder.borrow_mut().record(text)))
            .build();

        let feed = parser
            .parse(body)
            .map_err(|e| FeedboardError::FeedParse(e.to_string()))?;

        let dates = dates.borrow();
        Ok(feed
            .entries
            .into_iter()
            .map(|entry| raw_item(entry, &dates))
            .collect())
    }
}

/// Date text exactly as it appeared in the feed, keyed by the instant handed
/// back to feed-rs.
///
/// Text no format matches still gets a key: a distinct instant at the start
/// of chrono's range, so the raw value survives into the entry.
#[derive(Default)]
struct RawDates {
    by_instant: HashMap<DateTime<Utc>, RawDate>,
    unparsed: i64,
}

struct RawDate {
    text: String,
    parsed: bool,
}

impl RawDates {
    fn record(&mut self, text: &str) -> DateTime<Utc> {
        let text = text.trim();
        let (instant, parsed) = match parse_timestamp(text) {
            Some(instant) => (instant, true),
            None => {
                self.unparsed += 1;
                (DateTime::<Utc>::MIN_UTC + TimeDelta::seconds(self.unparsed), false)
            }
        };

        self.by_instant.entry(instant).or_insert_with(|| RawDate {
            text: text.to_string(),
            parsed,
        });
        instant
    }

    fn get(&self, instant: &DateTime<Utc>) -> Option<&RawDate> {
        self.by_instant.get(instant)
    }
}

fn raw_item(entry: Entry, dates: &RawDates) -> RawItem {
    let published = entry
        .published
        .or(entry.updated)
        .and_then(|d| dates.get(&d).map(|raw| (d, raw)));

    let content = entry
        .content
        .and_then(|c| c.body)
        .or_else(|| entry.summary.map(|s| s.content))
        .filter(|c| !c.trim().is_empty());
    let content_snippet = content.as_deref().map(strip_html);

    RawItem {
        title: entry.title.map(|t| t.content),
        link: entry.links.into_iter().next().map(|l| l.href),
        pub_date: published
            .map(|(_, raw)| raw.text.clone())
            .filter(|text| !text.is_empty()),
        creator: entry.authors.into_iter().next().map(|a| a.name),
        content,
        content_snippet,
        iso_date: published
            .filter(|(_, raw)| raw.parsed)
            .map(|(d, _)| d.to_rfc3339_opts(SecondsFormat::Millis, true)),
    }
}
