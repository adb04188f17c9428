use std::sync::Arc;

use crate::app::Result;
use crate::domain::{FeedDescriptor, RawItem};
use crate::fetcher::{FeedParser, Fetcher};

/// A feed that contributed nothing because its fetch failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFailure {
    pub feed_name: String,
    pub error: String,
}

/// What one feed yielded. `items` is empty whenever `failure` is set.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub items: Vec<RawItem>,
    pub failure: Option<FeedFailure>,
}

/// Retrieval plus parsing for one descriptor at a time.
#[derive(Clone)]
pub struct FeedSource {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    parser: FeedParser,
}

impl FeedSource {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self {
            fetcher,
            parser: FeedParser::new(),
        }
    }

    /// Fetch and parse, surfacing network, status and parse failures.
    pub async fn try_fetch(&self, feed: &FeedDescriptor) -> Result<Vec<RawItem>> {
        tracing::debug!("Fetching feed: {} ({})", feed.name, feed.url);
        let body = self.fetcher.fetch(&feed.url).await?;
        self.parser.parse(&body)
    }

    /// Fetch and parse without ever failing. A failure is logged here, once,
    /// and handed back alongside an empty item list.
    pub async fn fetch_items(&self, feed: &FeedDescriptor) -> FetchOutcome {
        match self.try_fetch(feed).await {
            Ok(items) => FetchOutcome {
                items,
                failure: None,
            },
            Err(e) => {
                tracing::warn!("Error fetching feed {}: {}", feed.name, e);
                FetchOutcome {
                    items: Vec::new(),
                    failure: Some(FeedFailure {
                        feed_name: feed.name.clone(),
                        error: e.to_string(),
                    }),
                }
            }
        }
    }
}
