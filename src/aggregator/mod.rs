//! Fan-out/fan-in over every configured feed.

use std::cmp::Reverse;
use std::sync::Arc;

use futures::future::join_all;

use crate::domain::{Article, FeedDescriptor};
use crate::fetcher::{FeedSource, Fetcher};
use crate::normalizer::Normalizer;

pub use crate::fetcher::FeedFailure;

/// Outcome of one aggregation run.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Newest first.
    pub articles: Vec<Article>,
    pub failures: Vec<FeedFailure>,
}

#[derive(Clone)]
pub struct Aggregator {
    source: FeedSource,
    normalizer: Normalizer,
}

impl Aggregator {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self {
            source: FeedSource::new(fetcher),
            normalizer: Normalizer::new(),
        }
    }

    /// Fetch every feed concurrently and return all articles, newest first.
    ///
    /// Feeds that fail are dropped; the call itself never fails.
    pub async fn aggregate(&self, feeds: &[FeedDescriptor]) -> Vec<Article> {
        self.run(feeds).await.articles
    }

    /// Like [`aggregate`](Self::aggregate) but also reports which feeds failed.
    pub async fn run(&self, feeds: &[FeedDescriptor]) -> Aggregation {
        let outcomes = join_all(feeds.iter().map(|feed| self.fetch_one(feed))).await;

        let mut aggregation = Aggregation::default();
        for (articles, failure) in outcomes {
            aggregation.articles.extend(articles);
            aggregation.failures.extend(failure);
        }

        sort_newest_first(&mut aggregation.articles);

        tracing::info!(
            "Aggregated {} articles from {} feeds ({} failed)",
            aggregation.articles.len(),
            feeds.len(),
            aggregation.failures.len()
        );

        aggregation
    }

    /// Failures are already logged by [`FeedSource::fetch_items`]; they are
    /// only collected here.
    async fn fetch_one(&self, feed: &FeedDescriptor) -> (Vec<Article>, Option<FeedFailure>) {
        let outcome = self.source.fetch_items(feed).await;
        let articles = self.normalizer.normalize_all(&outcome.items, feed);
        tracing::debug!("{} articles from {}", articles.len(), feed.name);
        (articles, outcome.failure)
    }
}

/// Stable sort by publish instant, newest first. Dates that do not parse sort
/// after every dated article.
pub fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by_cached_key(|a| Reverse(a.published_at()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use async_trait::async_trait;

    use crate::app::{FeedboardError, Result};

    struct StubFetcher {
        bodies: HashMap<String, String>,
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.bodies
                .get(url)
                .map(|b| b.clone().into_bytes())
                .ok_or_else(|| FeedboardError::Other(format!("unreachable: {}", url)))
        }
    }

    fn rss(items: &[(&str, &str)]) -> String {
        let body: String = items
            .iter()
            .map(|(title, date)| {
                format!(
                    "<item><title>{}</title><link>https://x/{}</link><pubDate>{}</pubDate></item>",
                    title, title, date
                )
            })
            .collect();
        format!(r#"<?xml version="1.0"?><rss version="2.0"><channel><title>t</title>{}</channel></rss>"#, body)
    }

    fn aggregator(bodies: &[(&str, String)]) -> Aggregator {
        let bodies = bodies
            .iter()
            .map(|(url, body)| (url.to_string(), body.clone()))
            .collect();
        Aggregator::new(Arc::new(StubFetcher { bodies }))
    }

    fn article(title: &str, pub_date: &str) -> Article {
        Article {
            title: title.into(),
            link: "#".into(),
            pub_date: pub_date.into(),
            content_snippet: None,
            content: None,
            creator: None,
            iso_date: None,
            feed_name: "A".into(),
        }
    }

    #[tokio::test]
    async fn test_empty_descriptor_list() {
        let agg = aggregator(&[]);
        assert!(agg.aggregate(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_run_reports_failures() {
        let agg = aggregator(&[("u1", rss(&[("a1", "Mon, 01 Jan 2024 00:00:00 GMT")]))]);
        let feeds = vec![
            FeedDescriptor::new("A", "u1", "X"),
            FeedDescriptor::new("B", "u2", "Y"),
        ];

        let result = agg.run(&feeds).await;
        assert_eq!(result.articles.len(), 1);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].feed_name, "B");
        assert!(result.failures[0].error.contains("unreachable"));
    }

    #[tokio::test]
    async fn test_fetch_one_isolates_unparseable_body() {
        let agg = aggregator(&[("u1", "<html>maintenance</html>".to_string())]);
        let feed = FeedDescriptor::new("A", "u1", "X");

        let (articles, failure) = agg.fetch_one(&feed).await;
        assert!(articles.is_empty());
        assert_eq!(failure.map(|f| f.feed_name).as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_each_failure_is_collected_once() {
        let agg = aggregator(&[]);
        let feeds = vec![
            FeedDescriptor::new("A", "u1", "X"),
            FeedDescriptor::new("B", "u2", "Y"),
        ];

        let result = agg.run(&feeds).await;
        let names: Vec<_> = result.failures.iter().map(|f| f.feed_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(result.articles.is_empty());
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let mut articles = vec![
            article("first", "2024-01-01T00:00:00Z"),
            article("newer", "2024-02-01T00:00:00Z"),
            article("second", "Mon, 01 Jan 2024 00:00:00 GMT"),
        ];
        sort_newest_first(&mut articles);
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["newer", "first", "second"]);
    }

    #[test]
    fn test_unparseable_dates_sort_last() {
        let mut articles = vec![
            article("garbage", "not a date"),
            article("dated", "2020-01-01T00:00:00Z"),
        ];
        sort_newest_first(&mut articles);
        assert_eq!(articles[0].title, "dated");
        assert_eq!(articles[1].title, "garbage");
    }
}
