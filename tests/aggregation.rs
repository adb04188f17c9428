use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use feedboard::aggregator::Aggregator;
use feedboard::app::{FeedboardError, Result};
use feedboard::config::FetchConfig;
use feedboard::domain::{parse_timestamp, Article, FeedDescriptor, PLACEHOLDER_LINK, UNTITLED};
use feedboard::fetcher::{self, Fetcher};
use feedboard::view::filter_by_theme;

/// Serves canned bodies by URL; anything else fails like a dead host.
struct CannedFetcher {
    bodies: HashMap<String, String>,
}

#[async_trait]
impl Fetcher for CannedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.bodies
            .get(url)
            .map(|body| body.as_bytes().to_vec())
            .ok_or_else(|| FeedboardError::Other(format!("connection refused: {}", url)))
    }
}

fn aggregator(bodies: &[(&str, String)]) -> Aggregator {
    let bodies = bodies
        .iter()
        .map(|(url, body)| (url.to_string(), body.clone()))
        .collect();
    Aggregator::new(Arc::new(CannedFetcher { bodies }))
}

fn rss(items: &[&str]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel><title>Feed</title>{}</channel>
</rss>"#,
        items.concat()
    )
}

fn item(title: &str, date: &str) -> String {
    format!(
        "<item><title>{}</title><link>https://example.com/{}</link><pubDate>{}</pubDate></item>",
        title,
        title.replace(' ', "-"),
        date
    )
}

fn atom(entries: &[(&str, &str)]) -> String {
    let body: String = entries
        .iter()
        .map(|(title, updated)| {
            format!(
                r#"<entry><title>{t}</title><id>urn:entry:{t}</id><link href="https://example.com/{t}"/><updated>{u}</updated></entry>"#,
                t = title,
                u = updated
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom"><title>Feed</title><id>urn:feed</id><updated>2024-01-01T00:00:00Z</updated>{}</feed>"#,
        body
    )
}

fn descriptors() -> Vec<FeedDescriptor> {
    vec![
        FeedDescriptor::new("A", "u1", "X"),
        FeedDescriptor::new("B", "u2", "Y"),
    ]
}

fn assert_sorted(articles: &[Article]) {
    for pair in articles.windows(2) {
        assert!(
            parse_timestamp(&pair[0].pub_date) >= parse_timestamp(&pair[1].pub_date),
            "{} before {}",
            pair[0].pub_date,
            pair[1].pub_date
        );
    }
}

#[tokio::test]
async fn newer_feed_item_comes_first() {
    let agg = aggregator(&[
        ("u1", rss(&[&item("from a", "Tue, 02 Jan 2024 00:00:00 GMT")])),
        ("u2", atom(&[("from b", "2024-01-01T00:00:00Z")])),
    ]);

    let articles = agg.aggregate(&descriptors()).await;

    let names: Vec<_> = articles.iter().map(|a| a.feed_name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[tokio::test]
async fn length_is_sum_of_item_counts_and_sorted() {
    let agg = aggregator(&[
        (
            "u1",
            rss(&[
                &item("a1", "Mon, 01 Jan 2024 10:00:00 GMT"),
                &item("a2", "Wed, 03 Jan 2024 10:00:00 +0100"),
                &item("a3", "Fri, 29 Dec 2023 08:00:00 GMT"),
            ]),
        ),
        (
            "u2",
            atom(&[
                ("b1", "2024-01-02T12:00:00Z"),
                ("b2", "2023-12-31T23:59:59-05:00"),
            ]),
        ),
    ]);

    let articles = agg.aggregate(&descriptors()).await;

    assert_eq!(articles.len(), 5);
    assert_sorted(&articles);
    assert_eq!(articles[0].title, "a2");
    assert_eq!(articles[4].title, "a3");
}

#[tokio::test]
async fn failing_feed_is_dropped() {
    let agg = aggregator(&[("u1", rss(&[&item("a1", "Tue, 02 Jan 2024 00:00:00 GMT")]))]);

    let with_failure = agg.aggregate(&descriptors()).await;
    let only_good = agg.aggregate(&descriptors()[..1]).await;

    assert_eq!(with_failure, only_good);
    assert!(with_failure.iter().all(|a| a.feed_name == "A"));
}

#[tokio::test]
async fn unparseable_feed_is_dropped() {
    let agg = aggregator(&[
        ("u1", "<html><body>Service Unavailable</body></html>".to_string()),
        ("u2", atom(&[("b1", "2024-01-01T00:00:00Z")])),
    ]);

    let result = agg.run(&descriptors()).await;

    assert_eq!(result.articles.len(), 1);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].feed_name, "A");
}

#[tokio::test]
async fn empty_descriptor_list() {
    let agg = aggregator(&[]);
    assert!(agg.aggregate(&[]).await.is_empty());
}

#[tokio::test]
async fn every_article_has_title_and_link() {
    let agg = aggregator(&[(
        "u1",
        rss(&[
            "<item><description>No title, no link, no author</description></item>",
            &item("titled", "Mon, 01 Jan 2024 00:00:00 GMT"),
        ]),
    )]);

    let articles = agg.aggregate(&descriptors()[..1]).await;

    assert_eq!(articles.len(), 2);
    assert!(articles.iter().all(|a| !a.title.is_empty() && !a.link.is_empty()));

    let bare = articles
        .iter()
        .find(|a| a.title == UNTITLED)
        .expect("untitled article");
    assert_eq!(bare.link, PLACEHOLDER_LINK);
    assert_eq!(bare.creator, None);
    // Undated items are stamped with the fetch time, so they sort first.
    assert_eq!(articles[0].title, UNTITLED);
    assert!(parse_timestamp(&bare.pub_date).is_some());
}

#[tokio::test]
async fn raw_pub_date_is_kept_and_sorted_by_its_instant() {
    let agg = aggregator(&[
        (
            "u1",
            rss(&[
                &item("old", "January 2, 2020"),
                &item("vague", "some time ago"),
            ]),
        ),
        ("u2", atom(&[("recent", "2024-01-01T00:00:00Z")])),
    ]);

    let articles = agg.aggregate(&descriptors()).await;

    let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["recent", "old", "vague"]);
    assert_eq!(articles[1].pub_date, "January 2, 2020");
    assert_eq!(articles[1].iso_date.as_deref(), Some("2020-01-02T00:00:00.000Z"));
    assert_eq!(articles[2].pub_date, "some time ago");
}

#[tokio::test]
async fn entities_in_title_and_creator_are_decoded() {
    let agg = aggregator(&[(
        "u1",
        rss(&["<item><title>Catan &amp;amp; Friends</title>\
               <dc:creator>Ren&amp;eacute;</dc:creator>\
               <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate></item>"]),
    )]);

    let articles = agg.aggregate(&descriptors()[..1]).await;

    assert_eq!(articles[0].title, "Catan & Friends");
    assert_eq!(articles[0].creator.as_deref(), Some("René"));
}

#[tokio::test]
async fn theme_filter_keeps_matching_feed_only() {
    let agg = aggregator(&[
        ("u1", rss(&[&item("a1", "Tue, 02 Jan 2024 00:00:00 GMT")])),
        ("u2", atom(&[("b1", "2024-01-01T00:00:00Z"), ("b2", "2024-01-03T00:00:00Z")])),
    ]);
    let feeds = descriptors();

    let articles = agg.aggregate(&feeds).await;
    let y = filter_by_theme(&articles, &feeds, "Y");

    assert_eq!(y.len(), 2);
    assert!(y.iter().all(|a| a.feed_name == "B"));
}

#[tokio::test]
async fn http_end_to_end_with_one_broken_feed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/good.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(rss(&[&item("live", "Wed, 01 May 2024 09:00:00 GMT")]))
                .insert_header("content-type", "application/rss+xml"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = fetcher::from_config(&FetchConfig::default()).unwrap();
    let agg = Aggregator::new(fetcher);
    let feeds = vec![
        FeedDescriptor::new("Good", format!("{}/good.xml", server.uri()), "X"),
        FeedDescriptor::new("Broken", format!("{}/broken.xml", server.uri()), "X"),
    ];

    let result = agg.run(&feeds).await;

    assert_eq!(result.articles.len(), 1);
    assert_eq!(result.articles[0].title, "live");
    assert_eq!(result.articles[0].feed_name, "Good");
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].feed_name, "Broken");
}
