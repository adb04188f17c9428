use async_trait::async_trait;
use url::{form_urlencoded, Url};

use crate::app::Result;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;

pub const DEFAULT_PROXY_PREFIX: &str = "https://corsproxy.io/?";

/// Routes every request through a relay that takes the target URL appended to
/// a fixed prefix, e.g. `https://corsproxy.io/?<encoded url>`.
pub struct ProxyFetcher {
    inner: HttpFetcher,
    prefix: String,
}

impl ProxyFetcher {
    pub fn new(inner: HttpFetcher, prefix: &str) -> Result<Self> {
        // Reject prefixes that can never form a valid request URL.
        Url::parse(prefix)?;
        Ok(Self {
            inner,
            prefix: prefix.to_string(),
        })
    }

    pub fn proxied_url(&self, url: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(url.as_bytes()).collect();
        format!("{}{}", self.prefix, encoded)
    }
}

#[async_trait]
impl Fetcher for ProxyFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let target = self.proxied_url(url);
        tracing::debug!("Fetching {} via proxy", url);
        self.inner.fetch(&target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_proxied_url_encodes_target() {
        let fetcher = ProxyFetcher::new(HttpFetcher::new().unwrap(), DEFAULT_PROXY_PREFIX).unwrap();
        assert_eq!(
            fetcher.proxied_url("https://a.example/feed?x=1"),
            "https://corsproxy.io/?https%3A%2F%2Fa.example%2Ffeed%3Fx%3D1"
        );
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        assert!(ProxyFetcher::new(HttpFetcher::new().unwrap(), "not a url").is_err());
    }

    #[tokio::test]
    async fn test_fetch_goes_through_proxy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/relay"))
            .and(query_param("url", "https://a.example/feed.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("proxied"))
            .expect(1)
            .mount(&server)
            .await;

        let prefix = format!("{}/relay?url=", server.uri());
        let fetcher = ProxyFetcher::new(HttpFetcher::new().unwrap(), &prefix).unwrap();
        let body = fetcher.fetch("https://a.example/feed.xml").await.unwrap();
        assert_eq!(body, b"proxied");
    }
}
