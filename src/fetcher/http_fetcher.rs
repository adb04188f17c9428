use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::app::Result;
use crate::config::FetchConfig;
use crate::fetcher::Fetcher;

pub const DEFAULT_USER_AGENT: &str = concat!("feedboard/", env!("CARGO_PKG_VERSION"));

/// Plain GET against the feed URL.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::from_config(&FetchConfig::default())
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str());

        // No timeout unless asked for: a stalled feed stalls its own fetch.
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let body = response.bytes().await?.to_vec();
        Ok(body)
    }
}
