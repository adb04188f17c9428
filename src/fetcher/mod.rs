pub mod file;
pub mod http_fetcher;
pub mod parser;
pub mod proxy;
pub mod source;

use std::sync::Arc;

use async_trait::async_trait;

use crate::app::Result;
use crate::config::{FetchConfig, Strategy};

pub use parser::FeedParser;
pub use source::{FeedFailure, FeedSource, FetchOutcome};

/// How raw feed bytes are retrieved. One call, one retrieval.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Build the retrieval strategy selected in the `[fetch]` config section.
pub fn from_config(config: &FetchConfig) -> Result<Arc<dyn Fetcher + Send + Sync>> {
    let direct = http_fetcher::HttpFetcher::from_config(config)?;

    let fetcher: Arc<dyn Fetcher + Send + Sync> = match config.strategy {
        Strategy::Direct => Arc::new(direct),
        Strategy::Proxy => Arc::new(proxy::ProxyFetcher::new(direct, &config.proxy_prefix)?),
        Strategy::File => Arc::new(file::FileFetcher::new(&config.file_root)),
    };

    Ok(fetcher)
}
