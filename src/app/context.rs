use std::sync::Arc;

use crate::aggregator::{Aggregation, Aggregator};
use crate::app::error::Result;
use crate::config::Config;
use crate::domain::FeedDescriptor;
use crate::fetcher;
use crate::registry::Registry;

/// Everything a command needs for one process: configuration, the feeds file
/// and an aggregator wired to the configured fetch strategy.
pub struct AppContext {
    pub config: Arc<Config>,
    pub registry: Registry,
    pub aggregator: Aggregator,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = fetcher::from_config(&config.fetch)?;
        let registry = Registry::new(config.sources.path.clone());

        Ok(Self {
            config: Arc::new(config),
            registry,
            aggregator: Aggregator::new(fetcher),
        })
    }

    /// Read the feeds file. A missing or broken file is an error, an empty one
    /// is not.
    pub fn load_feeds(&self) -> Result<Vec<FeedDescriptor>> {
        Ok(self.registry.load()?)
    }

    /// Load the registry and aggregate it in one go.
    pub async fn refresh(&self) -> Result<(Vec<FeedDescriptor>, Aggregation)> {
        let feeds = self.load_feeds()?;
        let aggregation = self.aggregator.run(&feeds).await;
        Ok((feeds, aggregation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    use crate::app::FeedboardError;
    use crate::config::Strategy;

    fn config_for(path: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.sources.path = path.to_path_buf();
        config.fetch.strategy = Strategy::File;
        config
    }

    #[tokio::test]
    async fn test_refresh_reads_local_feeds() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.xml"),
            r#"<rss version="2.0"><channel><title>A</title>
                <item><title>Hello</title><link>https://a/1</link></item>
            </channel></rss>"#,
        )
        .unwrap();

        let registry_path = dir.path().join("feeds.toml");
        std::fs::write(
            &registry_path,
            "[[feeds]]\nname = \"A\"\nurl = \"a.xml\"\ntheme = \"X\"\n",
        )
        .unwrap();

        let mut config = config_for(&registry_path);
        config.fetch.file_root = dir.path().to_path_buf();

        let ctx = AppContext::new(config).unwrap();
        let (feeds, aggregation) = ctx.refresh().await.unwrap();

        assert_eq!(feeds.len(), 1);
        assert_eq!(aggregation.articles.len(), 1);
        assert_eq!(aggregation.articles[0].title, "Hello");
        assert_eq!(aggregation.articles[0].feed_name, "A");
    }

    #[test]
    fn test_empty_registry_loads() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(b"{}").unwrap();

        let ctx = AppContext::new(config_for(file.path())).unwrap();
        assert!(ctx.load_feeds().unwrap().is_empty());
    }

    #[test]
    fn test_missing_registry_is_error() {
        let ctx = AppContext::new(config_for(std::path::Path::new("/nonexistent/feeds.json")))
            .unwrap();
        let err = ctx.load_feeds().unwrap_err();
        assert!(matches!(err, FeedboardError::Registry(_)));
        assert!(err.to_string().starts_with("Failed to load feeds"));
    }
}
