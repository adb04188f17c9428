use std::path::{Path, PathBuf};

use async_trait::async_trait;
use url::Url;

use crate::app::{FeedboardError, Result};
use crate::fetcher::Fetcher;

/// Reads feeds from disk. Accepts `file://` URLs or paths, relative paths
/// being resolved against `root`.
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn resolve(&self, url: &str) -> Result<PathBuf> {
        if url.starts_with("file:") {
            let parsed = Url::parse(url)?;
            return parsed
                .to_file_path()
                .map_err(|_| FeedboardError::Other(format!("Not a local file URL: {}", url)));
        }

        let path = Path::new(url);
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.root.join(path))
        }
    }
}

#[async_trait]
impl Fetcher for FileFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let path = self.resolve(url)?;
        let body = tokio::fs::read(&path).await?;
        Ok(body)
    }
}
