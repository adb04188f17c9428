use serde::{Deserialize, Serialize};

/// One configured feed: where to fetch it and which theme it belongs to.
///
/// `name` doubles as the join key from [`Article::feed_name`](super::Article)
/// back to its descriptor, so it must be unique within a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedDescriptor {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub theme: String,
}

impl FeedDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            theme: theme.into(),
        }
    }

    pub fn has_theme(&self) -> bool {
        !self.theme.is_empty()
    }
}

/// Look up the descriptor an article came from.
pub fn find_by_name<'a>(feeds: &'a [FeedDescriptor], name: &str) -> Option<&'a FeedDescriptor> {
    feeds.iter().find(|f| f.name == name)
}
