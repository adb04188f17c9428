//! Loads the list of subscribed feeds.
//!
//! Three file layouts are understood, picked by extension:
//!
//! - `feeds.json`, grouped by theme then name:
//!   `{ "feeds": { "Strategy": { "Dice Tower": { "url": "..." } } } }`
//! - `feeds.yaml` / `feeds.yml`, a flat list:
//!   `feeds: [ { name: ..., url: ..., theme: ... } ]`
//! - `feeds.toml`, `[[feeds]]` tables with `name`, `url` and `theme`.
//!
//! A missing, unreadable or malformed file is an error: callers must not
//! confuse it with an empty registry.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::FeedDescriptor;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Failed to read feeds file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse feeds file at {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported feeds file format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Duplicate feed name: {0}")]
    DuplicateName(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct JsonFeed {
    url: String,
}

#[derive(Deserialize)]
struct FlatList {
    #[serde(default)]
    feeds: Vec<FeedDescriptor>,
}

/// A feeds file on disk.
#[derive(Debug, Clone)]
pub struct Registry {
    path: PathBuf,
}

impl Registry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<FeedDescriptor>, RegistryError> {
        let format = Format::from_path(&self.path)
            .ok_or_else(|| RegistryError::UnsupportedFormat(self.path.clone()))?;

        let content = fs::read_to_string(&self.path).map_err(|e| RegistryError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        let feeds = parse(&content, format).map_err(|message| RegistryError::Parse {
            path: self.path.clone(),
            message,
        })?;

        check_unique(&feeds)?;
        tracing::info!("Loaded {} feeds from {}", feeds.len(), self.path.display());
        Ok(feeds)
    }
}

/// Parse registry content in the given format.
pub fn parse(content: &str, format: Format) -> Result<Vec<FeedDescriptor>, String> {
    match format {
        Format::Json => parse_json(content),
        Format::Yaml => serde_yaml::from_str::<Option<FlatList>>(content)
            .map(|list| list.map(|l| l.feeds).unwrap_or_default())
            .map_err(|e| e.to_string()),
        Format::Toml => toml::from_str::<FlatList>(content)
            .map(|list| list.feeds)
            .map_err(|e| e.to_string()),
    }
}

/// Flatten the theme → name → url nesting in document order.
fn parse_json(content: &str) -> Result<Vec<FeedDescriptor>, String> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;

    let Some(themes) = value.get("feeds") else {
        return Ok(Vec::new());
    };
    let themes = themes
        .as_object()
        .ok_or_else(|| "\"feeds\" must be an object keyed by theme".to_string())?;

    let mut feeds = Vec::new();
    for (theme, entries) in themes {
        let entries = entries
            .as_object()
            .ok_or_else(|| format!("theme \"{}\" must be an object keyed by feed name", theme))?;
        for (name, entry) in entries {
            let feed: JsonFeed = serde_json::from_value(entry.clone())
                .map_err(|e| format!("feed \"{}\": {}", name, e))?;
            feeds.push(FeedDescriptor::new(name.clone(), feed.url, theme.clone()));
        }
    }
    Ok(feeds)
}

fn check_unique(feeds: &[FeedDescriptor]) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for feed in feeds {
        if !seen.insert(feed.name.as_str()) {
            return Err(RegistryError::DuplicateName(feed.name.clone()));
        }
    }
    Ok(())
}
