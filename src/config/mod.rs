//! Configuration management for feedboard.
//!
//! Configuration is read from `~/.config/feedboard/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod colors;
pub mod keybindings;

pub use colors::ColorConfig;
pub use keybindings::KeybindingConfig;

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::fetcher::http_fetcher::DEFAULT_USER_AGENT;
use crate::fetcher::proxy::DEFAULT_PROXY_PREFIX;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourcesConfig,
    pub fetch: FetchConfig,
    pub watch: WatchConfig,
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
}

/// Where the feed registry lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub path: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("feeds.json"),
        }
    }
}

/// Retrieval strategy for feed bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Fetch feed URLs directly
    #[default]
    Direct,
    /// Fetch through a URL-prefix relay
    Proxy,
    /// Read feeds from local files
    File,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub strategy: Strategy,
    pub proxy_prefix: String,
    pub file_root: PathBuf,
    /// Per-request timeout. Unset means requests may wait indefinitely.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Direct,
            proxy_prefix: DEFAULT_PROXY_PREFIX.to_string(),
            file_root: PathBuf::from("."),
            timeout_secs: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Re-aggregation interval, e.g. "15m", "1h", "900".
    pub interval: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval: "15m".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/feedboard/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("feedboard").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# feedboard configuration

[sources]
# Feed registry. The format follows the extension:
#   .json  {"feeds": {"<theme>": {"<name>": {"url": "..."}}}}
#   .yaml  feeds: [{name: ..., url: ..., theme: ...}]
#   .toml  [[feeds]] name/url/theme
path = "feeds.json"

[fetch]
# direct | proxy | file
strategy = "direct"

# Relay prefix used by the proxy strategy; the feed URL is appended encoded.
proxy_prefix = "https://corsproxy.io/?"

# Base directory for relative paths under the file strategy.
file_root = "."

# Per-request timeout in seconds. Leave unset to wait indefinitely.
# timeout_secs = 30

[watch]
# How often `feedboard watch` re-aggregates (e.g. "15m", "1h", "900").
interval = "15m"

[colors]
active_border = "Cyan"
inactive_border = "DarkGray"
selection_bg_active = "Cyan"
selection_fg_active = "Black"
selection_bg_inactive = "DarkGray"
selection_fg_inactive = "White"
theme_tab_active = "Cyan"
metadata_feed = "Green"
metadata_author = "Yellow"
metadata_date = "DarkGray"
selected_entry = "LightCyan"
error = "LightRed"
status_fg = "White"
status_bg = "DarkGray"

[keybindings]
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
next_page = ["n", "PageDown"]
prev_page = ["p", "PageUp"]
next_pane = ["Tab"]
prev_pane = ["BackTab", "Shift+Tab"]
next_theme = ["l", "Right"]
prev_theme = ["h", "Left"]
switch_sidebar_tab = ["a"]
toggle_selection = ["Space", "Enter"]
clear_selection = ["c"]
open_in_browser = ["o"]
refresh = ["R"]
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.sources.path, PathBuf::from("feeds.json"));
        assert_eq!(config.fetch.strategy, Strategy::Direct);
        assert_eq!(config.fetch.timeout_secs, None);
        assert_eq!(config.watch.interval, "15m");
        assert_eq!(config.colors.active_border, ratatui::style::Color::Cyan);
        assert_eq!(config.keybindings.quit, vec!["q", "Ctrl+c"]);
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[fetch]
strategy = "proxy"
timeout_secs = 20

[colors]
active_border = "#FF0000"
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.fetch.strategy, Strategy::Proxy);
        assert_eq!(config.fetch.timeout_secs, Some(20));
        assert_eq!(config.fetch.proxy_prefix, DEFAULT_PROXY_PREFIX);
        assert_eq!(
            config.colors.active_border,
            ratatui::style::Color::Rgb(255, 0, 0)
        );
        assert_eq!(
            config.colors.inactive_border,
            ratatui::style::Color::DarkGray
        );
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");

        assert_eq!(config.fetch.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.sources.path, PathBuf::from("feeds.json"));
        assert_eq!(config.keybindings.quit, vec!["q", "Ctrl+c"]);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        assert!(toml::from_str::<Config>("[fetch]\nstrategy = \"carrier-pigeon\"\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[sources]\npath = \"feeds.yaml\"\n").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.sources.path, PathBuf::from("feeds.yaml"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
