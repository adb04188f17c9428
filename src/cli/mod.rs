pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{Config, ConfigError, Strategy};
use crate::view::SidebarTab;

#[derive(Parser)]
#[command(name = "feedboard")]
#[command(about = "Aggregate themed RSS/Atom feeds into one newest-first list", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/feedboard/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Feeds file, overriding `[sources] path`
    #[arg(short, long, global = true)]
    pub feeds: Option<PathBuf>,

    /// How feeds are retrieved, overriding `[fetch] strategy`
    #[arg(short, long, value_enum, global = true)]
    pub strategy: Option<Strategy>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print aggregated articles, newest first
    Articles {
        /// Only feeds with this theme
        #[arg(short, long)]
        theme: Option<String>,

        /// Only these feeds (repeatable)
        #[arg(long = "site")]
        sites: Vec<String>,

        /// Only these authors (repeatable)
        #[arg(long = "author")]
        authors: Vec<String>,

        /// Show at most this many articles
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Article counts per site or author
    Stats {
        /// Only feeds with this theme
        #[arg(short, long)]
        theme: Option<String>,

        #[arg(long, value_enum, default_value_t = CountBy::Sites)]
        by: CountBy,
    },
    /// List configured feeds grouped by theme
    Feeds,
    /// Launch the TUI
    Tui,
    /// Re-aggregate on an interval until interrupted
    Watch {
        /// Interval (e.g. "15m", "1h", "900"); defaults to `[watch] interval`
        #[arg(short, long)]
        interval: Option<String>,

        /// Skip the run on start
        #[arg(long)]
        no_initial_run: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CountBy {
    Sites,
    Authors,
}

impl From<CountBy> for SidebarTab {
    fn from(by: CountBy) -> Self {
        match by {
            CountBy::Sites => SidebarTab::Sites,
            CountBy::Authors => SidebarTab::Authors,
        }
    }
}

impl Cli {
    /// Load the config file, then apply command-line overrides.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(feeds) = &self.feeds {
            config.sources.path = feeds.clone();
        }
        if let Some(strategy) = self.strategy {
            config.fetch.strategy = strategy;
        }
    }
}
