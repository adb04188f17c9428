//! # feedboard
//!
//! Aggregates a themed list of RSS/Atom feeds into one newest-first article
//! list, with theme, site and author filtering on top.
//!
//! ## Architecture
//!
//! ```text
//! Registry → [Fetcher → Parser → Normalizer] × N → Aggregator → View → TUI / CLI
//! ```
//!
//! Every feed is fetched concurrently; a feed that fails contributes nothing
//! and never aborts the run.
//!
//! ## Quick Start
//!
//! ```bash
//! # Print the latest articles of one theme
//! feedboard articles --theme Strategy --limit 20
//!
//! # Article counts per author
//! feedboard stats --by authors
//!
//! # Launch TUI
//! feedboard tui
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires the config, the feeds file and the
/// aggregator together.
pub mod app;

/// Concurrent fetch, normalize and newest-first merge of all feeds.
pub mod aggregator;

/// Command-line interface using clap.
///
/// - `articles` - Print aggregated articles, optionally filtered
/// - `stats` - Article counts per site or author
/// - `feeds` - List configured feeds by theme
/// - `tui` - Launch the TUI
/// - `watch` - Re-aggregate on an interval
pub mod cli;

/// Configuration loaded from `~/.config/feedboard/config.toml`.
pub mod config;

/// Core data types: [`FeedDescriptor`](domain::FeedDescriptor),
/// [`RawItem`](domain::RawItem) and [`Article`](domain::Article).
pub mod domain;

/// Retrieval strategies and feed parsing.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait returning raw feed bytes
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): direct GET via reqwest
/// - [`ProxyFetcher`](fetcher::proxy::ProxyFetcher): GET through a URL-prefix relay
/// - [`FileFetcher`](fetcher::file::FileFetcher): local files
/// - [`FeedSource`](fetcher::FeedSource): fetch + parse with failure isolation
pub mod fetcher;

/// Turns untrusted [`RawItem`](domain::RawItem)s into display-ready
/// [`Article`](domain::Article)s.
pub mod normalizer;

/// Feeds file loading (JSON, YAML or TOML).
pub mod registry;

/// Interval-driven re-aggregation for `feedboard watch`.
pub mod scheduler;

/// Terminal user interface.
///
/// Theme tabs on top, the article list beside a Sites/Authors sidebar with
/// per-entry counts, and a status bar.
pub mod tui;

/// Theme/site/author filters and sidebar statistics.
pub mod view;
