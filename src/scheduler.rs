//! Periodic re-aggregation for `feedboard watch`.
//!
//! Each tick reloads the feeds file and runs a fresh aggregation; nothing is
//! carried over between runs.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::interval;

use crate::aggregator::Aggregation;
use crate::app::{AppContext, Result};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Parse an interval like "15m", "1h", "1d", "90s" or a bare number of
/// seconds.
pub fn parse_interval(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim().to_lowercase();

    let (digits, unit) = match s.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&s[..i], c),
        _ => (s.as_str(), 's'),
    };
    let multiplier = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3600,
        'd' => 86400,
        _ => return Err(format!("Invalid interval unit in '{}'. Use s, m, h or d", s)),
    };

    let value: u64 = digits
        .parse()
        .map_err(|_| format!("Invalid interval: '{}'. Use a format like '15m' or '1h'", s))?;
    if value == 0 {
        return Err("Interval must be greater than zero".to_string());
    }

    value
        .checked_mul(multiplier)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("Interval '{}' is too large", s))
}

/// Shortest unit that represents the interval exactly.
pub fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    match secs {
        s if s >= 86400 && s % 86400 == 0 => format!("{}d", s / 86400),
        s if s >= 3600 && s % 3600 == 0 => format!("{}h", s / 3600),
        s if s >= 60 && s % 60 == 0 => format!("{}m", s / 60),
        s => format!("{}s", s),
    }
}

pub struct Scheduler {
    ctx: Arc<AppContext>,
    interval: Duration,
    run_on_start: bool,
}

impl Scheduler {
    pub fn new(ctx: Arc<AppContext>, interval: Duration) -> Self {
        Self {
            ctx,
            interval,
            run_on_start: true,
        }
    }

    pub fn run_on_start(mut self, enabled: bool) -> Self {
        self.run_on_start = enabled;
        self
    }

    /// Run until Ctrl-C or SIGTERM. Returns the number of completed runs.
    pub async fn run(&self) -> Result<usize> {
        self.run_until(shutdown_signal()).await
    }

    /// Run until `shutdown` resolves.
    pub async fn run_until(&self, shutdown: impl Future<Output = ()>) -> Result<usize> {
        tracing::info!(
            "Watching feeds (interval: {})",
            format_interval(self.interval)
        );

        let mut runs = 0;
        if self.run_on_start {
            self.tick().await;
            runs += 1;
        }

        let mut timer = interval(self.interval);
        // The first tick completes immediately.
        timer.tick().await;

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = timer.tick() => {
                    self.tick().await;
                    runs += 1;
                }
            }
        }

        tracing::info!("Stopped watching after {} runs", runs);
        Ok(runs)
    }

    /// One aggregation. Errors are logged rather than returned so the loop
    /// keeps going; per-feed failures were already logged by the fetch.
    async fn tick(&self) {
        if let Err(e) = self.run_once().await {
            tracing::error!("{}", e);
        }
    }

    pub async fn run_once(&self) -> Result<Aggregation> {
        let start = Instant::now();
        let (feeds, aggregation) = self.ctx.refresh().await?;

        if feeds.is_empty() {
            tracing::info!("No feeds configured");
            return Ok(aggregation);
        }

        let newest = aggregation
            .articles
            .first()
            .map(|a| format!(", newest: {} ({})", a.title, a.feed_name))
            .unwrap_or_default();
        tracing::info!(
            "Run complete: {} articles from {} feeds, {} failed ({:.1}s){}",
            aggregation.articles.len(),
            feeds.len(),
            aggregation.failures.len(),
            start.elapsed().as_secs_f64(),
            newest
        );

        Ok(aggregation)
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = tokio::signal::ctrl_c() => {},
                }
                return;
            }
            Err(e) => tracing::warn!("Failed to install SIGTERM handler: {}", e),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        // Without a signal source, never stop on our own.
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Strategy};

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("15m").unwrap(), DEFAULT_INTERVAL);
        assert_eq!(parse_interval("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_interval("1D").unwrap(), Duration::from_secs(86400));
        assert_eq!(parse_interval("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_interval(" 900 ").unwrap(), Duration::from_secs(900));
    }

    #[test]
    fn test_parse_interval_rejects_bad_input() {
        assert!(parse_interval("").is_err());
        assert!(parse_interval("soon").is_err());
        assert!(parse_interval("5w").is_err());
        assert!(parse_interval("0m").is_err());
        assert!(parse_interval("-5m").is_err());
        assert!(parse_interval("999999999999999d").is_err());
        assert!(parse_interval("99999999999999999999").is_err());
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(Duration::from_secs(900)), "15m");
        assert_eq!(format_interval(Duration::from_secs(7200)), "2h");
        assert_eq!(format_interval(Duration::from_secs(86400)), "1d");
        assert_eq!(format_interval(Duration::from_secs(90)), "90s");
    }

    fn context(dir: &std::path::Path) -> Arc<AppContext> {
        std::fs::write(
            dir.join("a.xml"),
            r#"<rss version="2.0"><channel><title>A</title>
                <item><title>One</title><pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate></item>
            </channel></rss>"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("feeds.yaml"),
            "feeds:\n  - {name: A, url: a.xml, theme: X}\n  - {name: Gone, url: missing.xml}\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.sources.path = dir.join("feeds.yaml");
        config.fetch.strategy = Strategy::File;
        config.fetch.file_root = dir.to_path_buf();
        Arc::new(AppContext::new(config).unwrap())
    }

    #[tokio::test]
    async fn test_run_once_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let scheduler = Scheduler::new(context(dir.path()), DEFAULT_INTERVAL);

        let aggregation = scheduler.run_once().await.unwrap();
        assert_eq!(aggregation.articles.len(), 1);
        assert_eq!(aggregation.failures.len(), 1);
        assert_eq!(aggregation.failures[0].feed_name, "Gone");
    }

    #[tokio::test]
    async fn test_immediate_shutdown_after_initial_run() {
        let dir = tempfile::tempdir().unwrap();
        let scheduler = Scheduler::new(context(dir.path()), DEFAULT_INTERVAL);
        assert_eq!(scheduler.run_until(async {}).await.unwrap(), 1);

        let scheduler = scheduler.run_on_start(false);
        assert_eq!(scheduler.run_until(async {}).await.unwrap(), 0);
    }
}
