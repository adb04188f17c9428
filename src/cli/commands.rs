use std::collections::HashSet;
use std::sync::Arc;

use crate::aggregator::Aggregation;
use crate::app::{AppContext, FeedboardError, Result};
use crate::domain::{Article, FeedDescriptor};
use crate::scheduler::{self, Scheduler};
use crate::view::{self, SidebarTab, ViewState, ALL_THEMES};

/// Filters for the `articles` command.
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
    pub theme: Option<String>,
    pub sites: Vec<String>,
    pub authors: Vec<String>,
    pub limit: Option<usize>,
}

impl ArticleQuery {
    fn view_state(&self) -> ViewState {
        let mut view = ViewState::new();
        if let Some(theme) = &self.theme {
            view.set_theme(theme.clone());
        }
        view.selected_sites = self.sites.iter().cloned().collect::<HashSet<_>>();
        view.selected_authors = self.authors.iter().cloned().collect::<HashSet<_>>();
        view
    }
}

const NO_FEEDS: &str = "No feeds configured";

/// Load the registry and aggregate. `None` means there was nothing to fetch.
async fn aggregate(ctx: &AppContext) -> Result<Option<(Vec<FeedDescriptor>, Aggregation)>> {
    let feeds = ctx.load_feeds()?;
    if feeds.is_empty() {
        return Ok(None);
    }

    let aggregation = ctx.aggregator.run(&feeds).await;
    if let Some(summary) = failure_summary(&aggregation) {
        eprintln!("{}", summary);
    }
    Ok(Some((feeds, aggregation)))
}

/// One line for the whole run; the per-feed errors are in the log.
fn failure_summary(aggregation: &Aggregation) -> Option<String> {
    match aggregation.failures.len() {
        0 => None,
        1 => Some("1 feed failed to load".to_string()),
        n => Some(format!("{} feeds failed to load", n)),
    }
}

pub async fn list_articles(ctx: &AppContext, query: &ArticleQuery, json: bool) -> Result<()> {
    let Some((feeds, aggregation)) = aggregate(ctx).await? else {
        println!("{}", if json { "[]" } else { NO_FEEDS });
        return Ok(());
    };

    let mut visible = query.view_state().visible(&aggregation.articles, &feeds);
    if let Some(limit) = query.limit {
        visible.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    if visible.is_empty() {
        println!("No articles");
        return Ok(());
    }

    for article in visible {
        println!("{}\n", format_article(article));
    }

    Ok(())
}

pub async fn show_stats(ctx: &AppContext, theme: Option<&str>, by: SidebarTab) -> Result<()> {
    let Some((feeds, aggregation)) = aggregate(ctx).await? else {
        println!("{}", NO_FEEDS);
        return Ok(());
    };

    let mut view = ViewState::new();
    if let Some(theme) = theme {
        view.set_theme(theme);
    }
    view.set_tab(by);

    let counts = view.sidebar_counts(&aggregation.articles, &feeds);
    let total = view.theme_filtered(&aggregation.articles, &feeds).len();

    println!("{} ({}, {} articles)", by.label(), view.selected_theme, total);
    print!("{}", format_counts(&counts));
    Ok(())
}

pub fn list_feeds(ctx: &AppContext) -> Result<()> {
    let feeds = ctx.load_feeds()?;

    if feeds.is_empty() {
        println!("{}", NO_FEEDS);
        return Ok(());
    }

    print!("{}", format_feeds(&feeds));
    Ok(())
}

pub async fn watch(ctx: Arc<AppContext>, interval: Option<&str>, run_on_start: bool) -> Result<()> {
    let interval = interval.unwrap_or(&ctx.config.watch.interval);
    let interval = scheduler::parse_interval(interval).map_err(FeedboardError::Other)?;

    Scheduler::new(ctx, interval)
        .run_on_start(run_on_start)
        .run()
        .await?;
    Ok(())
}

fn format_article(article: &Article) -> String {
    let mut byline = article.feed_name.clone();
    if let Some(creator) = &article.creator {
        byline.push_str(" · ");
        byline.push_str(creator);
    }

    let mut out = format!(
        "{}  {}\n    {}\n    {}",
        article.display_date(),
        article.title,
        byline,
        article.link
    );
    let snippet = article.display_snippet();
    if !snippet.is_empty() {
        out.push_str("\n    ");
        out.push_str(snippet);
    }
    out
}

fn format_counts(counts: &[(String, usize)]) -> String {
    counts
        .iter()
        .map(|(key, count)| format!("{:>5}  {}\n", count, key))
        .collect()
}

/// Feeds grouped under their theme, themes in first-seen order, unthemed
/// feeds last.
fn format_feeds(feeds: &[FeedDescriptor]) -> String {
    let mut out = String::new();
    let themes = view::themes(feeds);

    for theme in themes.iter().filter(|t| t.as_str() != ALL_THEMES) {
        out.push_str(&format!("{}\n", theme));
        for feed in feeds.iter().filter(|f| &f.theme == theme) {
            out.push_str(&format!("  {}  {}\n", feed.name, feed.url));
        }
    }

    let unthemed: Vec<_> = feeds.iter().filter(|f| !f.has_theme()).collect();
    if !unthemed.is_empty() {
        out.push_str("(no theme)\n");
        for feed in unthemed {
            out.push_str(&format!("  {}  {}\n", feed.name, feed.url));
        }
    }

    out
}
