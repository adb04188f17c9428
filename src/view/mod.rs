//! Filtering and sidebar statistics over an aggregated article list.
//!
//! Everything here is recomputed from `(articles, feeds, selection)` on
//! demand; nothing is cached between calls.

use std::collections::{HashMap, HashSet};

use crate::domain::{feed::find_by_name, Article, FeedDescriptor};

pub const ALL_THEMES: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarTab {
    #[default]
    Sites,
    Authors,
}

impl SidebarTab {
    pub fn toggle(self) -> Self {
        match self {
            SidebarTab::Sites => SidebarTab::Authors,
            SidebarTab::Authors => SidebarTab::Sites,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SidebarTab::Sites => "Sites",
            SidebarTab::Authors => "Authors",
        }
    }
}

/// `"All"` followed by each distinct non-empty theme, in first-seen order.
pub fn themes(feeds: &[FeedDescriptor]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut themes = vec![ALL_THEMES.to_string()];
    for feed in feeds.iter().filter(|f| f.has_theme()) {
        if seen.insert(feed.theme.as_str()) {
            themes.push(feed.theme.clone());
        }
    }
    themes
}

pub fn filter_by_theme<'a>(
    articles: &'a [Article],
    feeds: &[FeedDescriptor],
    theme: &str,
) -> Vec<&'a Article> {
    if theme == ALL_THEMES {
        return articles.iter().collect();
    }
    articles
        .iter()
        .filter(|a| find_by_name(feeds, &a.feed_name).is_some_and(|f| f.theme == theme))
        .collect()
}

/// Keep articles from the selected sites and by the selected authors. An
/// empty selection set matches everything; a non-empty author set drops
/// articles without a creator.
pub fn filter_by_selection<'a>(
    articles: &[&'a Article],
    sites: &HashSet<String>,
    authors: &HashSet<String>,
) -> Vec<&'a Article> {
    articles
        .iter()
        .copied()
        .filter(|a| sites.is_empty() || sites.contains(&a.feed_name))
        .filter(|a| {
            authors.is_empty()
                || a.creator
                    .as_ref()
                    .is_some_and(|creator| authors.contains(creator))
        })
        .collect()
}

pub fn site_counts(articles: &[&Article]) -> Vec<(String, usize)> {
    ranked(articles.iter().map(|a| a.feed_name.as_str()))
}

pub fn author_counts(articles: &[&Article]) -> Vec<(String, usize)> {
    ranked(articles.iter().filter_map(|a| a.creator.as_deref()))
}

/// Count keys and order by descending count; equal counts keep first-seen
/// order.
fn ranked<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for key in keys {
        match index.get(key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key, counts.len());
                counts.push((key.to_string(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// The reader's current theme, sidebar tab and site/author picks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub selected_theme: String,
    pub sidebar_tab: SidebarTab,
    pub selected_sites: HashSet<String>,
    pub selected_authors: HashSet<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected_theme: ALL_THEMES.to_string(),
            sidebar_tab: SidebarTab::Sites,
            selected_sites: HashSet::new(),
            selected_authors: HashSet::new(),
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switching theme clears site and author picks.
    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.selected_theme = theme.into();
        self.clear_selection();
    }

    /// Switching between sites and authors clears site and author picks.
    pub fn set_tab(&mut self, tab: SidebarTab) {
        self.sidebar_tab = tab;
        self.clear_selection();
    }

    pub fn toggle_site(&mut self, site: &str) {
        toggle(&mut self.selected_sites, site);
    }

    pub fn toggle_author(&mut self, author: &str) {
        toggle(&mut self.selected_authors, author);
    }

    /// Toggle a sidebar entry under whichever tab is showing.
    pub fn toggle_entry(&mut self, key: &str) {
        match self.sidebar_tab {
            SidebarTab::Sites => self.toggle_site(key),
            SidebarTab::Authors => self.toggle_author(key),
        }
    }

    pub fn is_selected(&self, key: &str) -> bool {
        match self.sidebar_tab {
            SidebarTab::Sites => self.selected_sites.contains(key),
            SidebarTab::Authors => self.selected_authors.contains(key),
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_sites.clear();
        self.selected_authors.clear();
    }

    pub fn theme_filtered<'a>(
        &self,
        articles: &'a [Article],
        feeds: &[FeedDescriptor],
    ) -> Vec<&'a Article> {
        filter_by_theme(articles, feeds, &self.selected_theme)
    }

    /// Articles to display: theme, then site/author picks.
    pub fn visible<'a>(&self, articles: &'a [Article], feeds: &[FeedDescriptor]) -> Vec<&'a Article> {
        let themed = self.theme_filtered(articles, feeds);
        filter_by_selection(&themed, &self.selected_sites, &self.selected_authors)
    }

    /// Counts for the active sidebar tab, taken over the theme-filtered set
    /// only.
    pub fn sidebar_counts(&self, articles: &[Article], feeds: &[FeedDescriptor]) -> Vec<(String, usize)> {
        let themed = self.theme_filtered(articles, feeds);
        match self.sidebar_tab {
            SidebarTab::Sites => site_counts(&themed),
            SidebarTab::Authors => author_counts(&themed),
        }
    }
}

fn toggle(set: &mut HashSet<String>, key: &str) {
    if !set.remove(key) {
        set.insert(key.to_string());
    }
}
