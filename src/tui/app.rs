use ratatui::widgets::ListState;

use crate::aggregator::Aggregation;
use crate::domain::{Article, FeedDescriptor};
use crate::view::{self, ViewState, ALL_THEMES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Articles,
    Sidebar,
}

impl ActivePane {
    pub fn next(self) -> Self {
        match self {
            ActivePane::Articles => ActivePane::Sidebar,
            ActivePane::Sidebar => ActivePane::Articles,
        }
    }

    pub fn prev(self) -> Self {
        self.next()
    }
}

pub const PAGE_SIZE: usize = 10;

pub struct TuiApp {
    pub feeds: Vec<FeedDescriptor>,
    pub articles: Vec<Article>,
    pub themes: Vec<String>,
    pub view: ViewState,
    pub active_pane: ActivePane,
    pub article_index: usize,
    pub sidebar_index: usize,
    pub article_list_state: ListState,
    pub sidebar_list_state: ListState,
    pub should_quit: bool,
    pub is_loading: bool,
    pub status_message: Option<String>,
    /// Shown as a banner instead of the article list.
    pub error_message: Option<String>,
}

impl TuiApp {
    pub fn new() -> Self {
        Self {
            feeds: Vec::new(),
            articles: Vec::new(),
            themes: vec![ALL_THEMES.to_string()],
            view: ViewState::new(),
            active_pane: ActivePane::Articles,
            article_index: 0,
            sidebar_index: 0,
            article_list_state: ListState::default().with_selected(Some(0)),
            sidebar_list_state: ListState::default().with_selected(Some(0)),
            should_quit: false,
            is_loading: false,
            status_message: None,
            error_message: None,
        }
    }

    /// Replace the data after an aggregation run. The current theme survives
    /// if it still exists; selections and cursors are reset.
    pub fn set_data(&mut self, feeds: Vec<FeedDescriptor>, aggregation: Aggregation) {
        self.themes = view::themes(&feeds);
        self.feeds = feeds;
        self.articles = aggregation.articles;
        self.error_message = if self.feeds.is_empty() {
            Some("No feeds configured".to_string())
        } else {
            None
        };

        let theme = if self.themes.contains(&self.view.selected_theme) {
            self.view.selected_theme.clone()
        } else {
            ALL_THEMES.to_string()
        };
        self.view.set_theme(theme);
        self.reset_cursors();

        let failed = aggregation.failures.len();
        self.status_message = (failed > 0).then(|| format!("{} feeds failed to load", failed));
    }

    /// The registry could not be read; nothing is shown.
    pub fn set_load_error(&mut self, message: impl Into<String>) {
        self.feeds.clear();
        self.articles.clear();
        self.themes = vec![ALL_THEMES.to_string()];
        self.view = ViewState::new();
        self.reset_cursors();
        self.error_message = Some(message.into());
    }

    pub fn visible_articles(&self) -> Vec<&Article> {
        self.view.visible(&self.articles, &self.feeds)
    }

    pub fn sidebar_entries(&self) -> Vec<(String, usize)> {
        self.view.sidebar_counts(&self.articles, &self.feeds)
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.visible_articles().get(self.article_index).copied()
    }

    pub fn theme_index(&self) -> usize {
        self.themes
            .iter()
            .position(|t| *t == self.view.selected_theme)
            .unwrap_or(0)
    }

    pub fn next_theme(&mut self) {
        let next = (self.theme_index() + 1) % self.themes.len().max(1);
        self.select_theme(next);
    }

    pub fn prev_theme(&mut self) {
        let len = self.themes.len().max(1);
        let prev = (self.theme_index() + len - 1) % len;
        self.select_theme(prev);
    }

    fn select_theme(&mut self, index: usize) {
        if let Some(theme) = self.themes.get(index).cloned() {
            self.view.set_theme(theme);
            self.reset_cursors();
        }
    }

    pub fn switch_sidebar_tab(&mut self) {
        self.view.set_tab(self.view.sidebar_tab.toggle());
        self.reset_cursors();
    }

    /// Toggle the highlighted sidebar entry in or out of the filter.
    pub fn toggle_selection(&mut self) {
        if self.active_pane != ActivePane::Sidebar {
            return;
        }
        let entries = self.sidebar_entries();
        if let Some((key, _)) = entries.get(self.sidebar_index) {
            self.view.toggle_entry(key);
            self.set_article_index(0);
        }
    }

    pub fn clear_selection(&mut self) {
        self.view.clear_selection();
        self.set_article_index(0);
    }

    pub fn move_up(&mut self) {
        self.move_by(-1);
    }

    pub fn move_down(&mut self) {
        self.move_by(1);
    }

    pub fn next_page(&mut self) {
        self.move_by(PAGE_SIZE as isize);
    }

    pub fn prev_page(&mut self) {
        self.move_by(-(PAGE_SIZE as isize));
    }

    fn move_by(&mut self, delta: isize) {
        let (current, len) = match self.active_pane {
            ActivePane::Articles => (self.article_index, self.visible_articles().len()),
            ActivePane::Sidebar => (self.sidebar_index, self.sidebar_entries().len()),
        };
        let max = len.saturating_sub(1);
        let target = current.saturating_add_signed(delta).min(max);

        match self.active_pane {
            ActivePane::Articles => self.set_article_index(target),
            ActivePane::Sidebar => {
                self.sidebar_index = target;
                self.sidebar_list_state.select(Some(target));
            }
        }
    }

    fn set_article_index(&mut self, index: usize) {
        self.article_index = index;
        self.article_list_state.select(Some(index));
    }

    fn reset_cursors(&mut self) {
        self.set_article_index(0);
        self.sidebar_index = 0;
        self.sidebar_list_state.select(Some(0));
    }

    /// "N sources • M articles", counting what is currently shown.
    pub fn summary(&self) -> String {
        format!(
            "{} sources • {} articles",
            self.feeds.len(),
            self.visible_articles().len()
        )
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

impl Default for TuiApp {
    fn default() -> Self {
        Self::new()
    }
}
