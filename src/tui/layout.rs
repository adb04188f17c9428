use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::config::ColorConfig;
use crate::domain::Article;
use crate::tui::app::{ActivePane, TuiApp};

const SNIPPET_WIDTH: usize = 160;

pub fn render(frame: &mut Frame, app: &mut TuiApp, colors: &ColorConfig) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Theme tabs
            Constraint::Min(5),    // Articles + sidebar
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_theme_tabs(frame, app, rows[0], colors);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(rows[1]);

    match app.error_message.clone() {
        Some(message) => render_banner(frame, &message, columns[0], colors),
        None => render_articles_pane(frame, app, columns[0], colors),
    }
    render_sidebar(frame, app, columns[1], colors);
    render_status_bar(frame, app, rows[2], colors);
}

fn pane_block(title: String, active: bool, colors: &ColorConfig) -> Block<'static> {
    let border = if active {
        colors.active_border
    } else {
        colors.inactive_border
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn highlight_style(active: bool, colors: &ColorConfig) -> Style {
    if active {
        Style::default()
            .bg(colors.selection_bg_active)
            .fg(colors.selection_fg_active)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .bg(colors.selection_bg_inactive)
            .fg(colors.selection_fg_inactive)
    }
}

fn render_theme_tabs(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let tabs = Tabs::new(app.themes.iter().map(|t| Line::from(t.as_str())))
        .select(app.theme_index())
        .block(pane_block(" feedboard ".to_string(), false, colors))
        .highlight_style(
            Style::default()
                .fg(colors.theme_tab_active)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );

    frame.render_widget(tabs, area);
}

fn article_item<'a>(article: &'a Article, colors: &ColorConfig) -> ListItem<'a> {
    let mut meta = vec![
        Span::styled(article.feed_name.as_str(), Style::default().fg(colors.metadata_feed)),
        Span::raw("  "),
    ];
    if let Some(creator) = &article.creator {
        meta.push(Span::styled(
            creator.as_str(),
            Style::default().fg(colors.metadata_author),
        ));
        meta.push(Span::raw("  "));
    }
    meta.push(Span::styled(
        article.display_date(),
        Style::default().fg(colors.metadata_date),
    ));

    let mut lines = vec![
        Line::from(Span::styled(
            article.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(meta),
    ];

    let snippet = article.display_snippet();
    if !snippet.is_empty() {
        lines.push(Line::from(truncate(snippet, SNIPPET_WIDTH)));
    }
    lines.push(Line::from(""));

    ListItem::new(lines)
}

fn render_articles_pane(frame: &mut Frame, app: &mut TuiApp, area: Rect, colors: &ColorConfig) {
    let active = app.active_pane == ActivePane::Articles;
    // Field borrows keep the list state free for the mutable borrow below.
    let visible = app.view.visible(&app.articles, &app.feeds);

    let title = format!(
        " Articles ({}) [{}/{}] ",
        visible.len(),
        (app.article_index + 1).min(visible.len().max(1)),
        visible.len().max(1)
    );

    let items: Vec<ListItem> = if app.is_loading && visible.is_empty() {
        vec![ListItem::new("Loading feeds...")]
    } else {
        visible.iter().map(|a| article_item(a, colors)).collect()
    };

    let list = List::new(items)
        .block(pane_block(title, active, colors))
        .highlight_style(highlight_style(active, colors))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.article_list_state);
}

fn render_banner(frame: &mut Frame, message: &str, area: Rect, colors: &ColorConfig) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default()
            .fg(colors.error)
            .add_modifier(Modifier::BOLD),
    )))
    .block(pane_block(" Articles ".to_string(), false, colors))
    .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_sidebar(frame: &mut Frame, app: &mut TuiApp, area: Rect, colors: &ColorConfig) {
    let active = app.active_pane == ActivePane::Sidebar;
    let entries = app.sidebar_entries();

    let items: Vec<ListItem> = entries
        .iter()
        .map(|(key, count)| {
            let selected = app.view.is_selected(key);
            let marker = if selected { "●" } else { " " };
            let style = if selected {
                Style::default()
                    .fg(colors.selected_entry)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!("{} {} ({})", marker, key, count)).style(style)
        })
        .collect();

    let title = format!(
        " {} ({}) ",
        app.view.sidebar_tab.label(),
        entries.len()
    );

    let list = List::new(items)
        .block(pane_block(title, active, colors))
        .highlight_style(highlight_style(active, colors))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.sidebar_list_state);
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let status = if app.is_loading {
        "Refreshing feeds...".to_string()
    } else if let Some(ref msg) = app.status_message {
        format!("{}  |  {}", app.summary(), msg)
    } else {
        format!(
            "{}  |  h/l:Theme  j/k:Nav  Tab:Pane  a:Sites/Authors  Space:Filter  c:Clear  o:Open  R:Refresh  q:Quit",
            app.summary()
        )
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(colors.status_fg).bg(colors.status_bg));

    frame.render_widget(paragraph, area);
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}…", &text[..end]),
        None => text.to_string(),
    }
}
