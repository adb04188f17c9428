pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{AppContext, Result};

use self::app::TuiApp;
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(terminal: &mut Tui, ctx: Arc<AppContext>) -> Result<()> {
    let config = ctx.config.clone();
    let mut tui_app = TuiApp::new();
    let event_handler = EventHandler::new(Duration::from_millis(100));

    reload(terminal, &mut tui_app, &ctx).await?;

    loop {
        terminal.draw(|frame| layout::render(frame, &mut tui_app, &config.colors))?;

        let AppEvent::Key(key) = event_handler.next()? else {
            continue;
        };

        match config.keybindings.get_action(&key) {
            Action::Quit => tui_app.should_quit = true,
            Action::MoveUp => tui_app.move_up(),
            Action::MoveDown => tui_app.move_down(),
            Action::NextPage => tui_app.next_page(),
            Action::PrevPage => tui_app.prev_page(),
            Action::NextPane => tui_app.active_pane = tui_app.active_pane.next(),
            Action::PrevPane => tui_app.active_pane = tui_app.active_pane.prev(),
            Action::NextTheme => tui_app.next_theme(),
            Action::PrevTheme => tui_app.prev_theme(),
            Action::SwitchSidebarTab => tui_app.switch_sidebar_tab(),
            Action::ToggleSelection => tui_app.toggle_selection(),
            Action::ClearSelection => tui_app.clear_selection(),
            Action::OpenInBrowser => {
                let link = tui_app.selected_article().map(|a| a.link.clone());
                match link {
                    Some(link) if link != crate::domain::PLACEHOLDER_LINK => {
                        if let Err(e) = open::that(&link) {
                            tui_app.set_status(format!("Failed to open browser: {}", e));
                        }
                    }
                    Some(_) => tui_app.set_status("Article has no link".to_string()),
                    None => {}
                }
            }
            Action::Refresh => reload(terminal, &mut tui_app, &ctx).await?,
            Action::None => tui_app.clear_status(),
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Reload the feeds file and re-aggregate, drawing a loading state first.
async fn reload(terminal: &mut Tui, tui_app: &mut TuiApp, ctx: &AppContext) -> Result<()> {
    tui_app.is_loading = true;
    terminal.draw(|frame| layout::render(frame, tui_app, &ctx.config.colors))?;

    match ctx.refresh().await {
        Ok((feeds, aggregation)) => tui_app.set_data(feeds, aggregation),
        Err(e) => {
            tracing::error!("{}", e);
            tui_app.set_load_error("Failed to load feeds");
        }
    }

    tui_app.is_loading = false;
    Ok(())
}
