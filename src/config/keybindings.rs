//! Keybinding configuration for the terminal dashboard.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::tui::event::Action;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub next_page: Vec<String>,
    pub prev_page: Vec<String>,
    pub next_pane: Vec<String>,
    pub prev_pane: Vec<String>,
    pub next_theme: Vec<String>,
    pub prev_theme: Vec<String>,
    pub switch_sidebar_tab: Vec<String>,
    pub toggle_selection: Vec<String>,
    pub clear_selection: Vec<String>,
    pub open_in_browser: Vec<String>,
    pub refresh: Vec<String>,
}

fn keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: keys(&["q", "Ctrl+c"]),
            move_up: keys(&["k", "Up"]),
            move_down: keys(&["j", "Down"]),
            next_page: keys(&["n", "PageDown"]),
            prev_page: keys(&["p", "PageUp"]),
            next_pane: keys(&["Tab"]),
            prev_pane: keys(&["BackTab", "Shift+Tab"]),
            next_theme: keys(&["l", "Right"]),
            prev_theme: keys(&["h", "Left"]),
            switch_sidebar_tab: keys(&["a"]),
            toggle_selection: keys(&["Space", "Enter"]),
            clear_selection: keys(&["c"]),
            open_in_browser: keys(&["o"]),
            refresh: keys(&["R"]),
        }
    }
}

impl KeybindingConfig {
    /// Resolve a key press to an action. The first matching binding wins, in
    /// declaration order.
    pub fn get_action(&self, key: &KeyEvent) -> Action {
        let table: [(&[String], Action); 14] = [
            (&self.quit, Action::Quit),
            (&self.move_up, Action::MoveUp),
            (&self.move_down, Action::MoveDown),
            (&self.next_page, Action::NextPage),
            (&self.prev_page, Action::PrevPage),
            (&self.next_pane, Action::NextPane),
            (&self.prev_pane, Action::PrevPane),
            (&self.next_theme, Action::NextTheme),
            (&self.prev_theme, Action::PrevTheme),
            (&self.switch_sidebar_tab, Action::SwitchSidebarTab),
            (&self.toggle_selection, Action::ToggleSelection),
            (&self.clear_selection, Action::ClearSelection),
            (&self.open_in_browser, Action::OpenInBrowser),
            (&self.refresh, Action::Refresh),
        ];

        table
            .into_iter()
            .find(|(bindings, _)| matches_any(key, bindings))
            .map(|(_, action)| action)
            .unwrap_or(Action::None)
    }
}

fn matches_any(key: &KeyEvent, bindings: &[String]) -> bool {
    bindings
        .iter()
        .filter_map(|b| parse_key_string(b).ok())
        .any(|binding| binding.matches(key))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Terminals report uppercase letters with SHIFT set, so a binding without
    /// SHIFT still matches them.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers == key.modifiers
                || self.modifiers == (key.modifiers & !KeyModifiers::SHIFT))
    }
}

/// Parse strings like "j", "R", "PageDown", "Ctrl+c" or "Shift+Tab".
pub fn parse_key_string(s: &str) -> Result<KeyBinding, String> {
    let s = s.trim();
    let (mods, key_part) = match s.rsplit_once('+') {
        // A lone "+" is the plus key, not a modifier separator.
        Some((mods, key)) if !key.is_empty() => (Some(mods), key),
        _ => (None, s),
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in mods.into_iter().flat_map(|m| m.split('+')) {
        modifiers |= match part.to_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "shift" => KeyModifiers::SHIFT,
            "alt" => KeyModifiers::ALT,
            _ => return Err(format!("Unknown modifier: {}", part)),
        };
    }

    Ok(KeyBinding {
        code: parse_key_code(key_part)?,
        modifiers,
    })
}

fn parse_key_code(s: &str) -> Result<KeyCode, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    let lower = s.to_lowercase();
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Ok(KeyCode::F(n));
        }
    }

    match lower.as_str() {
        "enter" | "return" => Ok(KeyCode::Enter),
        "tab" => Ok(KeyCode::Tab),
        "backtab" => Ok(KeyCode::BackTab),
        "backspace" | "bs" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdn" => Ok(KeyCode::PageDown),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "space" => Ok(KeyCode::Char(' ')),
        _ => Err(format!("Unknown key: {}", s)),
    }
}
