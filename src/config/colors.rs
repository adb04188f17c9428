//! Colors used by the terminal dashboard.

use ratatui::style::Color;
use serde::{de, Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    #[serde(deserialize_with = "deserialize_color")]
    pub active_border: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub inactive_border: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub selection_bg_active: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub selection_fg_active: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub selection_bg_inactive: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub selection_fg_inactive: Color,
    /// Highlight of the current theme in the header tabs.
    #[serde(deserialize_with = "deserialize_color")]
    pub theme_tab_active: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub metadata_feed: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub metadata_author: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub metadata_date: Color,
    /// Sidebar sites or authors that are part of the active filter.
    #[serde(deserialize_with = "deserialize_color")]
    pub selected_entry: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub error: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub status_fg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub status_bg: Color,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            active_border: Color::Cyan,
            inactive_border: Color::DarkGray,
            selection_bg_active: Color::Cyan,
            selection_fg_active: Color::Black,
            selection_bg_inactive: Color::DarkGray,
            selection_fg_inactive: Color::White,
            theme_tab_active: Color::Cyan,
            metadata_feed: Color::Green,
            metadata_author: Color::Yellow,
            metadata_date: Color::DarkGray,
            selected_entry: Color::LightCyan,
            error: Color::LightRed,
            status_fg: Color::White,
            status_bg: Color::DarkGray,
        }
    }
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color_string(&s).map_err(de::Error::custom)
}

/// Parse a named color ("Cyan", "darkgray", ...) or a "#RRGGBB" / "#RGB" hex
/// code.
pub fn parse_color_string(s: &str) -> Result<Color, String> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex).ok_or_else(|| format!("Invalid hex color: {}", s));
    }

    let color = match s.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        "reset" => Color::Reset,
        _ => return Err(format!("Unknown color: {}", s)),
    };
    Ok(color)
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();

    match hex.len() {
        6 => Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        // #RGB is shorthand for #RRGGBB
        3 => Some(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => None,
    }
}
