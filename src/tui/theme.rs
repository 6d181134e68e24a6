//! Stat-block palette: parchment red and gold on charcoal.
//!
//! Views take their colors from here rather than naming `Color::*` inline.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

/// Stat-block red, used for section rules and the focused pane.
pub const PRIMARY: Color = Color::Rgb(0x9C, 0x2B, 0x1B);
pub const PRIMARY_LIGHT: Color = Color::Rgb(0xD0, 0x5A, 0x44);
/// Gold leaf: monster names and the selected row.
pub const ACCENT: Color = Color::Rgb(0xE0, 0xB0, 0x4C);
pub const BG_BASE: Color = Color::Rgb(0x16, 0x14, 0x12);

pub const TEXT: Color = Color::Rgb(0xE0, 0xDA, 0xCF);
pub const TEXT_MUTED: Color = Color::Rgb(0x8A, 0x84, 0x7A);
pub const TEXT_DIM: Color = Color::Rgb(0x55, 0x51, 0x4B);

pub const ERROR: Color = Color::Rgb(0xEF, 0x53, 0x50);
pub const SUCCESS: Color = Color::Rgb(0x66, 0xBB, 0x6A);
pub const WARNING: Color = Color::Rgb(0xFF, 0xA7, 0x26);
pub const INFO: Color = Color::Rgb(0x42, 0xA5, 0xF5);

pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Stat-block labels ("Armor Class", "Actions", ...).
pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn highlight() -> Style {
    title()
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

/// Faint text; also used for key hints in the status bar.
pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn brand_badge() -> Style {
    badge(ACCENT)
}

pub fn sync_badge() -> Style {
    badge(INFO)
}

fn badge(bg: Color) -> Style {
    Style::default().fg(BG_BASE).bg(bg).add_modifier(Modifier::BOLD)
}

/// Color for a formatted challenge rating ("1/4", "5", "21").
///
/// Fractional ratings fade out; the deadlier tiers run from gold to red.
pub fn challenge_rating(rating: &str) -> Style {
    let whole = rating.parse::<u32>().ok();
    match whole {
        None | Some(0) => dim(),
        Some(1..=4) => muted(),
        Some(5..=10) => Style::default().fg(ACCENT),
        Some(11..=16) => Style::default().fg(PRIMARY_LIGHT),
        Some(_) => Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
    }
}

/// Bordered pane; the focused one gets the stat-block red border.
pub fn pane(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { PRIMARY } else { TEXT_DIM };
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

pub fn block_focused(title: &str) -> Block<'_> {
    pane(title, true)
}

pub fn block_default(title: &str) -> Block<'_> {
    pane(title, false)
}
