//! Color palette and style constants for the ripwatch TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(18, 18, 18);
pub const C_ACCENT: Color = Color::Rgb(255, 95, 95);
pub const C_PLAYING: Color = Color::Rgb(80, 200, 120);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_SELECTION_BG: Color = Color::Rgb(28, 28, 40);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(120, 100, 200);
pub const C_NUMBER_HINT: Color = Color::Rgb(90, 90, 115);
pub const C_INPUT_BG: Color = Color::Rgb(20, 20, 32);
pub const C_INPUT_FG: Color = Color::Rgb(255, 200, 80);
pub const C_NOTICE_SUCCESS: Color = Color::Rgb(80, 200, 120);
pub const C_NOTICE_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_SEARCHING: Color = Color::Rgb(80, 140, 200);
pub const C_DOWNLOADING: Color = Color::Rgb(255, 184, 80);
pub const C_COMPLETED: Color = Color::Rgb(80, 200, 120);
pub const C_FAILED: Color = Color::Rgb(255, 95, 95);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_selected() -> Style {
    Style::default().bg(C_SELECTION_BG).fg(C_PRIMARY)
}

pub fn style_selected_focused() -> Style {
    Style::default()
        .bg(C_SELECTION_BG)
        .fg(C_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

/// Highlight used for the transient entrance flash on a track change.
pub fn style_flash() -> Style {
    Style::default().fg(C_PLAYING).add_modifier(Modifier::BOLD)
}

/// Color for an opaque server status string.
pub fn status_color(status: &str) -> Color {
    match status {
        "completed" | "found" => C_COMPLETED,
        "failed" => C_FAILED,
        "downloading" => C_DOWNLOADING,
        "searching" | "resolving" => C_SEARCHING,
        "queued" | "pending" => C_MUTED,
        _ => C_SECONDARY,
    }
}
