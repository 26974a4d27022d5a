//! Status bar — bottom line with connection state, playback, and key hints.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app_state::AppState;
use crate::theme::{C_ACCENT, C_MUTED, C_PLAYING, C_SECONDARY};

pub fn draw_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    // Event-stream connection indicator.
    if state.connected {
        spans.push(Span::styled("● connected", Style::default().fg(C_PLAYING)));
    } else {
        let retry = state
            .reconnect_in
            .map(|d| format!(" (retry in {}s)", d.as_secs().max(1)))
            .unwrap_or_default();
        spans.push(Span::styled(
            format!("○ disconnected{}", retry),
            Style::default().fg(C_ACCENT),
        ));
    }

    spans.push(Span::styled("  │  ", Style::default().fg(C_MUTED)));

    // Playback indicator.
    if state.playing {
        spans.push(Span::styled("▶ playing", Style::default().fg(C_PLAYING)));
        if state.listeners > 0 {
            spans.push(Span::styled(
                format!("  {} listening", state.listeners),
                Style::default().fg(C_SECONDARY),
            ));
        }
    } else {
        spans.push(Span::styled("■ stopped", Style::default().fg(C_MUTED)));
    }

    if let Some(log) = state.last_log.as_deref() {
        spans.push(Span::styled("  │  ", Style::default().fg(C_MUTED)));
        spans.push(Span::styled(log, Style::default().fg(C_SECONDARY)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// One-row keybindings footer.
pub fn draw_keys_bar(frame: &mut Frame, area: Rect) {
    let keys = [
        ("tab", "focus"),
        ("1-5", "pane"),
        ("p", "play/stop"),
        ("y", "copy"),
        ("q", "quit"),
    ];

    let mut spans: Vec<Span> = Vec::new();
    for (key, label) in keys {
        spans.push(Span::styled(
            format!(" {} ", key),
            Style::default().fg(C_ACCENT),
        ));
        spans.push(Span::styled(
            format!("{}  ", label),
            Style::default().fg(C_MUTED),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
