//! Tracks panel — tracks of the selected playlist, sorted by title.
//!
//! A per-track progress bar is shown only while its status is
//! "downloading"; any stored progress for other statuses is not rendered.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{status_color, style_muted, style_secondary, style_selected, style_selected_focused, C_MUTED, C_PRIMARY, C_SEARCHING},
    widgets::{pane_chrome::pane_chrome, progress_bar::bar_string, truncate_to_width},
};

pub struct TracksPanel {
    pub selected: usize,
    scroll_offset: usize,
}

impl TracksPanel {
    pub fn new() -> Self {
        Self {
            selected: 0,
            scroll_offset: 0,
        }
    }

    fn row_count(&self, state: &AppState) -> usize {
        state
            .selected_playlist
            .as_deref()
            .map(|id| state.snapshot.tracks_for(id).len())
            .unwrap_or(0)
    }

    fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    fn select_down(&mut self, n: usize, max: usize) {
        self.selected = (self.selected + n).min(max.saturating_sub(1));
    }
}

impl Component for TracksPanel {
    fn id(&self) -> ComponentId {
        ComponentId::Tracks
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let total = self.row_count(state);

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.select_down(1, total),
            KeyCode::PageUp => self.select_up(10),
            KeyCode::PageDown => self.select_down(10, total),
            KeyCode::Home | KeyCode::Char('g') => {
                self.selected = 0;
                self.scroll_offset = 0;
            }
            KeyCode::End | KeyCode::Char('G') => self.selected = total.saturating_sub(1),
            KeyCode::Char('y') => {
                if let Some(id) = state.selected_playlist.as_deref() {
                    let rows = state.snapshot.tracks_for(id);
                    if let Some(t) = rows.get(self.selected) {
                        return vec![Action::CopyToClipboard(format!(
                            "{} \u{2013} {}",
                            t.artist, t.title
                        ))];
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        let total = self.row_count(state);
        match event.kind {
            MouseEventKind::ScrollUp => self.select_up(1),
            MouseEventKind::ScrollDown => self.select_down(1, total),
            _ => {}
        }
        vec![]
    }

    fn tick(&mut self, state: &AppState) -> Vec<Action> {
        let total = self.row_count(state);
        if total > 0 && self.selected >= total {
            self.selected = total - 1;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        if area.height == 0 {
            return;
        }
        let block = pane_chrome("tracks", Some('3'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(playlist_id) = state.selected_playlist.as_deref() else {
            frame.render_widget(
                Paragraph::new(Span::styled("  select a playlist", style_muted())),
                inner,
            );
            return;
        };

        let mut lines: Vec<Line> = Vec::new();

        // Resolution progress line while the backend is still searching.
        if let Some(search) = state.snapshot.search_for(playlist_id) {
            let is_resolving = state
                .snapshot
                .playlists
                .get(playlist_id)
                .map(|p| p.status == "resolving")
                .unwrap_or(false);
            if is_resolving {
                lines.push(Line::from(Span::styled(
                    format!(
                        " searching: {} ({} / {})",
                        truncate_to_width(&search.current_query, (inner.width as usize).saturating_sub(24)),
                        search.found,
                        search.total
                    ),
                    Style::default().fg(C_SEARCHING),
                )));
            }
        }

        let rows = state.snapshot.tracks_for(playlist_id);
        if rows.is_empty() && lines.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  no tracks yet", style_muted())),
                inner,
            );
            return;
        }

        let height = (inner.height as usize).saturating_sub(lines.len());
        if self.selected >= rows.len() && !rows.is_empty() {
            self.selected = rows.len() - 1;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if height > 0 && self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected.saturating_sub(height.saturating_sub(1));
        }

        let title_w = (inner.width as usize).saturating_sub(48).max(8);
        for (i, t) in rows.iter().enumerate().skip(self.scroll_offset).take(height) {
            let is_selected = i == self.selected;
            let row_style = if is_selected && focused {
                style_selected_focused()
            } else if is_selected {
                style_selected()
            } else {
                Style::default().fg(C_PRIMARY)
            };

            let mut spans = vec![
                Span::styled(
                    format!(" {:<w$} ", truncate_to_width(&t.title, title_w), w = title_w),
                    row_style,
                ),
                Span::styled(
                    format!("{:<18}", truncate_to_width(&t.artist, 17)),
                    style_secondary(),
                ),
                Span::styled(
                    format!("{:<12}", truncate_to_width(&t.status, 11)),
                    Style::default().fg(status_color(&t.status)),
                ),
            ];

            if t.status == "downloading" {
                spans.push(Span::styled(
                    bar_string(t.progress.clamp(0.0, 100.0) / 100.0, 10),
                    Style::default().fg(status_color("downloading")),
                ));
                spans.push(Span::styled(
                    format!(" {:>3.0}%", t.progress.clamp(0.0, 100.0)),
                    Style::default().fg(C_MUTED),
                ));
            } else if let Some(err) = t.error_message.as_deref() {
                if t.status == "failed" {
                    spans.push(Span::styled(
                        truncate_to_width(err, 30),
                        Style::default().fg(status_color("failed")),
                    ));
                }
            }

            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}
