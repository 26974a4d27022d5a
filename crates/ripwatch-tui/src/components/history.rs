//! History panel — the last 20 tracks, newest at the top.

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
    theme::{style_flash, style_muted, style_selected, style_selected_focused, C_MUTED, C_SECONDARY},
    widgets::{pane_chrome::pane_chrome, truncate_to_width},
};

pub struct HistoryPanel {
    pub selected: usize,
    scroll_offset: usize,
}

impl HistoryPanel {
    pub fn new() -> Self {
        Self {
            selected: 0,
            scroll_offset: 0,
        }
    }

    fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    fn select_down(&mut self, n: usize, max: usize) {
        self.selected = (self.selected + n).min(max.saturating_sub(1));
    }
}

impl Component for HistoryPanel {
    fn id(&self) -> ComponentId {
        ComponentId::History
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let total = state.now_playing.history().len();

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.select_down(1, total),
            KeyCode::Home | KeyCode::Char('g') => {
                self.selected = 0;
                self.scroll_offset = 0;
            }
            KeyCode::End | KeyCode::Char('G') => self.selected = total.saturating_sub(1),
            KeyCode::Char('y') => {
                if let Some(track) = state.now_playing.history().get(self.selected) {
                    return vec![Action::CopyToClipboard(track.display())];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        let total = state.now_playing.history().len();
        match event.kind {
            MouseEventKind::ScrollUp => self.select_up(1),
            MouseEventKind::ScrollDown => self.select_down(1, total),
            _ => {}
        }
        vec![]
    }

    fn tick(&mut self, state: &AppState) -> Vec<Action> {
        let total = state.now_playing.history().len();
        if total > 0 && self.selected >= total {
            self.selected = total - 1;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        if area.height == 0 {
            return;
        }
        let block = pane_chrome("history", Some('5'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let history = state.now_playing.history();
        if history.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  no tracks yet", style_muted())),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected.saturating_sub(height.saturating_sub(1));
        }

        let text_w = (inner.width as usize).saturating_sub(9).max(8);
        let lines: Vec<Line> = history
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(height)
            .map(|(i, track)| {
                let is_selected = i == self.selected;
                // Freshest rows share the entrance flash with the
                // now-playing panel right after a change.
                let row_style = if is_selected && focused {
                    style_selected_focused()
                } else if is_selected {
                    style_selected()
                } else if i < 2 && state.track_flash_active() {
                    style_flash()
                } else {
                    Style::default().fg(C_SECONDARY)
                };

                Line::from(vec![
                    Span::styled(
                        format!(" {} ", format_ts(&track.seen_at)),
                        Style::default().fg(C_MUTED),
                    ),
                    Span::styled(truncate_to_width(&track.display(), text_w), row_style),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn format_ts(ts: &chrono::DateTime<chrono::Local>) -> String {
    let today = chrono::Local::now().date_naive();
    if ts.date_naive() == today {
        ts.format("%H:%M").to_string()
    } else {
        ts.format("%m/%d %H:%M").to_string()
    }
}
