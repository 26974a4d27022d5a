//! Playlists panel — one row per playlist with status and completion bar.

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
    theme::{status_color, style_muted, style_secondary, style_selected, style_selected_focused, C_MUTED, C_PRIMARY},
    widgets::{pane_chrome::pane_chrome, progress_bar::bar_string, truncate_to_width},
};

pub struct PlaylistsPanel {
    pub selected: usize,
    scroll_offset: usize,
}

impl PlaylistsPanel {
    pub fn new() -> Self {
        Self {
            selected: 0,
            scroll_offset: 0,
        }
    }

    fn selection_action(&self, state: &AppState) -> Vec<Action> {
        let rows = state.snapshot.playlists_sorted();
        let id = rows.get(self.selected).map(|p| p.playlist_id.clone());
        vec![Action::PlaylistSelected(id)]
    }

    fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    fn select_down(&mut self, n: usize, max: usize) {
        self.selected = (self.selected + n).min(max.saturating_sub(1));
    }
}

impl Component for PlaylistsPanel {
    fn id(&self) -> ComponentId {
        ComponentId::Playlists
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let total = state.snapshot.playlists.len();

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_up(1);
                return self.selection_action(state);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_down(1, total);
                return self.selection_action(state);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.selected = 0;
                self.scroll_offset = 0;
                return self.selection_action(state);
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = total.saturating_sub(1);
                return self.selection_action(state);
            }
            KeyCode::Char('y') => {
                let rows = state.snapshot.playlists_sorted();
                if let Some(p) = rows.get(self.selected) {
                    return vec![Action::CopyToClipboard(p.playlist_name.clone())];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        let total = state.snapshot.playlists.len();
        match event.kind {
            MouseEventKind::ScrollUp => {
                self.select_up(1);
                self.selection_action(state)
            }
            MouseEventKind::ScrollDown => {
                self.select_down(1, total);
                self.selection_action(state)
            }
            _ => vec![],
        }
    }

    fn tick(&mut self, state: &AppState) -> Vec<Action> {
        let total = state.snapshot.playlists.len();
        if total > 0 && self.selected >= total {
            self.selected = total - 1;
        }
        // Adopt the first playlist once one exists and nothing is selected.
        if state.selected_playlist.is_none() && total > 0 {
            return self.selection_action(state);
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        if area.height == 0 {
            return;
        }
        let block = pane_chrome("playlists", Some('2'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = state.snapshot.playlists_sorted();
        if rows.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no playlists yet — submit a URL above",
                    style_muted(),
                )),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        if self.selected >= rows.len() {
            self.selected = rows.len() - 1;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected.saturating_sub(height.saturating_sub(1));
        }

        let name_w = (inner.width as usize).saturating_sub(34).max(8);
        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(height)
            .map(|(i, p)| {
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
                        format!(" {:<w$} ", truncate_to_width(&p.playlist_name, name_w), w = name_w),
                        row_style,
                    ),
                    Span::styled(
                        format!("{:<12}", truncate_to_width(&p.status, 11)),
                        Style::default().fg(status_color(&p.status)),
                    ),
                    Span::styled(
                        format!("{:>3}/{:<3} ", p.completed_tracks, p.total_tracks),
                        style_secondary(),
                    ),
                    Span::styled(
                        bar_string(p.percent() / 100.0, 10),
                        Style::default().fg(status_color(&p.status)),
                    ),
                    Span::styled(format!(" {:>3.0}%", p.percent()), Style::default().fg(C_MUTED)),
                ];

                if p.failed_tracks > 0 {
                    spans.push(Span::styled(
                        format!("  {} failed", p.failed_tracks),
                        Style::default().fg(status_color("failed")),
                    ));
                }

                Line::from(spans)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }
}
