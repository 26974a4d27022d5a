//! Now-playing panel — current track, stream details, resolved cover.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_default, style_flash, style_muted, style_secondary, C_MUTED, C_PLAYING, C_SECONDARY},
    widgets::pane_chrome::{pane_chrome, Badge},
};

pub struct NowPlayingPanel;

impl NowPlayingPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Component for NowPlayingPanel {
    fn id(&self) -> ComponentId {
        ComponentId::NowPlaying
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Char('y') => {
                if let Some(track) = state.now_playing.current() {
                    return vec![Action::CopyToClipboard(track.display())];
                }
            }
            KeyCode::Enter | KeyCode::Char('p') => return vec![Action::TogglePlayback],
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        if area.height == 0 {
            return;
        }
        let badge = if state.playing {
            Some(Badge {
                text: "LIVE",
                color: C_PLAYING,
            })
        } else {
            None
        };
        let block = pane_chrome("now playing", Some('4'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(track) = state.now_playing.current() else {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  waiting for stream metadata…",
                    style_muted(),
                )),
                inner,
            );
            return;
        };

        // Entrance flash: the fresh track renders highlighted for a moment.
        let title_style = if state.track_flash_active() {
            style_flash()
        } else {
            style_default()
        };

        let mut lines = vec![
            Line::from(Span::styled(format!(" {}", track.title), title_style)),
            Line::from(Span::styled(format!(" {}", track.artist), style_secondary())),
        ];

        if !track.album.is_empty() {
            lines.push(Line::from(Span::styled(
                format!(" {}", track.album),
                style_muted(),
            )));
        }

        let mut details: Vec<String> = Vec::new();
        if state.listeners > 0 {
            details.push(format!("{} listeners", state.listeners));
        }
        if !state.bitrate.is_empty() {
            details.push(format!("{} kbps", state.bitrate));
        }
        if !details.is_empty() {
            lines.push(Line::from(Span::styled(
                format!(" {}", details.join(" · ")),
                style_muted(),
            )));
        }

        if !state.server_name.is_empty() || !state.server_description.is_empty() {
            let server = [state.server_name.as_str(), state.server_description.as_str()]
                .iter()
                .filter(|s| !s.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(" — ");
            lines.push(Line::from(Span::styled(
                format!(" {}", server),
                Style::default().fg(C_MUTED),
            )));
        }

        lines.push(Line::default());
        match state.cover_url.as_deref() {
            Some(url) => lines.push(Line::from(vec![
                Span::styled(" cover ", Style::default().fg(C_SECONDARY)),
                Span::styled(url.to_string(), Style::default().fg(C_MUTED)),
            ])),
            None => lines.push(Line::from(Span::styled(
                " cover …",
                Style::default().fg(C_MUTED),
            ))),
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}
