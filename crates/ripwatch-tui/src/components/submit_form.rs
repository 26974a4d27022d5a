//! Submit form — playlist URL plus optional source overrides.
//!
//! Keybindings (when focused):
//!   Up/Down  — move between fields
//!   Enter    — submit
//!   Esc      — clear all fields
//!   anything else goes into the active field

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use ripwatch_proto::submit::SubmitRequest;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    widgets::{input_field::InputField, pane_chrome::pane_chrome},
};

const FIELD_COUNT: usize = 3;

pub struct SubmitForm {
    url: InputField,
    source: InputField,
    fallback_source: InputField,
    active: usize,
}

impl SubmitForm {
    pub fn new() -> Self {
        Self {
            url: InputField::new("url", "https://open.spotify.com/playlist/…"),
            source: InputField::new("source", "default"),
            fallback_source: InputField::new("fallback", "default"),
            active: 0,
        }
    }

    pub fn request(&self) -> SubmitRequest {
        SubmitRequest::from_form(
            self.url.value(),
            self.source.value(),
            self.fallback_source.value(),
        )
    }

    /// Called by the app after a successful submission.
    pub fn clear(&mut self) {
        self.url.clear();
        self.source.clear();
        self.fallback_source.clear();
        self.active = 0;
    }

    fn active_field(&mut self) -> &mut InputField {
        match self.active {
            0 => &mut self.url,
            1 => &mut self.source,
            _ => &mut self.fallback_source,
        }
    }
}

impl Component for SubmitForm {
    fn id(&self) -> ComponentId {
        ComponentId::SubmitForm
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up => {
                self.active = self.active.checked_sub(1).unwrap_or(FIELD_COUNT - 1);
            }
            KeyCode::Down => {
                self.active = (self.active + 1) % FIELD_COUNT;
            }
            KeyCode::Enter => return vec![Action::Submit(self.request())],
            KeyCode::Esc => self.clear(),
            _ => self.active_field().handle_key(key),
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        if area.height == 0 {
            return;
        }
        let block = pane_chrome("submit playlist", Some('1'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        self.url.draw(frame, rows[0], focused && self.active == 0);
        self.source.draw(frame, rows[1], focused && self.active == 1);
        self.fallback_source
            .draw(frame, rows[2], focused && self.active == 2);
    }
}
