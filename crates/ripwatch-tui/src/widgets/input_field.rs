//! InputField — wraps tui-input for labelled form fields.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_INPUT_BG, C_INPUT_FG, C_MUTED, C_SECONDARY};

pub struct InputField {
    input: Input,
    label: String,
    placeholder: String,
}

impl InputField {
    pub fn new(label: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            label: label.into(),
            placeholder: placeholder.into(),
        }
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    /// Feed a key event into the field.
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.input
            .handle_event(&ratatui::crossterm::event::Event::Key(key));
    }

    /// Render the field into `area`. When active, the value area is
    /// highlighted and the cursor is placed after the text.
    pub fn draw(&self, frame: &mut Frame, area: Rect, active: bool) {
        let label_w = (self.label.len() + 2) as u16;
        let value_w = area.width.saturating_sub(label_w) as usize;

        let scroll = self.input.visual_scroll(value_w.saturating_sub(1));
        let shown: String = self.input.value().chars().skip(scroll).collect();

        let value_span = if shown.is_empty() && !active {
            Span::styled(self.placeholder.clone(), Style::default().fg(C_MUTED))
        } else if active {
            Span::styled(
                shown.clone(),
                Style::default().fg(C_INPUT_FG).bg(C_INPUT_BG),
            )
        } else {
            Span::styled(shown.clone(), Style::default().fg(C_SECONDARY))
        };

        let label_style = if active {
            Style::default()
                .fg(C_INPUT_FG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_SECONDARY)
        };

        let line = Line::from(vec![
            Span::styled(format!("{}: ", self.label), label_style),
            value_span,
        ]);
        frame.render_widget(Paragraph::new(line), area);

        if active {
            let cursor_x = area.x
                + label_w
                + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width.saturating_sub(1)), area.y));
        }
    }
}
