//! Transient notice — the single status message shown after a submission.
//!
//! Unlike a toast queue, only one notice exists at a time: showing a new one
//! overwrites the current message and restarts the 5-second hide timer.

use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::theme::{C_NOTICE_ERROR, C_NOTICE_SUCCESS};

const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Success,
    Error,
}

struct Notice {
    message: String,
    severity: Severity,
    expires: Instant,
}

#[derive(Default)]
pub struct NoticeBar {
    current: Option<Notice>,
}

impl NoticeBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a message, replacing whatever is displayed and restarting the
    /// hide timer.
    pub fn show(&mut self, severity: Severity, message: impl Into<String>) {
        self.current = Some(Notice {
            message: message.into(),
            severity,
            expires: Instant::now() + NOTICE_TTL,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(Severity::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(Severity::Error, message);
    }

    /// Drop the notice once its timer runs out. Call each tick.
    pub fn tick(&mut self) {
        if let Some(n) = &self.current {
            if n.expires <= Instant::now() {
                self.current = None;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Render the notice in the top-right corner of `area`.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let Some(n) = &self.current else {
            return;
        };
        let max_width = (area.width / 2).clamp(30, 60);

        let (icon, color) = match n.severity {
            Severity::Success => ("✓", C_NOTICE_SUCCESS),
            Severity::Error => ("✗", C_NOTICE_ERROR),
        };

        let msg_len = n.message.chars().count() as u16;
        let w = (msg_len + 4).min(max_width);
        let x = area.x + area.width.saturating_sub(w + 1);
        let notice_area = Rect {
            x,
            y: area.y + 1,
            width: w,
            height: 1,
        };
        frame.render_widget(Clear, notice_area);
        let paragraph = Paragraph::new(Line::from(vec![Span::styled(
            format!(" {} {} ", icon, &n.message),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )]));
        frame.render_widget(paragraph, notice_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notice_overwrites_current() {
        let mut bar = NoticeBar::new();
        bar.error("first");
        bar.success("second");
        let n = bar.current.as_ref().unwrap();
        assert_eq!(n.message, "second");
        assert_eq!(n.severity, Severity::Success);
    }

    #[test]
    fn test_tick_keeps_unexpired_notice() {
        let mut bar = NoticeBar::new();
        bar.success("still here");
        bar.tick();
        assert!(!bar.is_empty());
    }
}
