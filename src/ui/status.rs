//! Single-line status bar (`spec.md` §7 "User-visible behaviours").

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::controller::state::Model;

pub fn render_status_line(frame: &mut Frame, model: &Model, area: Rect) {
    let (text, style) = match &model.status {
        Some(status) if status.is_error => (status.text.clone(), Style::default().fg(Color::Red)),
        Some(status) => (status.text.clone(), Style::default().fg(Color::Green)),
        None => ("ready".to_string(), Style::default()),
    };
    frame.render_widget(Paragraph::new(Line::styled(text, style)), area);
}
