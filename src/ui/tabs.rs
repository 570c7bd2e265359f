//! Tab bar (`spec.md` §4.5 "Tabs").

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::controller::state::Model;

pub fn render_tab_bar(frame: &mut Frame, model: &Model, area: Rect) {
    let mut spans = Vec::new();
    for (i, tab) in model.workspace.tabs.iter().enumerate() {
        let active = model.workspace.active_index == Some(i);
        let style = if active { Style::default().add_modifier(Modifier::REVERSED) } else { Style::default() };
        spans.push(Span::styled(format!(" {} ", tab.title), style));
    }
    if spans.is_empty() {
        spans.push(Span::raw(" welcome "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
