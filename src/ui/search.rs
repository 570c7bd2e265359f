//! Search overlay (`spec.md` §4.5 "Search overlay").

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::controller::state::Model;

pub fn render_search_overlay(frame: &mut Frame, model: &Model, area: Rect) {
    let width = area.width.min(50);
    let rect = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.height.saturating_sub(3),
        width,
        height: 3,
    };
    frame.render_widget(Clear, rect);
    let text = format!("/{}  ({} match(es))", model.search.query, model.search.matches.len());
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("Search").border_style(Style::default().fg(Color::Yellow)));
    frame.render_widget(paragraph, rect);
}
