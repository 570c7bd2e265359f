//! Terminal rendering (`spec.md` §1: "the core calls a render API but does
//! not define glyph layout"). Built on `ratatui`/`crossterm`, the crates
//! `other_examples/kdash-rs-kdash` uses for the same job — the teacher
//! carries no TUI surface at all, so this module is learned from the pack
//! rather than generalized from teacher code.

mod details;
mod popups;
mod search;
mod status;
mod tabs;
mod tree;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::controller::state::Model;

pub fn render(frame: &mut Frame, model: &Model) {
    let size = frame.area();
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
        .split(size);

    tabs::render_tab_bar(frame, model, root[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(root[1]);

    tree::render_tree(frame, model, body[0]);
    details::render_details(frame, model, body[1]);

    status::render_status_line(frame, model, root[2]);

    if model.search.active {
        search::render_search_overlay(frame, model, size);
    }

    if let Some(popup) = &model.popup {
        popups::render_popup(frame, model, popup, size);
    }
}
