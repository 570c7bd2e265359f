//! Left-hand inventory tree: tenants → subscriptions → resource groups →
//! resources (`spec.md` §4.5 "Tree cursor").

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::controller::state::Model;
use crate::model::inventory::TreeRow;
use crate::model::workspace::PanelFocus;

/// Renders the same row sequence `Inventory::visible_rows` produces, so the
/// highlighted index lines up with what the reducer resolves the cursor
/// against (`spec.md` §4.5 "Tree cursor").
pub fn render_tree(frame: &mut Frame, model: &Model, area: Rect) {
    let focused = model.panel_focus == PanelFocus::Tree;
    let Some(sub) = model.active_subscription() else {
        let list = List::new(vec![ListItem::new("  loading subscriptions...")])
            .block(Block::default().borders(Borders::ALL).title("Inventory"));
        frame.render_widget(list, area);
        return;
    };
    let groups = model.groups_for_active_subscription();
    let rows = model.inventory.visible_rows(&sub.id);
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| render_row(model, &sub.id, groups, *row))
        .collect();

    let border_style = if focused { Style::default().fg(Color::Cyan) } else { Style::default() };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Inventory").border_style(border_style))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    state.select(Some(model.tree_cursor));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_row(
    model: &Model,
    sub_id: &str,
    groups: &[crate::model::entities::ResourceGroup],
    row: TreeRow,
) -> ListItem<'static> {
    match row {
        TreeRow::SubscriptionHeader => {
            let sub = model.active_subscription().expect("header row implies an active subscription");
            ListItem::new(Line::from(Span::styled(
                format!("  {} ({})", sub.name, sub.id),
                Style::default().add_modifier(Modifier::BOLD),
            )))
        }
        TreeRow::Group(idx) => {
            let group = &groups[idx];
            let expansion = model.inventory.expansion(sub_id, &group.name);
            let marker = match expansion {
                Some(e) if e.loading => "...",
                Some(e) if e.expanded => "v",
                _ => ">",
            };
            ListItem::new(format!("  {marker} {}", group.name))
        }
        TreeRow::Resource { group_index, resource_index } => {
            let group = &groups[group_index];
            let expansion = model.inventory.expansion(sub_id, &group.name).expect("resource row implies an expansion");
            let resource = &expansion.children[resource_index];
            ListItem::new(format!("      {} [{}]", resource.name, resource.type_tag()))
        }
        TreeRow::Note(group_index) => {
            let group = &groups[group_index];
            let expansion = model.inventory.expansion(sub_id, &group.name).expect("note row implies an expansion");
            match &expansion.err {
                Some(err) => ListItem::new(Line::from(Span::styled(
                    format!("      error: {err}"),
                    Style::default().fg(Color::Red),
                ))),
                None => ListItem::new("      (no resources)"),
            }
        }
    }
}
