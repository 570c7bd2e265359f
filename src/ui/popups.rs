//! Modal popups: help, action menu, destructive-action confirmation,
//! subscription switcher, IaC manager, DevOps manager (`spec.md` §4.4,
//! §4.7 — "Each integration is exposed as a sub-popup driven by the same
//! reducer").

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::controller::state::{Model, PopupKind};
use crate::model::actions::actions_for;

pub fn render_popup(frame: &mut Frame, model: &Model, popup: &PopupKind, area: Rect) {
    let rect = centered_rect(area, 60, 60);
    frame.render_widget(Clear, rect);

    let (title, body) = match popup {
        PopupKind::Help => ("Help".to_string(), help_text()),
        PopupKind::ActionMenu { resource_id } => ("Actions".to_string(), action_menu_text(model, resource_id)),
        PopupKind::ConfirmDestructive { resource_id, resource_name, action_label, .. } => (
            "Confirm".to_string(),
            format!(
                "{action_label} {resource_name} ({resource_id})?\n\nEnter to confirm, Esc to abort."
            ),
        ),
        PopupKind::SubscriptionSwitcher => ("Switch Subscription".to_string(), subscription_list_text(model)),
        PopupKind::IacManager => (
            "IaC Manager".to_string(),
            "Browse projects / Analyse code / init / plan / apply / validate / fmt / destroy / Workspace list / State browser".to_string(),
        ),
        PopupKind::DevOpsManager => (
            "DevOps Manager".to_string(),
            "Organisations / Projects / Pipelines / Pipeline runs".to_string(),
        ),
        PopupKind::ResourceEditor { resource_id } => ("Resource Editor".to_string(), resource_editor_text(model, resource_id)),
    };

    let border_style = match popup {
        PopupKind::ConfirmDestructive { .. } => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::Cyan),
    };

    let paragraph = Paragraph::new(body)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title).border_style(border_style));
    frame.render_widget(paragraph, rect);
}

fn help_text() -> String {
    crate::keymap::BINDINGS
        .iter()
        .map(|(key, description)| format!("{key:<16} {description}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn action_menu_text(model: &Model, resource_id: &str) -> String {
    let Some(resource) = model.find_resource(resource_id) else {
        return "resource no longer available".to_string();
    };
    actions_for(resource.type_tag())
        .iter()
        .map(|a| a.label)
        .collect::<Vec<_>>()
        .join("\n")
}

fn resource_editor_text(model: &Model, resource_id: &str) -> String {
    let Some(resource) = model.find_resource(resource_id) else {
        return "resource no longer available".to_string();
    };
    let tags = resource
        .tags
        .as_ref()
        .map(|t| serde_json::to_string_pretty(t).unwrap_or_default())
        .unwrap_or_else(|| "(none)".to_string());
    format!(
        "name:     {}\nlocation: {}\ngroup:    {}\ntags:\n{tags}",
        resource.name, resource.location, resource.group
    )
}

fn subscription_list_text(model: &Model) -> String {
    let mut lines: Vec<String> = model
        .inventory
        .subscriptions
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let cursor = if i == model.popup_cursor { ">" } else { " " };
            let active = if model.inventory.active_subscription_id.as_deref() == Some(s.id.as_str()) { "*" } else { " " };
            format!("{cursor}{active} {} ({})", s.name, s.id)
        })
        .collect();
    lines.push(String::new());
    lines.push("j/k to move, Enter to switch, Esc to cancel".to_string());
    lines.join("\n")
}

fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
