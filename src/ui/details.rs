//! Right-hand content pane: renders the active tab's body, or a welcome
//! message when no tab is open (`spec.md` §4.5, glossary "Content tab").

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::controller::state::Model;
use crate::model::workspace::{ContentTab, PanelFocus, TabKind};

pub fn render_details(frame: &mut Frame, model: &Model, area: Rect) {
    let focused = model.panel_focus == PanelFocus::Details;
    let border_style = if focused { Style::default().fg(Color::Cyan) } else { Style::default() };

    let (title, body) = match model.workspace.active() {
        Some(tab) => (tab.title.clone(), render_tab_body(model, tab)),
        None => ("Welcome".to_string(), welcome_text(model)),
    };

    let paragraph = Paragraph::new(body)
        .block(Block::default().borders(Borders::ALL).title(title).border_style(border_style))
        .wrap(Wrap { trim: false })
        .scroll((model.workspace.active().map(|t| t.scroll_offset).unwrap_or(0), 0));

    frame.render_widget(paragraph, area);
}

fn render_tab_body(model: &Model, tab: &ContentTab) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    if tab.action_in_progress {
        lines.push(Line::from("(action in progress...)"));
    }
    if let Some(progress) = &model.last_dashboard_progress {
        if tab.resource_ref.as_deref() == Some(progress.resource_id.as_str()) {
            lines.push(Line::from(format!(
                "dashboard: {}/{} complete, eta {}",
                progress.completed + progress.failed,
                progress.total,
                progress.eta
            )));
        }
    }

    match tab.kind {
        TabKind::Dashboard => lines.extend(render_dashboard_body(model, tab)),
        TabKind::ResourceDetails => lines.extend(render_resource_body(model, tab)),
        _ => {
            for line in tab.body.lines() {
                lines.push(Line::from(line.to_string()));
            }
        }
    }

    if lines.is_empty() {
        lines.push(Line::from("(empty)"));
    }
    lines
}

/// Renders the C3 aggregation result for this tab's resource (`spec.md`
/// §4.3, §7: "Completed operations with errors show a red status line").
/// Falls back to a waiting message until `Msg::DashboardLoaded` lands.
fn render_dashboard_body(model: &Model, tab: &ContentTab) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let Some(resource_id) = tab.resource_ref.as_deref() else {
        lines.push(Line::from("no resource associated with this dashboard"));
        return lines;
    };
    let Some(snapshot) = model.last_dashboard_snapshot.get(resource_id) else {
        lines.push(Line::from("waiting for dashboard data..."));
        return lines;
    };

    if snapshot.partial {
        lines.push(Line::from(Span::styled(
            format!("partial: {} of 5 quer{} failed", snapshot.errors.len(), if snapshot.errors.len() == 1 { "y" } else { "ies" }),
            Style::default().fg(Color::Red),
        )));
        for err in &snapshot.errors {
            lines.push(Line::from(Span::styled(format!("  {err}"), Style::default().fg(Color::Red))));
        }
    }
    lines.push(Line::from(format!("last updated: {}", snapshot.last_updated)));

    for (label, field) in [
        ("Details", &snapshot.details),
        ("Metrics", &snapshot.metrics),
        ("Usage", &snapshot.usage),
        ("Alarms", &snapshot.alarms),
        ("Logs", &snapshot.logs),
    ] {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(label, Style::default().add_modifier(Modifier::BOLD))));
        match field {
            Some(value) => {
                let text = serde_json::to_string_pretty(value).unwrap_or_default();
                for line in text.lines() {
                    lines.push(Line::from(format!("  {line}")));
                }
            }
            None => lines.push(Line::from("  (no data)")),
        }
    }
    lines
}

/// Renders the resource's properties, collapsed to a one-line summary
/// unless `e` has expanded the `"primary"` block for this tab (`spec.md`
/// §4.5 "Property expansion").
fn render_resource_body(model: &Model, tab: &ContentTab) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let Some(resource) = tab.resource_ref.as_deref().and_then(|id| model.find_resource(id)) else {
        for line in tab.body.lines() {
            lines.push(Line::from(line.to_string()));
        }
        return lines;
    };

    lines.push(Line::from(format!("{} [{}]", resource.name, resource.type_tag())));
    lines.push(Line::from(format!("location: {}", resource.location)));
    if let Some(status) = &resource.status {
        lines.push(Line::from(format!("status: {status}")));
    }
    lines.push(Line::from(""));

    match &resource.properties {
        None => lines.push(Line::from("(no properties)")),
        Some(properties) => {
            if tab.is_expanded("primary") {
                lines.push(Line::from("properties [e to collapse]:"));
                let text = serde_json::to_string_pretty(properties).unwrap_or_default();
                for line in text.lines() {
                    lines.push(Line::from(format!("  {line}")));
                }
            } else {
                lines.push(Line::from(format!("{} [e to expand]", summarize_properties(properties))));
            }
        }
    }
    lines
}

/// One-line headline for a collapsed properties block: the first array
/// field's element count if there is one (the common case — agent pools,
/// NSG rules, disks), else a plain key count.
fn summarize_properties(value: &serde_json::Value) -> String {
    let serde_json::Value::Object(map) = value else {
        return "properties".to_string();
    };
    for (key, v) in map {
        if let serde_json::Value::Array(items) = v {
            return format!("{} {}(s)", items.len(), humanize_key(key));
        }
    }
    format!("{} propert{}", map.len(), if map.len() == 1 { "y" } else { "ies" })
}

/// Best-effort camelCase -> "Title Case", singularized by trimming a
/// trailing `s` (`agentPoolProfiles` -> `Agent Pool Profile`).
fn humanize_key(key: &str) -> String {
    let mut out = String::new();
    for (i, ch) in key.chars().enumerate() {
        if ch.is_uppercase() && i > 0 {
            out.push(' ');
        }
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
    }
    out.trim_end_matches('s').to_string()
}

fn welcome_text(model: &Model) -> Vec<Line<'static>> {
    let group_count = model
        .active_subscription()
        .map(|s| model.inventory.groups_for(&s.id).len())
        .unwrap_or(0);
    vec![
        Line::from("Azure-TUI"),
        Line::from(""),
        Line::from(format!("{group_count} resource group(s) loaded.")),
        Line::from("Press ? for help, / to search, Enter to open a resource."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_properties_prefers_first_array_field() {
        let props = serde_json::json!({
            "agentPoolProfiles": [{"name": "pool1"}, {"name": "pool2"}],
            "kubernetesVersion": "1.29",
        });
        assert_eq!(summarize_properties(&props), "2 Agent Pool Profile(s)");
    }

    #[test]
    fn summarize_properties_falls_back_to_key_count() {
        let props = serde_json::json!({"sku": "Standard", "tier": "Premium"});
        assert_eq!(summarize_properties(&props), "2 properties");
    }

    #[test]
    fn humanize_key_splits_camel_case_and_singularizes() {
        assert_eq!(humanize_key("agentPoolProfiles"), "Agent Pool Profile");
    }
}
