//! The reducer: `(model, msg) -> cmds`, mutating `model` in place rather
//! than returning a fresh copy (`spec.md` §4.6 describes `(model, msg) ->
//! (model', cmds)`; mutating in place is the same contract without cloning
//! the whole aggregate on every keystroke — every mutation still happens
//! here and nowhere else). Grounded on `engine/dispatch.rs::dispatch`'s
//! "one function, one big match over a closed enum" shape.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::actions::ActionKind;
use crate::model::entities::ResourceTypeTag;
use crate::model::inventory::TreeRow;
use crate::model::workspace::{ContentTab, PanelFocus, TabKind, ViewFrame};

use super::commands::Cmd;
use super::messages::Msg;
use super::state::{InFlightAction, Model, PopupKind};

/// Process one message against `model`, returning the commands the runtime
/// should execute. Never blocks; never performs I/O itself (`spec.md` §4.6
/// "Suspension points").
pub fn reduce(model: &mut Model, msg: Msg) -> Vec<Cmd> {
    match msg {
        Msg::Key(key) => reduce_key(model, key),
        Msg::Resize(w, h) => {
            model.terminal_size = (w, h);
            Vec::new()
        }
        Msg::Tick(_) => Vec::new(),

        Msg::SubsLoaded(result) => {
            match result {
                Ok(subs) => {
                    let default_id = model
                        .settings
                        .default_subscription
                        .clone()
                        .or_else(|| subs.iter().find(|s| s.is_default).map(|s| s.id.clone()))
                        .or_else(|| subs.first().map(|s| s.id.clone()));
                    model.inventory.subscriptions = subs;
                    if let Some(id) = default_id {
                        model.inventory.activate_subscription(&id);
                        model.set_status("subscriptions loaded", false);
                        return vec![Cmd::LoadGroups { subscription_id: id }];
                    }
                    model.set_status("no subscriptions found", true);
                }
                Err(e) => {
                    model.set_status(format!("failed to load subscriptions: {e}"), true);
                }
            }
            Vec::new()
        }

        Msg::GroupsLoaded { subscription_id, result } => {
            match result {
                Ok(groups) => {
                    model.inventory.put_groups(&subscription_id, groups);
                    model.set_status("resource groups loaded", false);
                }
                Err(e) => model.set_status(format!("failed to load resource groups: {e}"), true),
            }
            Vec::new()
        }

        Msg::GroupChildrenLoaded { subscription_id, group_name, items, err } => {
            let failed = err.is_some();
            model.inventory.put_group_children(&subscription_id, &group_name, items, err);
            if failed {
                model.set_status(format!("failed to expand {group_name}"), true);
            }
            Vec::new()
        }

        Msg::DashboardProgress(frame) => {
            if model.in_flight_dashboard_id.as_deref() == Some(frame.resource_id.as_str()) {
                model.last_dashboard_progress = Some(frame);
            }
            Vec::new()
        }

        Msg::DashboardLoaded { resource_id, snapshot } => {
            // `spec.md` §4.6/§5: drop stale completions for a resource the
            // user has since navigated away from.
            if model.in_flight_dashboard_id.as_deref() == Some(resource_id.as_str()) {
                model.in_flight_dashboard_id = None;
                model.dashboard_cancel = None;
                model.last_dashboard_snapshot.insert(resource_id.clone(), snapshot);
                model.set_status(format!("dashboard ready for {resource_id}"), false);
            }
            Vec::new()
        }

        Msg::ActionResult { tab_id, resource_id, outcome } => {
            if model.in_flight_action.as_ref().map(|a| a.tab_id == tab_id).unwrap_or(false) {
                model.in_flight_action = None;
            }
            if let Some(tab) = model.workspace.tabs.iter_mut().find(|t| t.id == tab_id) {
                tab.action_in_progress = false;
                match outcome {
                    Ok(outcome) => {
                        tab.body = format_outcome(&outcome);
                        model.set_status(format!("action succeeded for {resource_id}"), false);
                    }
                    Err(e) => {
                        model.set_status(format!("action failed for {resource_id}: {e}"), true);
                    }
                }
            }
            Vec::new()
        }

        Msg::AiResponse { tab_id, resource_id, text, err } => {
            // `spec.md` §9: a second selection during an in-flight analysis
            // drops the stale response rather than writing it into whatever
            // tab happens to be active when it arrives.
            if model.in_flight_ai_tab_id.as_deref() != Some(tab_id.as_str()) {
                return Vec::new();
            }
            model.in_flight_ai_tab_id = None;
            match (text, err) {
                (Some(text), _) => {
                    if let Some(tab) = model.workspace.tabs.iter_mut().find(|t| t.id == tab_id) {
                        tab.body = text;
                    }
                    model.set_status(format!("AI analysis ready for {resource_id}"), false);
                }
                (None, Some(e)) => model.set_status(format!("AI analysis failed: {e}"), true),
                (None, None) => {}
            }
            Vec::new()
        }

        Msg::SearchResults(matches) => {
            model.search.matches = matches;
            model.search.current_match = 0;
            Vec::new()
        }

        Msg::OpenPopup(kind) => {
            push_history(model);
            model.popup = Some(kind);
            model.popup_cursor = 0;
            Vec::new()
        }
        Msg::ClosePopup => {
            model.popup = None;
            Vec::new()
        }
    }
}

fn format_outcome(outcome: &crate::engine::dispatch::ActionOutcome) -> String {
    use crate::engine::dispatch::ActionOutcome;
    match outcome {
        ActionOutcome::Text(t) => t.clone(),
        ActionOutcome::Json(v) => serde_json::to_string_pretty(v).unwrap_or_default(),
        ActionOutcome::Done => "done".to_string(),
    }
}

fn push_history(model: &mut Model) {
    let (name, scroll_offset) = match model.workspace.active() {
        Some(tab) => (tab.title.clone(), tab.scroll_offset),
        None => ("welcome".to_string(), 0),
    };
    model.history.push(ViewFrame { name, scroll_offset });
}

fn reduce_key(model: &mut Model, key: KeyEvent) -> Vec<Cmd> {
    // `spec.md` §8 property 5: keys during an in-flight action on the
    // active tab are rejected except for the notice.
    if model.action_in_progress_for_active_tab() && !matches!(key.code, KeyCode::Esc) {
        model.set_status("an action is already in progress for this tab", true);
        return Vec::new();
    }

    if model.search.active {
        return reduce_search_key(model, key);
    }

    if model.popup.is_some() {
        return reduce_popup_key(model, key);
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            if let Some(cancel) = model.dashboard_cancel.take() {
                cancel.cancel();
            }
            model.should_quit = true;
            Vec::new()
        }
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => move_cursor(model, 1),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => move_cursor(model, -1),
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => {
            model.panel_focus = PanelFocus::Tree;
            Vec::new()
        }
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => {
            model.panel_focus = PanelFocus::Details;
            Vec::new()
        }
        (KeyCode::Tab, KeyModifiers::NONE) => {
            model.workspace.cycle_next();
            Vec::new()
        }
        (KeyCode::BackTab, _) => {
            model.workspace.cycle_prev();
            Vec::new()
        }
        (KeyCode::Esc, _) => {
            if let Some(frame) = model.history.pop() {
                if let Some(tab) = model.workspace.active_mut() {
                    tab.scroll_offset = frame.scroll_offset;
                }
            } else if let Some(tab) = model.workspace.active_mut() {
                tab.scroll_offset = 0;
            }
            model.popup = None;
            Vec::new()
        }
        (KeyCode::Char('/'), _) => {
            model.search.enter();
            Vec::new()
        }
        (KeyCode::Char('?'), _) => {
            push_history(model);
            model.popup = Some(PopupKind::Help);
            Vec::new()
        }
        (KeyCode::Char('e'), KeyModifiers::NONE) if model.panel_focus == PanelFocus::Details => {
            if let Some(tab) = model.workspace.active_mut() {
                tab.toggle_block("primary");
            }
            Vec::new()
        }
        (KeyCode::Char('D'), _) => start_dashboard(model),
        (KeyCode::Char('M'), _) => dispatch_lifecycle(model, ActionKind::MetricsDashboard),
        (KeyCode::Char('E'), _) => {
            if let Some(resource) = current_resource(model) {
                push_history(model);
                model.popup = Some(PopupKind::ResourceEditor { resource_id: resource.id.clone() });
            } else {
                model.set_status("no resource selected", true);
            }
            Vec::new()
        }
        (KeyCode::Char('a'), KeyModifiers::NONE) => start_ai_analysis(model),
        // `spec.md` §4.4 key table: "s/S/r | Start / Stop / Restart (VM, AKS)"
        // — AKS has no restart primitive of its own (`spec.md` §4.4's AKS
        // action list), so only Start/Stop redirect to the cluster variants.
        (KeyCode::Char('s'), KeyModifiers::NONE) => dispatch_aks_or(model, ActionKind::StartCluster, ActionKind::Start),
        (KeyCode::Char('S'), _) => dispatch_aks_or(model, ActionKind::StopCluster, ActionKind::Stop),
        (KeyCode::Char('r'), KeyModifiers::NONE) => dispatch_lifecycle(model, ActionKind::Restart),
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
            // `spec.md` §4.4: destructive actions require a confirmation popup.
            confirm_destructive(model, ActionKind::Delete, "Delete")
        }
        (KeyCode::Char('x'), KeyModifiers::CONTROL) => {
            // `spec.md` §4.4: "Ctrl+X | Storage delete" — only meaningful on
            // a storage account; deletes the container smuggled into
            // `properties.container` the same way `ListBlobs` reads it.
            match current_resource(model).map(|r| r.type_tag()) {
                Some(ResourceTypeTag::Storage) => confirm_destructive(model, ActionKind::DeleteContainer, "Delete Container"),
                Some(_) => {
                    model.set_status("Ctrl+X only applies to storage resources", true);
                    Vec::new()
                }
                None => {
                    model.set_status("no resource selected", true);
                    Vec::new()
                }
            }
        }
        // `spec.md` §9 open question: T/B overlap by context — resource-type
        // specific binding wins (decided in DESIGN.md).
        (KeyCode::Char('T'), KeyModifiers::NONE) => dispatch_context_sensitive(model, ActionKind::ListContainers, ActionKind::GenerateTerraform),
        (KeyCode::Char('B'), _) => dispatch_context_sensitive(model, ActionKind::ListBlobs, ActionKind::GenerateBicep),
        (KeyCode::Char('O'), _) => start_cost_optimization(model),
        (KeyCode::Char('R'), _) => {
            if let Some(resource) = current_resource(model) {
                push_history(model);
                model.popup = Some(PopupKind::ActionMenu { resource_id: resource.id.clone() });
            }
            Vec::new()
        }
        (KeyCode::Char('t'), KeyModifiers::CONTROL) => {
            push_history(model);
            model.popup = Some(PopupKind::IacManager);
            Vec::new()
        }
        (KeyCode::Char('o'), KeyModifiers::CONTROL) => {
            push_history(model);
            model.popup = Some(PopupKind::DevOpsManager);
            Vec::new()
        }
        (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
            push_history(model);
            model.popup = Some(PopupKind::SubscriptionSwitcher);
            model.popup_cursor = model
                .inventory
                .subscriptions
                .iter()
                .position(|s| Some(s.id.as_str()) == model.inventory.active_subscription_id.as_deref())
                .unwrap_or(0);
            Vec::new()
        }
        (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
            model.workspace.close_active();
            Vec::new()
        }
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => {
            // `spec.md` §4.4/§4.5: an explicit refresh re-fetches even when
            // the cache already holds a loaded entry.
            let Some(sub) = model.active_subscription() else {
                model.set_status("no active subscription", true);
                return Vec::new();
            };
            let subscription_id = sub.id.clone();
            model.set_status("refreshing resource groups...", false);
            vec![Cmd::LoadGroups { subscription_id }]
        }
        (KeyCode::Char(' '), _) => {
            // Expand/collapse tree node — `spec.md` §4.5. Fetch is
            // scheduled only if the cache has no loaded entry yet.
            toggle_tree_expansion(model)
        }
        (KeyCode::Enter, _) => open_selected_resource(model),
        _ => Vec::new(),
    }
}

fn move_cursor(model: &mut Model, delta: i64) -> Vec<Cmd> {
    match model.panel_focus {
        PanelFocus::Tree => {
            let row_count = model
                .active_subscription()
                .map(|sub| model.inventory.visible_rows(&sub.id).len())
                .unwrap_or(0);
            if row_count == 0 {
                return Vec::new();
            }
            let new_cursor = (model.tree_cursor as i64 + delta).clamp(0, row_count as i64 - 1);
            model.tree_cursor = new_cursor as usize;
            // `spec.md` §6 `AUTO_AI=true`: trigger analysis on each selection
            // rather than waiting for the `a` key.
            if model.settings.auto_ai {
                if let Some(resource) = resource_at_tree_cursor(model) {
                    return start_ai_analysis_for(model, &resource);
                }
            }
            Vec::new()
        }
        PanelFocus::Details => {
            if let Some(tab) = model.workspace.active_mut() {
                let new_offset = tab.scroll_offset as i64 + delta;
                tab.scroll_offset = new_offset.max(0) as u16;
            }
            Vec::new()
        }
    }
}

/// Resolves the row the tree cursor currently points at for the active
/// subscription, if any (`spec.md` §4.5 "Tree cursor").
fn tree_row_at_cursor(model: &Model) -> Option<TreeRow> {
    let sub = model.active_subscription()?;
    model.inventory.visible_rows(&sub.id).get(model.tree_cursor).copied()
}

/// The resource the tree cursor is currently on top of, if the row at the
/// cursor is a resource row (`spec.md` §4.5).
fn resource_at_tree_cursor(model: &Model) -> Option<crate::model::entities::Resource> {
    let TreeRow::Resource { group_index, resource_index } = tree_row_at_cursor(model)? else { return None };
    let sub = model.active_subscription()?;
    let group = model.groups_for_active_subscription().get(group_index)?;
    model
        .inventory
        .expansion(&sub.id, &group.name)?
        .children
        .get(resource_index)
        .cloned()
}

fn current_resource(model: &Model) -> Option<crate::model::entities::Resource> {
    model
        .workspace
        .active()
        .and_then(|tab| tab.resource_ref.as_ref())
        .and_then(|id| model.find_resource(id))
        .cloned()
}

fn dispatch_lifecycle(model: &mut Model, kind: ActionKind) -> Vec<Cmd> {
    let Some(resource) = current_resource(model) else {
        model.set_status("no resource selected", true);
        return Vec::new();
    };
    let tag = resource.type_tag();
    if !crate::model::actions::action_applies(tag, kind) {
        model.set_status(format!("{kind} does not apply to this resource"), true);
        return Vec::new();
    }
    let Some(tab) = model.workspace.active_mut() else {
        return Vec::new();
    };
    tab.action_in_progress = true;
    let tab_id = tab.id.clone();
    model.in_flight_action = Some(InFlightAction { tab_id: tab_id.clone(), resource_id: resource.id.clone(), started_at: std::time::Instant::now() });
    vec![Cmd::RunAction { tab_id, resource: Box::new(resource), kind }]
}

fn confirm_destructive(model: &mut Model, kind: ActionKind, action_label: &'static str) -> Vec<Cmd> {
    if let Some(resource) = current_resource(model) {
        push_history(model);
        model.popup = Some(PopupKind::ConfirmDestructive {
            resource_id: resource.id.clone(),
            resource_name: resource.name.clone(),
            action_label,
            kind,
        });
    } else {
        model.set_status("no resource selected", true);
    }
    Vec::new()
}

fn dispatch_context_sensitive(model: &mut Model, storage_kind: ActionKind, other_kind: ActionKind) -> Vec<Cmd> {
    let tag = current_resource(model).map(|r| r.type_tag());
    match tag {
        Some(ResourceTypeTag::Storage) => dispatch_lifecycle(model, storage_kind),
        _ => dispatch_lifecycle(model, other_kind),
    }
}

/// Like `dispatch_context_sensitive`, but keyed off `ResourceTypeTag::Aks`
/// rather than `Storage` — shared by the `s`/`S` lifecycle keys, which mean
/// `StartCluster`/`StopCluster` on an AKS cluster and `Start`/`Stop`
/// everywhere else (`spec.md` §4.4 key table).
fn dispatch_aks_or(model: &mut Model, aks_kind: ActionKind, other_kind: ActionKind) -> Vec<Cmd> {
    let tag = current_resource(model).map(|r| r.type_tag());
    match tag {
        Some(ResourceTypeTag::Aks) => dispatch_lifecycle(model, aks_kind),
        _ => dispatch_lifecycle(model, other_kind),
    }
}

fn start_dashboard(model: &mut Model) -> Vec<Cmd> {
    let Some(resource) = current_resource(model) else {
        model.set_status("no resource selected", true);
        return Vec::new();
    };
    let Some(sub) = model.active_subscription() else {
        model.set_status("no active subscription", true);
        return Vec::new();
    };
    let resource_id = resource.id.clone();
    let subscription_id = sub.id.clone();
    if let Some(previous) = model.dashboard_cancel.take() {
        previous.cancel();
    }
    let cancel = tokio_util::sync::CancellationToken::new();
    model.dashboard_cancel = Some(cancel.clone());
    model.in_flight_dashboard_id = Some(resource_id.clone());
    push_history(model);
    let mut tab = ContentTab::new(format!("dash-{resource_id}"), format!("Dashboard: {}", resource.name), TabKind::Dashboard);
    tab.resource_ref = Some(resource_id.clone());
    model.workspace.open_or_focus(tab);
    vec![Cmd::RunDashboard { resource_id, subscription_id, cancel }]
}

fn start_ai_analysis(model: &mut Model) -> Vec<Cmd> {
    let Some(resource) = current_resource(model) else {
        model.set_status("no resource selected", true);
        return Vec::new();
    };
    start_ai_analysis_for(model, &resource)
}

fn start_ai_analysis_for(model: &mut Model, resource: &crate::model::entities::Resource) -> Vec<Cmd> {
    let Some(client) = model.llm.clone() else {
        model.set_status("AI features disabled: no provider credentials configured", true);
        return Vec::new();
    };
    let context = resource.raw_json.as_ref().map(|v| v.to_string()).unwrap_or_default();
    let prompt = format!("Describe {} ({})", resource.name, resource.type_name);
    let tab_id = open_ai_tab(model, &resource.id, &resource.name);
    vec![Cmd::RunAi {
        client,
        tab_id,
        resource_id: resource.id.clone(),
        prompt,
        context,
    }]
}

fn start_cost_optimization(model: &mut Model) -> Vec<Cmd> {
    // `spec.md` §1/§4.4: cost/security commentary is an LLM capability, not
    // a provider-CLI action, so it routes through `Cmd::RunAi` like `a`
    // rather than through `engine::dispatch`.
    let Some(resource) = current_resource(model) else {
        model.set_status("no resource selected", true);
        return Vec::new();
    };
    let Some(client) = model.llm.clone() else {
        model.set_status("AI features disabled: no provider credentials configured", true);
        return Vec::new();
    };
    let context = resource.raw_json.as_ref().map(|v| v.to_string()).unwrap_or_default();
    let prompt = format!("Cost and security optimisation review for {} ({})", resource.name, resource.type_name);
    let tab_id = open_ai_tab(model, &resource.id.clone(), &resource.name.clone());
    vec![Cmd::RunAi {
        client,
        tab_id,
        resource_id: resource.id.clone(),
        prompt,
        context,
    }]
}

/// Opens (or refocuses) the AI-analysis tab for `resource_id`, records it as
/// the in-flight tab so a later stale `Msg::AiResponse` can be dropped, and
/// returns its id. A second request while one is in flight retargets the
/// tracker onto the newer tab, so only the latest response is accepted
/// (`spec.md` §9: "this spec says drop the stale response").
fn open_ai_tab(model: &mut Model, resource_id: &str, resource_name: &str) -> String {
    push_history(model);
    let mut tab = ContentTab::new(format!("ai-{resource_id}"), format!("AI: {resource_name}"), TabKind::AiAnalysis);
    tab.resource_ref = Some(resource_id.to_string());
    tab.body = "analyzing...".to_string();
    let idx = model.workspace.open_or_focus(tab);
    let tab_id = model.workspace.tabs[idx].id.clone();
    model.in_flight_ai_tab_id = Some(tab_id.clone());
    tab_id
}

fn toggle_tree_expansion(model: &mut Model) -> Vec<Cmd> {
    let Some(sub) = model.active_subscription().cloned() else {
        return Vec::new();
    };
    let Some(TreeRow::Group(group_index)) = tree_row_at_cursor(model) else {
        return Vec::new();
    };
    let Some(group) = model.groups_for_active_subscription().get(group_index).cloned() else {
        return Vec::new();
    };
    let needs_fetch = model.inventory.toggle_expansion(&sub.id, &group.name);
    if needs_fetch {
        model.inventory.mark_group_loading(&sub.id, &group.name);
        vec![Cmd::LoadGroupChildren { subscription_id: sub.id, group_name: group.name }]
    } else {
        Vec::new()
    }
}

fn open_selected_resource(model: &mut Model) -> Vec<Cmd> {
    let Some(resource) = resource_at_tree_cursor(model) else {
        return Vec::new();
    };
    push_history(model);
    let mut tab = ContentTab::new(format!("res-{}", resource.id), resource.name.clone(), TabKind::ResourceDetails);
    tab.resource_ref = Some(resource.id.clone());
    tab.body = resource.raw_json.as_ref().map(|v| serde_json::to_string_pretty(v).unwrap_or_default()).unwrap_or_default();
    model.workspace.open_or_focus(tab);
    Vec::new()
}

fn reduce_search_key(model: &mut Model, key: KeyEvent) -> Vec<Cmd> {
    match key.code {
        KeyCode::Esc => {
            model.search.exit();
        }
        KeyCode::Enter => {
            model.search.active = false;
        }
        KeyCode::Down => model.search.next_match(),
        KeyCode::Up => model.search.prev_match(),
        KeyCode::Backspace => model.search.backspace(),
        KeyCode::Char(c) => model.search.push_char(c),
        _ => {}
    }
    Vec::new()
}

fn reduce_popup_key(model: &mut Model, key: KeyEvent) -> Vec<Cmd> {
    if matches!(model.popup, Some(PopupKind::SubscriptionSwitcher)) {
        return reduce_subscription_switcher_key(model, key);
    }

    match key.code {
        KeyCode::Esc => {
            model.popup = None;
        }
        KeyCode::Enter => {
            if let Some(PopupKind::ConfirmDestructive { resource_id, kind, .. }) = &model.popup {
                let resource_id = resource_id.clone();
                let kind = *kind;
                model.popup = None;
                if let Some(resource) = model.find_resource(&resource_id).cloned() {
                    return dispatch_lifecycle_for(model, resource, kind);
                }
            }
        }
        _ => {}
    }
    Vec::new()
}

/// `spec.md` §4.7: "Subscription switcher ... on selection, issues
/// `activateSubscription` and reloads groups" — `j`/`k` moves the
/// highlighted row, `Enter` activates it.
fn reduce_subscription_switcher_key(model: &mut Model, key: KeyEvent) -> Vec<Cmd> {
    let len = model.inventory.subscriptions.len();
    match key.code {
        KeyCode::Esc => {
            model.popup = None;
        }
        KeyCode::Char('j') | KeyCode::Down if len > 0 => {
            model.popup_cursor = (model.popup_cursor + 1) % len;
        }
        KeyCode::Char('k') | KeyCode::Up if len > 0 => {
            model.popup_cursor = if model.popup_cursor == 0 { len - 1 } else { model.popup_cursor - 1 };
        }
        KeyCode::Enter => {
            let Some(sub) = model.inventory.subscriptions.get(model.popup_cursor).cloned() else {
                model.popup = None;
                return Vec::new();
            };
            model.popup = None;
            model.inventory.activate_subscription(&sub.id);
            model.tree_cursor = 0;
            model.set_status(format!("switched to {}", sub.name), false);
            return vec![Cmd::LoadGroups { subscription_id: sub.id }];
        }
        _ => {}
    }
    Vec::new()
}

fn dispatch_lifecycle_for(model: &mut Model, resource: crate::model::entities::Resource, kind: ActionKind) -> Vec<Cmd> {
    let Some(tab) = model.workspace.active_mut() else {
        return Vec::new();
    };
    tab.action_in_progress = true;
    let tab_id = tab.id.clone();
    model.in_flight_action = Some(InFlightAction { tab_id: tab_id.clone(), resource_id: resource.id.clone(), started_at: std::time::Instant::now() });
    vec![Cmd::RunAction { tab_id, resource: Box::new(resource), kind }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::model::entities::{Resource, ResourceGroup, Subscription};

    fn test_model() -> Model {
        let settings = Settings::load(None, true, false);
        let mut model = Model::new(settings);
        model.inventory.subscriptions.push(Subscription {
            id: "sub1".into(),
            name: "Sub One".into(),
            tenant_id: "tenant1".into(),
            is_default: true,
        });
        model.inventory.activate_subscription("sub1");
        model.inventory.put_groups(
            "sub1",
            vec![
                ResourceGroup { name: "rg1".into(), location: "eastus".into(), subscription_id: "sub1".into() },
                ResourceGroup { name: "rg2".into(), location: "eastus".into(), subscription_id: "sub1".into() },
            ],
        );
        model
    }

    fn res(id: &str, name: &str) -> Resource {
        Resource {
            id: id.into(),
            name: name.into(),
            type_name: "Microsoft.Compute/virtualMachines".into(),
            location: "eastus".into(),
            group: "rg1".into(),
            status: None,
            tags: None,
            properties: None,
            raw_json: None,
        }
    }

    #[test]
    fn move_cursor_clamps_to_visible_row_count() {
        let mut model = test_model();
        // rows: header, rg1, rg2 — 3 rows, indices 0..=2.
        move_cursor(&mut model, -5);
        assert_eq!(model.tree_cursor, 0);
        move_cursor(&mut model, 100);
        assert_eq!(model.tree_cursor, 2);
    }

    #[test]
    fn enter_opens_the_resource_under_the_cursor_not_the_active_tab() {
        let mut model = test_model();
        model.inventory.put_group_children("sub1", "rg1", vec![res("r1", "vm1"), res("r2", "vm2")], None);
        // rows: header(0), rg1(1), vm1(2), vm2(3), rg2(4).
        model.tree_cursor = 3;
        open_selected_resource(&mut model);
        let tab = model.workspace.active().expect("a tab should have opened");
        assert_eq!(tab.resource_ref.as_deref(), Some("r2"));
    }

    #[test]
    fn space_expands_the_group_under_the_cursor_after_a_sibling_group_has_resources() {
        let mut model = test_model();
        model.inventory.toggle_expansion("sub1", "rg1");
        model.inventory.put_group_children("sub1", "rg1", vec![res("r1", "vm1")], None);
        // rows: header(0), rg1(1), vm1(2), rg2(3).
        model.tree_cursor = 3;
        toggle_tree_expansion(&mut model);
        assert!(model.inventory.expansion("sub1", "rg2").is_some());
        assert!(model.inventory.expansion("sub1", "rg1").unwrap().loaded);
    }

    #[test]
    fn space_collapses_an_expanded_loaded_group_instead_of_no_op() {
        let mut model = test_model();
        model.inventory.toggle_expansion("sub1", "rg1");
        model.inventory.put_group_children("sub1", "rg1", vec![res("r1", "vm1")], None);
        model.tree_cursor = 1;
        // Pressing Space again on the already-loaded, expanded group must
        // collapse it rather than no-op (`spec.md` §4.5).
        toggle_tree_expansion(&mut model);
        assert!(!model.inventory.expansion("sub1", "rg1").unwrap().expanded);
        let sub_id = model.active_subscription().unwrap().id.clone();
        assert_eq!(model.inventory.visible_rows(&sub_id).len(), 3);
    }

    #[test]
    fn stale_ai_response_for_a_superseded_tab_is_dropped() {
        let mut model = test_model();
        model.in_flight_ai_tab_id = Some("ai-current".to_string());
        model.workspace.open_or_focus(ContentTab::new("ai-stale", "AI: old", TabKind::AiAnalysis));
        reduce(
            &mut model,
            Msg::AiResponse {
                tab_id: "ai-stale".to_string(),
                resource_id: "r1".to_string(),
                text: Some("stale analysis".to_string()),
                err: None,
            },
        );
        let tab = model.workspace.tabs.iter().find(|t| t.id == "ai-stale").unwrap();
        assert_ne!(tab.body, "stale analysis");
        assert_eq!(model.in_flight_ai_tab_id.as_deref(), Some("ai-current"));
    }

    #[test]
    fn matching_ai_response_is_written_and_clears_in_flight() {
        let mut model = test_model();
        model.in_flight_ai_tab_id = Some("ai-current".to_string());
        model.workspace.open_or_focus(ContentTab::new("ai-current", "AI: vm1", TabKind::AiAnalysis));
        reduce(
            &mut model,
            Msg::AiResponse {
                tab_id: "ai-current".to_string(),
                resource_id: "r1".to_string(),
                text: Some("fresh analysis".to_string()),
                err: None,
            },
        );
        let tab = model.workspace.tabs.iter().find(|t| t.id == "ai-current").unwrap();
        assert_eq!(tab.body, "fresh analysis");
        assert!(model.in_flight_ai_tab_id.is_none());
    }

    fn aks_res(id: &str, name: &str) -> Resource {
        Resource {
            id: id.into(),
            name: name.into(),
            type_name: "Microsoft.ContainerService/managedClusters".into(),
            location: "eastus".into(),
            group: "rg1".into(),
            status: None,
            tags: None,
            properties: None,
            raw_json: None,
        }
    }

    #[test]
    fn s_key_on_aks_resource_maps_to_start_cluster() {
        let mut model = test_model();
        model.inventory.put_group_children("sub1", "rg1", vec![aks_res("aks1", "cluster1")], None);
        let mut tab = ContentTab::new("res-aks1", "cluster1", TabKind::ResourceDetails);
        tab.resource_ref = Some("aks1".to_string());
        model.workspace.open_or_focus(tab);

        let cmds = dispatch_aks_or(&mut model, ActionKind::StartCluster, ActionKind::Start);
        assert_eq!(cmds.len(), 1);
        assert!(matches!(&cmds[0], Cmd::RunAction { kind: ActionKind::StartCluster, .. }));
    }

    #[test]
    fn s_key_on_vm_resource_maps_to_start() {
        let mut model = test_model();
        model.inventory.put_group_children("sub1", "rg1", vec![res("r1", "vm1")], None);
        let mut tab = ContentTab::new("res-r1", "vm1", TabKind::ResourceDetails);
        tab.resource_ref = Some("r1".to_string());
        model.workspace.open_or_focus(tab);

        let cmds = dispatch_aks_or(&mut model, ActionKind::StartCluster, ActionKind::Start);
        assert_eq!(cmds.len(), 1);
        assert!(matches!(&cmds[0], Cmd::RunAction { kind: ActionKind::Start, .. }));
    }

    #[test]
    fn subscription_switcher_enter_activates_highlighted_subscription_and_reloads_groups() {
        let mut model = test_model();
        model.inventory.subscriptions.push(Subscription {
            id: "sub2".into(),
            name: "Sub Two".into(),
            tenant_id: "tenant1".into(),
            is_default: false,
        });
        model.popup = Some(PopupKind::SubscriptionSwitcher);
        model.popup_cursor = 0;

        reduce_subscription_switcher_key(&mut model, KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        assert_eq!(model.popup_cursor, 1);

        let cmds = reduce_subscription_switcher_key(&mut model, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(model.popup.is_none());
        assert_eq!(model.inventory.active_subscription_id.as_deref(), Some("sub2"));
        assert!(matches!(&cmds[0], Cmd::LoadGroups { subscription_id } if subscription_id == "sub2"));
    }
}
