//! C6 model — the single aggregate struct holding all UI state
//! (`spec.md` §4.6: "A single aggregate struct holding every piece of UI
//! state"). Owned exclusively by the reducer; background tasks never touch
//! it directly (`spec.md` §5).

use std::collections::HashMap;
use std::sync::Arc;

use crate::adapters::llm::LlmClient;
use crate::config::Settings;
use crate::model::actions::ActionKind;
use crate::model::dashboard::{DashboardProgress, DashboardSnapshot};
use crate::model::entities::{Resource, ResourceGroup, Subscription, Tenant};
use crate::model::inventory::Inventory;
use crate::model::workspace::{NavigationHistory, PanelFocus, SearchState, Workspace};

/// Descriptor for the currently-open modal popup, if any (`spec.md` §4.4,
/// §4.7: IaC manager, DevOps manager, subscription switcher, confirmation,
/// help, action menu — all driven by the same reducer).
#[derive(Debug, Clone)]
pub enum PopupKind {
    Help,
    ActionMenu { resource_id: String },
    ConfirmDestructive { resource_id: String, resource_name: String, action_label: &'static str, kind: ActionKind },
    SubscriptionSwitcher,
    IacManager,
    DevOpsManager,
    ResourceEditor { resource_id: String },
}

#[derive(Debug, Clone)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

/// One in-flight action on a tab (`spec.md` §3: "At most one async action
/// is in flight per tab at a time").
#[derive(Debug, Clone)]
pub struct InFlightAction {
    pub tab_id: String,
    pub resource_id: String,
    pub started_at: std::time::Instant,
}

pub struct Model {
    pub tenants: Vec<Tenant>,
    pub inventory: Inventory,
    pub workspace: Workspace,
    pub history: NavigationHistory,
    pub search: SearchState,
    pub panel_focus: PanelFocus,
    pub tree_cursor: usize,
    pub popup: Option<PopupKind>,
    /// Selection cursor within the active popup, e.g. the highlighted row
    /// in the subscription switcher (`spec.md` §4.7). Reset whenever a
    /// popup is opened.
    pub popup_cursor: usize,
    pub status: Option<StatusLine>,
    pub in_flight_action: Option<InFlightAction>,
    /// Matches `spec.md` §4.6/§5's `inFlightDashboardId`: the resource a
    /// dashboard aggregation is currently running for, used to drop stale
    /// completions after the user navigates away.
    pub in_flight_dashboard_id: Option<String>,
    /// Cancellation handle for the in-flight dashboard aggregation, if any
    /// (`spec.md` §4.6: "implementations may add one for resource hygiene").
    pub dashboard_cancel: Option<tokio_util::sync::CancellationToken>,
    pub last_dashboard_progress: Option<DashboardProgress>,
    pub last_dashboard_snapshot: HashMap<String, DashboardSnapshot>,
    /// The tab an AI request was issued for, if one is in flight
    /// (`spec.md` §9: "Automatic-AI mode... this spec says drop the stale
    /// response"). A response whose tab no longer matches is dropped rather
    /// than written into whatever tab happens to be active when it arrives.
    pub in_flight_ai_tab_id: Option<String>,
    pub demo_mode: bool,
    pub settings: Settings,
    pub should_quit: bool,
    pub terminal_size: (u16, u16),
    /// Resolved once at startup from settings/credentials; `None` when no
    /// provider is configured (`spec.md` §4.7: "else AI features are
    /// disabled").
    pub llm: Option<Arc<LlmClient>>,
}

impl Model {
    pub fn new(settings: Settings) -> Self {
        Model {
            tenants: Vec::new(),
            inventory: Inventory::new(),
            workspace: Workspace::default(),
            history: NavigationHistory::new(settings.history_depth),
            search: SearchState::default(),
            panel_focus: PanelFocus::Tree,
            tree_cursor: 0,
            popup: None,
            popup_cursor: 0,
            status: None,
            in_flight_action: None,
            in_flight_dashboard_id: None,
            dashboard_cancel: None,
            last_dashboard_progress: None,
            last_dashboard_snapshot: HashMap::new(),
            in_flight_ai_tab_id: None,
            demo_mode: settings.demo_mode,
            settings,
            should_quit: false,
            terminal_size: (80, 24),
            llm: None,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(StatusLine { text: text.into(), is_error });
    }

    pub fn active_subscription(&self) -> Option<&Subscription> {
        self.inventory
            .active_subscription_id
            .as_ref()
            .and_then(|id| self.inventory.subscriptions.iter().find(|s| &s.id == id))
    }

    pub fn groups_for_active_subscription(&self) -> &[ResourceGroup] {
        self.inventory
            .active_subscription_id
            .as_ref()
            .map(|id| self.inventory.groups_for(id))
            .unwrap_or(&[])
    }

    pub fn find_resource(&self, id_or_name: &str) -> Option<&Resource> {
        self.inventory.find(id_or_name)
    }

    /// `spec.md` §3 invariant: no key is processed into a mutation while an
    /// action is in flight for the active tab, except the rejection notice.
    pub fn action_in_progress_for_active_tab(&self) -> bool {
        let Some(active) = self.workspace.active() else { return false };
        self.in_flight_action.as_ref().map(|a| a.tab_id == active.id).unwrap_or(false)
    }
}
