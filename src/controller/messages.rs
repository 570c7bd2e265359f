//! The `Msg` taxonomy the reducer consumes (`spec.md` §4.6).
//!
//! Grounded on `engine/dispatch.rs::ProtocolMessage`'s "closed enum of
//! everything that can arrive on the inbox" shape, generalized from
//! "protocol lines from one CLI process" to "every keyboard, resize, tick,
//! and async-completion event the controller can observe".

use crossterm::event::KeyEvent;

use crate::engine::dispatch::ActionOutcome;
use crate::model::dashboard::{DashboardProgress, DashboardSnapshot};
use crate::model::entities::{Resource, ResourceGroup, Subscription};

#[derive(Debug, Clone)]
pub enum Msg {
    // Input (`spec.md` §4.6).
    Key(KeyEvent),
    Resize(u16, u16),
    Tick(std::time::Instant),

    // Async completion.
    SubsLoaded(Result<Vec<Subscription>, String>),
    GroupsLoaded { subscription_id: String, result: Result<Vec<ResourceGroup>, String> },
    GroupChildrenLoaded { subscription_id: String, group_name: String, items: Vec<Resource>, err: Option<String> },
    DashboardProgress(DashboardProgress),
    DashboardLoaded { resource_id: String, snapshot: DashboardSnapshot },
    ActionResult { tab_id: String, resource_id: String, outcome: Result<ActionOutcome, String> },
    AiResponse { tab_id: String, resource_id: String, text: Option<String>, err: Option<String> },
    SearchResults(Vec<usize>),

    // Control.
    OpenPopup(crate::controller::state::PopupKind),
    ClosePopup,
}
