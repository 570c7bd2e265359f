//! C5 data — navigation, workspace, and search state (`spec.md` §3, §4.5).

use std::collections::VecDeque;

/// `spec.md` §4.5: "At most one active panel (Tree | Details)".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    Tree,
    Details,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabKind {
    Welcome,
    ResourceDetails,
    Dashboard,
    ContainerList,
    BlobList,
    IacOutput,
    DevOpsOutput,
    AiAnalysis,
    Help,
}

/// One of possibly many open resource detail panes (`spec.md` §3 glossary:
/// "Content tab").
#[derive(Debug, Clone)]
pub struct ContentTab {
    pub id: String,
    pub title: String,
    pub kind: TabKind,
    pub body: String,
    pub resource_ref: Option<String>,
    pub scroll_offset: u16,
    /// `spec.md` §3: "At most one async action is in flight per tab".
    pub action_in_progress: bool,
    /// Stable-key -> expanded flag for collapsible Details blocks
    /// (`spec.md` §4.5 "Property expansion").
    pub expanded_blocks: std::collections::HashSet<String>,
}

impl ContentTab {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: TabKind) -> Self {
        ContentTab {
            id: id.into(),
            title: title.into(),
            kind,
            body: String::new(),
            resource_ref: None,
            scroll_offset: 0,
            action_in_progress: false,
            expanded_blocks: std::collections::HashSet::new(),
        }
    }

    /// Toggles a property-expansion flag addressed by a stable key
    /// (`spec.md` §4.5).
    pub fn toggle_block(&mut self, key: &str) {
        if !self.expanded_blocks.remove(key) {
            self.expanded_blocks.insert(key.to_string());
        }
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded_blocks.contains(key)
    }
}

/// A pushed navigation frame (`spec.md` §3, glossary: "Deep navigation").
#[derive(Debug, Clone)]
pub struct ViewFrame {
    pub name: String,
    pub scroll_offset: u16,
}

/// Bounded history stack; oldest entries drop silently past the cap
/// (`spec.md` §3: "NavigationHistory has a maximum depth ... oldest
/// entries drop silently").
#[derive(Debug)]
pub struct NavigationHistory {
    frames: VecDeque<ViewFrame>,
    max_depth: usize,
}

impl NavigationHistory {
    pub fn new(max_depth: usize) -> Self {
        NavigationHistory {
            frames: VecDeque::with_capacity(max_depth.min(256)),
            max_depth,
        }
    }

    pub fn push(&mut self, frame: ViewFrame) {
        if self.frames.len() >= self.max_depth {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    pub fn pop(&mut self) -> Option<ViewFrame> {
        self.frames.pop_back()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

/// Ordered tab collection with an active index (`spec.md` §4.5 "Tabs").
#[derive(Debug, Default)]
pub struct Workspace {
    pub tabs: Vec<ContentTab>,
    pub active_index: Option<usize>,
}

impl Workspace {
    /// Opening a resource whose id already has a tab refocuses that tab
    /// rather than creating a duplicate (`spec.md` §8 property 4).
    pub fn open_or_focus(&mut self, tab: ContentTab) -> usize {
        if let Some(resource_ref) = tab.resource_ref.clone() {
            if let Some(idx) = self
                .tabs
                .iter()
                .position(|t| t.resource_ref.as_deref() == Some(resource_ref.as_str()) && t.kind == tab.kind)
            {
                self.active_index = Some(idx);
                return idx;
            }
        }
        self.tabs.push(tab);
        let idx = self.tabs.len() - 1;
        self.active_index = Some(idx);
        idx
    }

    /// Closing a tab selects the neighbour (right if available, else left);
    /// closing the last tab returns to welcome (`spec.md` §4.5).
    pub fn close(&mut self, idx: usize) {
        if idx >= self.tabs.len() {
            return;
        }
        self.tabs.remove(idx);
        if self.tabs.is_empty() {
            self.active_index = None;
            return;
        }
        let new_idx = if idx < self.tabs.len() { idx } else { idx - 1 };
        self.active_index = Some(new_idx);
    }

    pub fn close_active(&mut self) {
        if let Some(idx) = self.active_index {
            self.close(idx);
        }
    }

    pub fn cycle_next(&mut self) {
        if self.tabs.is_empty() {
            return;
        }
        let next = match self.active_index {
            Some(i) => (i + 1) % self.tabs.len(),
            None => 0,
        };
        self.active_index = Some(next);
    }

    pub fn cycle_prev(&mut self) {
        if self.tabs.is_empty() {
            return;
        }
        let prev = match self.active_index {
            Some(0) | None => self.tabs.len() - 1,
            Some(i) => i - 1,
        };
        self.active_index = Some(prev);
    }

    pub fn active(&self) -> Option<&ContentTab> {
        self.active_index.and_then(|i| self.tabs.get(i))
    }

    pub fn active_mut(&mut self) -> Option<&mut ContentTab> {
        self.active_index.and_then(move |i| self.tabs.get_mut(i))
    }
}

/// Search-overlay state (`spec.md` §4.5 "Search overlay").
#[derive(Debug, Default)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
    pub matches: Vec<usize>,
    pub current_match: usize,
}

impl SearchState {
    pub fn enter(&mut self) {
        self.active = true;
        self.query.clear();
        self.matches.clear();
        self.current_match = 0;
    }

    pub fn exit(&mut self) {
        self.active = false;
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn backspace(&mut self) {
        self.query.pop();
    }

    pub fn next_match(&mut self) {
        if !self.matches.is_empty() {
            self.current_match = (self.current_match + 1) % self.matches.len();
        }
    }

    pub fn prev_match(&mut self) {
        if !self.matches.is_empty() {
            self.current_match = if self.current_match == 0 {
                self.matches.len() - 1
            } else {
                self.current_match - 1
            };
        }
    }
}

/// Simple substring/wildcard (`*`/`?`) matching across resource fields
/// (`spec.md` §4.5).
pub fn query_matches(query: &str, haystacks: &[&str]) -> bool {
    if query.is_empty() {
        return false;
    }
    let pattern = wildcard_to_regex(query);
    haystacks.iter().any(|h| pattern.is_match(&h.to_lowercase()))
}

fn wildcard_to_regex(query: &str) -> regex::Regex {
    let mut escaped = regex::escape(&query.to_lowercase());
    escaped = escaped.replace(r"\*", ".*").replace(r"\?", ".");
    regex::Regex::new(&escaped).unwrap_or_else(|_| regex::Regex::new("$^").unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_drops_oldest_past_cap() {
        let mut hist = NavigationHistory::new(2);
        hist.push(ViewFrame { name: "a".into(), scroll_offset: 0 });
        hist.push(ViewFrame { name: "b".into(), scroll_offset: 0 });
        hist.push(ViewFrame { name: "c".into(), scroll_offset: 0 });
        assert_eq!(hist.len(), 2);
        assert_eq!(hist.pop().unwrap().name, "c");
        assert_eq!(hist.pop().unwrap().name, "b");
        assert!(hist.pop().is_none());
    }

    #[test]
    fn back_after_n_deep_navigations_returns_nth_frame() {
        let mut hist = NavigationHistory::new(32);
        for name in ["a", "b", "c"] {
            hist.push(ViewFrame { name: name.into(), scroll_offset: 0 });
        }
        assert_eq!(hist.pop().unwrap().name, "c");
        assert_eq!(hist.pop().unwrap().name, "b");
        assert_eq!(hist.pop().unwrap().name, "a");
        assert!(hist.is_empty());
    }

    #[test]
    fn opening_same_resource_twice_reuses_tab() {
        let mut ws = Workspace::default();
        let mut t1 = ContentTab::new("t1", "vm1", TabKind::ResourceDetails);
        t1.resource_ref = Some("res1".into());
        ws.open_or_focus(t1);
        let mut t2 = ContentTab::new("t2", "vm1", TabKind::ResourceDetails);
        t2.resource_ref = Some("res1".into());
        ws.open_or_focus(t2);
        assert_eq!(ws.tabs.len(), 1);
    }

    #[test]
    fn close_last_tab_returns_to_welcome() {
        let mut ws = Workspace::default();
        ws.open_or_focus(ContentTab::new("t1", "only", TabKind::ResourceDetails));
        ws.close_active();
        assert!(ws.active().is_none());
        assert!(ws.tabs.is_empty());
    }

    #[test]
    fn close_selects_right_neighbour_then_left() {
        let mut ws = Workspace::default();
        ws.open_or_focus(ContentTab::new("t1", "a", TabKind::Welcome));
        ws.open_or_focus(ContentTab::new("t2", "b", TabKind::Welcome));
        ws.open_or_focus(ContentTab::new("t3", "c", TabKind::Welcome));
        ws.active_index = Some(1);
        ws.close_active();
        assert_eq!(ws.active().unwrap().id, "t3");
        ws.active_index = Some(1);
        ws.close_active();
        assert_eq!(ws.active().unwrap().id, "t1");
    }

    #[test]
    fn toggle_block_twice_restores_identical_state() {
        let mut tab = ContentTab::new("t1", "a", TabKind::ResourceDetails);
        assert!(!tab.is_expanded("agent_pools"));
        tab.toggle_block("agent_pools");
        assert!(tab.is_expanded("agent_pools"));
        tab.toggle_block("agent_pools");
        assert!(!tab.is_expanded("agent_pools"));
    }

    #[test]
    fn wildcard_query_matches_prefix_and_suffix() {
        assert!(query_matches("vm*", &["vm-prod-01"]));
        assert!(query_matches("*prod*", &["vm-prod-01"]));
        assert!(!query_matches("db*", &["vm-prod-01"]));
    }

    #[test]
    fn search_is_deterministic_across_invocations() {
        let haystacks = ["vm-prod-01", "vm-dev-02", "storage-acct"];
        let a: Vec<bool> = haystacks.iter().map(|h| query_matches("vm*", &[h])).collect();
        let b: Vec<bool> = haystacks.iter().map(|h| query_matches("vm*", &[h])).collect();
        assert_eq!(a, b);
    }

    proptest::proptest! {
        // `spec.md` §8 property 3, generalized over arbitrary depths and
        // push sequences rather than one fixed example.
        #[test]
        fn back_after_n_navigations_returns_nth_frame_for_any_depth(
            max_depth in 1usize..20,
            names in proptest::collection::vec("[a-z]{1,6}", 0..40),
        ) {
            let mut hist = NavigationHistory::new(max_depth);
            for name in &names {
                hist.push(ViewFrame { name: name.clone(), scroll_offset: 0 });
            }
            let expected: Vec<String> = names.iter().rev().take(max_depth).cloned().collect();
            let mut popped = Vec::new();
            while let Some(frame) = hist.pop() {
                popped.push(frame.name);
            }
            proptest::prop_assert_eq!(popped, expected);
        }
    }
}
