//! C2 — Inventory Cache (`spec.md` §4.2).
//!
//! Holds the tree of tenants/subscriptions/groups/resources plus per-group
//! expansion state. Grounded on the teacher's in-memory bookkeeping style in
//! `engine/queue.rs::ConcurrencyTracker`: plain owned collections, no
//! internal locking — the reducer is the only caller (`spec.md` §4.2
//! invariants).

use std::collections::HashMap;

use super::entities::{ExpansionNode, Resource, ResourceGroup, Subscription, Tenant};

#[derive(Debug, Default)]
pub struct Inventory {
    pub tenants: Vec<Tenant>,
    pub subscriptions: Vec<Subscription>,
    pub active_subscription_id: Option<String>,
    /// subscription_id -> resource groups
    groups: HashMap<String, Vec<ResourceGroup>>,
    /// (subscription_id, group_name) -> expansion state
    expansions: HashMap<(String, String), ExpansionNode>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the active subscription and clears cached groups/resources for
    /// it (`spec.md` §3: "Switching subscription invalidates C2 contents").
    pub fn activate_subscription(&mut self, id: &str) {
        self.active_subscription_id = Some(id.to_string());
        self.groups.remove(id);
        self.expansions.retain(|(sub_id, _), _| sub_id != id);
    }

    pub fn put_groups(&mut self, sub_id: &str, groups: Vec<ResourceGroup>) {
        self.groups.insert(sub_id.to_string(), groups);
    }

    pub fn groups_for(&self, sub_id: &str) -> &[ResourceGroup] {
        self.groups.get(sub_id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn mark_group_loading(&mut self, sub_id: &str, group_name: &str) {
        let entry = self
            .expansions
            .entry((sub_id.to_string(), group_name.to_string()))
            .or_default();
        entry.loading = true;
        entry.err = None;
    }

    /// Atomically replaces a group's children once the batch completes
    /// (`spec.md` §3: "C2 never contains a partially-mutated group").
    pub fn put_group_children(
        &mut self,
        sub_id: &str,
        group_name: &str,
        children: Vec<Resource>,
        err: Option<String>,
    ) {
        let entry = self
            .expansions
            .entry((sub_id.to_string(), group_name.to_string()))
            .or_default();
        entry.loading = false;
        entry.loaded = err.is_none();
        entry.children = children;
        entry.err = err;
    }

    pub fn expansion(&self, sub_id: &str, group_name: &str) -> Option<&ExpansionNode> {
        self.expansions.get(&(sub_id.to_string(), group_name.to_string()))
    }

    /// Flips the UI expand/collapse flag and reports whether the caller
    /// still needs to schedule a fetch (`spec.md` §4.2: fetching is the
    /// controller's job, not this method's). Collapsing never triggers a
    /// fetch; children already in cache stay cached so expanding again
    /// returns the same rows (`spec.md` §8 "Expand→collapse→expand returns
    /// identical children").
    pub fn toggle_expansion(&mut self, sub_id: &str, group_name: &str) -> bool {
        let key = (sub_id.to_string(), group_name.to_string());
        let entry = self.expansions.entry(key).or_default();
        entry.expanded = !entry.expanded;
        entry.expanded && !entry.loaded && !entry.loading
    }

    pub fn find(&self, id_or_name: &str) -> Option<&Resource> {
        self.expansions
            .values()
            .flat_map(|e| e.children.iter())
            .find(|r| r.id == id_or_name || r.name == id_or_name)
    }

    /// Flattens the subscription header, groups, and (for expanded-and-loaded
    /// groups) their resources into the same row order the tree widget
    /// renders (`spec.md` §4.5 "Tree cursor"). The tree cursor addresses an
    /// index into this list, not directly into `groups_for`, since resources
    /// can appear between groups once expanded.
    pub fn visible_rows(&self, sub_id: &str) -> Vec<TreeRow> {
        let mut rows = vec![TreeRow::SubscriptionHeader];
        for (group_index, group) in self.groups_for(sub_id).iter().enumerate() {
            rows.push(TreeRow::Group(group_index));
            let Some(expansion) = self.expansion(sub_id, &group.name) else { continue };
            if !expansion.expanded {
                continue;
            }
            if expansion.loaded {
                if expansion.children.is_empty() {
                    rows.push(TreeRow::Note(group_index));
                } else {
                    for resource_index in 0..expansion.children.len() {
                        rows.push(TreeRow::Resource { group_index, resource_index });
                    }
                }
            } else if expansion.err.is_some() {
                rows.push(TreeRow::Note(group_index));
            }
        }
        rows
    }
}

/// One addressable row in the flattened inventory tree (`spec.md` §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeRow {
    SubscriptionHeader,
    Group(usize),
    Resource { group_index: usize, resource_index: usize },
    /// A non-selectable annotation row ("(no resources)" or an error line).
    Note(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rg(name: &str) -> ResourceGroup {
        ResourceGroup {
            name: name.to_string(),
            location: "eastus".into(),
            subscription_id: "sub1".into(),
        }
    }

    fn res(id: &str, name: &str) -> Resource {
        Resource {
            id: id.to_string(),
            name: name.to_string(),
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
    fn activate_subscription_clears_prior_groups() {
        let mut inv = Inventory::new();
        inv.put_groups("sub1", vec![rg("rg1")]);
        assert_eq!(inv.groups_for("sub1").len(), 1);
        inv.activate_subscription("sub1");
        assert_eq!(inv.groups_for("sub1").len(), 0);
    }

    #[test]
    fn group_children_replace_atomically() {
        let mut inv = Inventory::new();
        inv.mark_group_loading("sub1", "rg1");
        assert!(inv.expansion("sub1", "rg1").unwrap().loading);
        inv.put_group_children("sub1", "rg1", vec![res("r1", "vm1")], None);
        let node = inv.expansion("sub1", "rg1").unwrap();
        assert!(!node.loading);
        assert!(node.loaded);
        assert_eq!(node.children.len(), 1);
    }

    #[test]
    fn group_children_with_error_is_not_loaded() {
        let mut inv = Inventory::new();
        inv.put_group_children("sub1", "rg1", vec![], Some("boom".into()));
        let node = inv.expansion("sub1", "rg1").unwrap();
        assert!(!node.loaded);
        assert_eq!(node.err.as_deref(), Some("boom"));
    }

    #[test]
    fn find_locates_resource_by_id() {
        let mut inv = Inventory::new();
        inv.put_group_children("sub1", "rg1", vec![res("r1", "vm1")], None);
        assert!(inv.find("r1").is_some());
        assert!(inv.find("vm1").is_some());
        assert!(inv.find("missing").is_none());
    }

    #[test]
    fn visible_rows_interleaves_expanded_resources_between_groups() {
        let mut inv = Inventory::new();
        inv.put_groups("sub1", vec![rg("rg1"), rg("rg2")]);
        inv.toggle_expansion("sub1", "rg1");
        inv.put_group_children("sub1", "rg1", vec![res("r1", "vm1"), res("r2", "vm2")], None);
        let rows = inv.visible_rows("sub1");
        assert_eq!(
            rows,
            vec![
                TreeRow::SubscriptionHeader,
                TreeRow::Group(0),
                TreeRow::Resource { group_index: 0, resource_index: 0 },
                TreeRow::Resource { group_index: 0, resource_index: 1 },
                TreeRow::Group(1),
            ]
        );
    }

    #[test]
    fn visible_rows_notes_empty_expanded_group() {
        let mut inv = Inventory::new();
        inv.put_groups("sub1", vec![rg("rg1")]);
        inv.toggle_expansion("sub1", "rg1");
        inv.put_group_children("sub1", "rg1", vec![], None);
        let rows = inv.visible_rows("sub1");
        assert_eq!(rows, vec![TreeRow::SubscriptionHeader, TreeRow::Group(0), TreeRow::Note(0)]);
    }

    #[test]
    fn collapsing_hides_children_without_dropping_cache() {
        let mut inv = Inventory::new();
        inv.put_groups("sub1", vec![rg("rg1")]);
        inv.toggle_expansion("sub1", "rg1");
        inv.put_group_children("sub1", "rg1", vec![res("r1", "vm1")], None);
        assert_eq!(inv.visible_rows("sub1").len(), 3);

        inv.toggle_expansion("sub1", "rg1");
        assert_eq!(inv.visible_rows("sub1"), vec![TreeRow::SubscriptionHeader, TreeRow::Group(0)]);

        let need_fetch = inv.toggle_expansion("sub1", "rg1");
        assert!(!need_fetch, "children are already cached, re-expanding should not refetch");
        let rows = inv.visible_rows("sub1");
        assert_eq!(
            rows,
            vec![
                TreeRow::SubscriptionHeader,
                TreeRow::Group(0),
                TreeRow::Resource { group_index: 0, resource_index: 0 },
            ]
        );
    }
}
