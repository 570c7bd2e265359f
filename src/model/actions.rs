//! C4 data — the action taxonomy (`spec.md` §4.4).
//!
//! Grounded on `engine/dispatch.rs`'s "closed enum routed by a `match`"
//! shape, generalized from "protocol message -> DB repo" to
//! "(resource-type tag, key) -> action descriptor", and on
//! `engine/provider/mod.rs`'s `resolve_provider` factory for the idea of a
//! small lookup function standing in for an inheritance hierarchy
//! (`spec.md` §9 "Polymorphism without inheritance").

use std::collections::HashSet;

use super::entities::ResourceTypeTag;
use strum::Display;

/// The concrete operation an `ActionDescriptor` performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ActionKind {
    Start,
    Stop,
    Restart,
    Delete,
    Ssh,
    Bastion,
    Status,
    StartCluster,
    StopCluster,
    Scale,
    GetCredentials,
    ListPods,
    ListDeployments,
    ListServices,
    ListNodes,
    ListContainers,
    CreateContainer,
    DeleteContainer,
    ListBlobs,
    UploadBlob,
    DeleteBlob,
    ListGeneric,
    CreateGeneric,
    DeleteGeneric,
    ShowGeneric,
    GenerateTerraform,
    GenerateBicep,
    CostOptimization,
    LlmAnalysis,
    DashboardAggregate,
    MetricsDashboard,
    OpenEditor,
    ShowActionMenu,
}

impl ActionKind {
    /// Destructive actions require confirmation (`spec.md` §4.4).
    pub fn is_destructive(&self) -> bool {
        matches!(self, ActionKind::Delete | ActionKind::DeleteContainer | ActionKind::DeleteBlob)
    }
}

#[derive(Debug, Clone)]
pub struct ActionDescriptor {
    pub label: &'static str,
    pub applies_to: &'static [ResourceTypeTag],
    pub kind: ActionKind,
}

impl ActionDescriptor {
    pub fn applies(&self, tag: ResourceTypeTag) -> bool {
        self.applies_to.contains(&tag)
    }
}

/// Static action table keyed loosely by resource type, per `spec.md` §4.4's
/// "Resource-type taxonomy" list.
pub static ACTIONS: &[ActionDescriptor] = &[
    ActionDescriptor { label: "Start", applies_to: &[ResourceTypeTag::Vm, ResourceTypeTag::WebApp], kind: ActionKind::Start },
    ActionDescriptor { label: "Stop", applies_to: &[ResourceTypeTag::Vm, ResourceTypeTag::WebApp], kind: ActionKind::Stop },
    ActionDescriptor { label: "Restart", applies_to: &[ResourceTypeTag::Vm, ResourceTypeTag::WebApp], kind: ActionKind::Restart },
    ActionDescriptor { label: "SSH", applies_to: &[ResourceTypeTag::Vm], kind: ActionKind::Ssh },
    ActionDescriptor { label: "Bastion", applies_to: &[ResourceTypeTag::Vm], kind: ActionKind::Bastion },
    ActionDescriptor { label: "Status", applies_to: &[ResourceTypeTag::Vm], kind: ActionKind::Status },
    ActionDescriptor { label: "Delete", applies_to: &[ResourceTypeTag::Vm], kind: ActionKind::Delete },
    ActionDescriptor { label: "Start Cluster", applies_to: &[ResourceTypeTag::Aks], kind: ActionKind::StartCluster },
    ActionDescriptor { label: "Stop Cluster", applies_to: &[ResourceTypeTag::Aks], kind: ActionKind::StopCluster },
    ActionDescriptor { label: "Scale", applies_to: &[ResourceTypeTag::Aks], kind: ActionKind::Scale },
    ActionDescriptor { label: "Get Credentials", applies_to: &[ResourceTypeTag::Aks], kind: ActionKind::GetCredentials },
    ActionDescriptor { label: "List Pods", applies_to: &[ResourceTypeTag::Aks], kind: ActionKind::ListPods },
    ActionDescriptor { label: "List Deployments", applies_to: &[ResourceTypeTag::Aks], kind: ActionKind::ListDeployments },
    ActionDescriptor { label: "List Services", applies_to: &[ResourceTypeTag::Aks], kind: ActionKind::ListServices },
    ActionDescriptor { label: "List Nodes", applies_to: &[ResourceTypeTag::Aks], kind: ActionKind::ListNodes },
    ActionDescriptor { label: "List Containers", applies_to: &[ResourceTypeTag::Storage], kind: ActionKind::ListContainers },
    ActionDescriptor { label: "Create Container", applies_to: &[ResourceTypeTag::Storage], kind: ActionKind::CreateContainer },
    ActionDescriptor { label: "Delete Container", applies_to: &[ResourceTypeTag::Storage], kind: ActionKind::DeleteContainer },
    ActionDescriptor { label: "List Blobs", applies_to: &[ResourceTypeTag::Storage], kind: ActionKind::ListBlobs },
    ActionDescriptor { label: "Upload Blob", applies_to: &[ResourceTypeTag::Storage], kind: ActionKind::UploadBlob },
    ActionDescriptor { label: "Delete Blob", applies_to: &[ResourceTypeTag::Storage], kind: ActionKind::DeleteBlob },
    ActionDescriptor {
        label: "List",
        applies_to: &[
            ResourceTypeTag::KeyVault, ResourceTypeTag::Acr, ResourceTypeTag::Aci,
            ResourceTypeTag::Firewall, ResourceTypeTag::Nsg, ResourceTypeTag::VNet,
            ResourceTypeTag::LoadBalancer, ResourceTypeTag::PublicIp, ResourceTypeTag::Nic,
            ResourceTypeTag::RouteTable,
        ],
        kind: ActionKind::ListGeneric,
    },
    ActionDescriptor {
        label: "Delete",
        applies_to: &[
            ResourceTypeTag::KeyVault, ResourceTypeTag::Acr, ResourceTypeTag::Aci,
            ResourceTypeTag::Firewall, ResourceTypeTag::Nsg, ResourceTypeTag::VNet,
            ResourceTypeTag::LoadBalancer, ResourceTypeTag::PublicIp, ResourceTypeTag::Nic,
            ResourceTypeTag::RouteTable,
        ],
        kind: ActionKind::DeleteGeneric,
    },
    ActionDescriptor {
        label: "Show",
        applies_to: &[
            ResourceTypeTag::KeyVault, ResourceTypeTag::Acr, ResourceTypeTag::Aci,
            ResourceTypeTag::Firewall, ResourceTypeTag::Nsg, ResourceTypeTag::VNet,
            ResourceTypeTag::LoadBalancer, ResourceTypeTag::PublicIp, ResourceTypeTag::Nic,
            ResourceTypeTag::RouteTable,
        ],
        kind: ActionKind::ShowGeneric,
    },
];

/// Global actions that apply to any resource type regardless of tag.
pub static GLOBAL_ACTIONS: &[ActionDescriptor] = &[
    ActionDescriptor { label: "Terraform", applies_to: &[], kind: ActionKind::GenerateTerraform },
    ActionDescriptor { label: "Bicep", applies_to: &[], kind: ActionKind::GenerateBicep },
    ActionDescriptor { label: "Cost Optimisation", applies_to: &[], kind: ActionKind::CostOptimization },
    ActionDescriptor { label: "LLM Analysis", applies_to: &[], kind: ActionKind::LlmAnalysis },
    ActionDescriptor { label: "Dashboard", applies_to: &[], kind: ActionKind::DashboardAggregate },
    ActionDescriptor { label: "Metrics", applies_to: &[], kind: ActionKind::MetricsDashboard },
];

/// All descriptors (type-specific + global) that apply to a given tag.
pub fn actions_for(tag: ResourceTypeTag) -> Vec<&'static ActionDescriptor> {
    ACTIONS
        .iter()
        .filter(|a| a.applies(tag))
        .chain(GLOBAL_ACTIONS.iter())
        .collect()
}

pub fn action_applies(tag: ResourceTypeTag, kind: ActionKind) -> bool {
    GLOBAL_ACTIONS.iter().any(|a| a.kind == kind)
        || ACTIONS.iter().any(|a| a.kind == kind && a.applies(tag))
}

/// The set of tags an action kind is valid for (used for precondition
/// checks); empty means "global, any tag".
pub fn tags_for_kind(kind: ActionKind) -> HashSet<ResourceTypeTag> {
    ACTIONS
        .iter()
        .filter(|a| a.kind == kind)
        .flat_map(|a| a.applies_to.iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vm_gets_start_stop_restart_delete() {
        let actions = actions_for(ResourceTypeTag::Vm);
        let kinds: Vec<_> = actions.iter().map(|a| a.kind).collect();
        assert!(kinds.contains(&ActionKind::Start));
        assert!(kinds.contains(&ActionKind::Stop));
        assert!(kinds.contains(&ActionKind::Delete));
        assert!(!kinds.contains(&ActionKind::ListContainers));
    }

    #[test]
    fn storage_does_not_get_vm_actions() {
        assert!(!action_applies(ResourceTypeTag::Storage, ActionKind::Ssh));
        assert!(action_applies(ResourceTypeTag::Storage, ActionKind::ListContainers));
    }

    #[test]
    fn global_actions_apply_to_every_tag() {
        assert!(action_applies(ResourceTypeTag::Other, ActionKind::LlmAnalysis));
        assert!(action_applies(ResourceTypeTag::Vm, ActionKind::DashboardAggregate));
    }

    #[test]
    fn delete_is_destructive() {
        assert!(ActionKind::Delete.is_destructive());
        assert!(!ActionKind::Start.is_destructive());
    }
}
