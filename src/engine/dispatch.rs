//! C4 — Action Dispatcher (`spec.md` §4.4).
//!
//! Routes `(resource-type tag, action kind)` to the adapter call that
//! performs it, and runs it under the single-action-in-flight invariant
//! (`spec.md` §4.4: "at most one action per resource may be in flight").
//! Grounded on `engine/dispatch.rs::dispatch`'s "closed enum routed by a
//! `match`" shape.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::adapters::{azure_cli, iac};
use crate::error::AppError;
use crate::model::actions::ActionKind;
use crate::model::entities::{Resource, ResourceTypeTag};

/// Tracks which resource IDs currently have an action in flight.
/// `spec.md` §4.4: attempting a second action on a resource already running
/// one is a precondition failure, not a queued retry.
pub struct InFlightTracker {
    running: Mutex<HashSet<String>>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        InFlightTracker { running: Mutex::new(HashSet::new()) }
    }

    /// Reserve `resource_id` for an in-flight action. Returns `false` (and
    /// reserves nothing) if one is already running.
    pub fn try_start(&self, resource_id: &str) -> bool {
        self.running.lock().unwrap().insert(resource_id.to_string())
    }

    pub fn finish(&self, resource_id: &str) {
        self.running.lock().unwrap().remove(resource_id);
    }

    pub fn is_running(&self, resource_id: &str) -> bool {
        self.running.lock().unwrap().contains(resource_id)
    }
}

impl Default for InFlightTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// The outcome of a dispatched action: free-form text for display (command
/// output, a confirmation message) or structured JSON for list-shaped
/// results.
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    Text(String),
    Json(serde_json::Value),
    Done,
}

/// Execute `kind` against `resource`. Callers are expected to have already
/// checked `ActionDescriptor::applies` and reserved the resource with
/// `InFlightTracker::try_start`; this function performs the actual adapter
/// call and nothing else.
pub async fn dispatch(resource: &Resource, kind: ActionKind) -> Result<ActionOutcome, AppError> {
    let tag = resource.type_tag();
    match (tag, kind) {
        (ResourceTypeTag::Vm, ActionKind::Start) => {
            azure_cli::vm_start(&resource.group, &resource.name).await?;
            Ok(ActionOutcome::Done)
        }
        (ResourceTypeTag::Vm, ActionKind::Stop) => {
            azure_cli::vm_stop(&resource.group, &resource.name).await?;
            Ok(ActionOutcome::Done)
        }
        (ResourceTypeTag::Vm, ActionKind::Restart) => {
            azure_cli::vm_restart(&resource.group, &resource.name).await?;
            Ok(ActionOutcome::Done)
        }
        (ResourceTypeTag::Vm, ActionKind::Delete) => {
            azure_cli::vm_delete(&resource.group, &resource.name).await?;
            Ok(ActionOutcome::Done)
        }
        (ResourceTypeTag::WebApp, ActionKind::Start) => {
            azure_cli::webapp_start(&resource.group, &resource.name).await?;
            Ok(ActionOutcome::Done)
        }
        (ResourceTypeTag::WebApp, ActionKind::Stop) => {
            azure_cli::webapp_stop(&resource.group, &resource.name).await?;
            Ok(ActionOutcome::Done)
        }
        (ResourceTypeTag::WebApp, ActionKind::Restart) => {
            azure_cli::webapp_restart(&resource.group, &resource.name).await?;
            Ok(ActionOutcome::Done)
        }
        (ResourceTypeTag::Aks, ActionKind::StartCluster) => {
            azure_cli::aks_start(&resource.group, &resource.name).await?;
            Ok(ActionOutcome::Done)
        }
        (ResourceTypeTag::Aks, ActionKind::StopCluster) => {
            azure_cli::aks_stop(&resource.group, &resource.name).await?;
            Ok(ActionOutcome::Done)
        }
        (ResourceTypeTag::Aks, ActionKind::GetCredentials) => {
            azure_cli::aks_get_credentials(&resource.group, &resource.name).await?;
            Ok(ActionOutcome::Done)
        }
        (ResourceTypeTag::Aks, ActionKind::ListPods) => {
            Ok(ActionOutcome::Json(azure_cli::kubectl_get("pods").await?))
        }
        (ResourceTypeTag::Aks, ActionKind::ListDeployments) => {
            Ok(ActionOutcome::Json(azure_cli::kubectl_get("deployments").await?))
        }
        (ResourceTypeTag::Aks, ActionKind::ListServices) => {
            Ok(ActionOutcome::Json(azure_cli::kubectl_get("services").await?))
        }
        (ResourceTypeTag::Aks, ActionKind::ListNodes) => {
            Ok(ActionOutcome::Json(azure_cli::kubectl_get("nodes").await?))
        }
        (ResourceTypeTag::Storage, ActionKind::ListContainers) => {
            Ok(ActionOutcome::Json(azure_cli::storage_list_containers(&resource.name).await?))
        }
        (ResourceTypeTag::Storage, ActionKind::ListBlobs) => {
            // `container` is expected to be smuggled in via `properties.container`
            // by the caller (the controller resolves which container is selected).
            let container = selected_container(resource)?;
            Ok(ActionOutcome::Json(azure_cli::storage_list_blobs(&resource.name, container).await?))
        }
        (ResourceTypeTag::Storage, ActionKind::DeleteContainer) => {
            let container = selected_container(resource)?;
            azure_cli::storage_delete_container(&resource.name, container).await?;
            Ok(ActionOutcome::Done)
        }
        (_, ActionKind::MetricsDashboard) => {
            Ok(ActionOutcome::Json(azure_cli::get_metrics(&resource.id).await?))
        }
        (_, ActionKind::GenerateTerraform) => {
            Ok(ActionOutcome::Text(iac::generate_terraform_stub(&resource.type_name, &resource.name)))
        }
        (_, ActionKind::GenerateBicep) => {
            Ok(ActionOutcome::Text(iac::generate_bicep_stub(&resource.type_name, &resource.name)))
        }
        (ResourceTypeTag::KeyVault, ActionKind::ListGeneric)
        | (ResourceTypeTag::Acr, ActionKind::ListGeneric)
        | (ResourceTypeTag::Aci, ActionKind::ListGeneric)
        | (ResourceTypeTag::Firewall, ActionKind::ListGeneric)
        | (ResourceTypeTag::Nsg, ActionKind::ListGeneric)
        | (ResourceTypeTag::VNet, ActionKind::ListGeneric)
        | (ResourceTypeTag::LoadBalancer, ActionKind::ListGeneric)
        | (ResourceTypeTag::PublicIp, ActionKind::ListGeneric)
        | (ResourceTypeTag::Nic, ActionKind::ListGeneric)
        | (ResourceTypeTag::RouteTable, ActionKind::ListGeneric) => {
            Ok(ActionOutcome::Json(generic_service(tag, |svc| azure_cli::generic_list(svc, &resource.group)).await?))
        }
        (_, ActionKind::ShowGeneric) => {
            Ok(ActionOutcome::Json(
                generic_service(tag, |svc| azure_cli::generic_show(svc, &resource.group, &resource.name)).await?,
            ))
        }
        (_, ActionKind::DeleteGeneric) => {
            generic_service(tag, |svc| azure_cli::generic_delete(svc, &resource.group, &resource.name)).await?;
            Ok(ActionOutcome::Done)
        }
        _ => Err(AppError::Precondition(format!(
            "action {kind:?} does not apply to resource type {tag:?}"
        ))),
    }
}

fn selected_container(resource: &Resource) -> Result<&str, AppError> {
    resource
        .properties
        .as_ref()
        .and_then(|p| p.get("container"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| AppError::Precondition("no container selected".into()))
}

/// Map a tag to the provider-CLI service noun used in generic list/show/delete
/// calls (`spec.md` §4.4), then run `f` with it.
async fn generic_service<T, F, Fut>(tag: ResourceTypeTag, f: F) -> Result<T, AppError>
where
    F: FnOnce(&'static str) -> Fut,
    Fut: std::future::Future<Output = Result<T, AppError>>,
{
    let svc = match tag {
        ResourceTypeTag::KeyVault => "keyvault",
        ResourceTypeTag::Acr => "acr",
        ResourceTypeTag::Aci => "container",
        ResourceTypeTag::Firewall => "network firewall",
        ResourceTypeTag::Nsg => "network nsg",
        ResourceTypeTag::VNet => "network vnet",
        ResourceTypeTag::LoadBalancer => "network lb",
        ResourceTypeTag::PublicIp => "network public-ip",
        ResourceTypeTag::Nic => "network nic",
        ResourceTypeTag::RouteTable => "network route-table",
        other => return Err(AppError::Precondition(format!("no generic service for {other:?}"))),
    };
    f(svc).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_tracker_rejects_second_start_on_same_resource() {
        let tracker = InFlightTracker::new();
        assert!(tracker.try_start("res-1"));
        assert!(!tracker.try_start("res-1"));
        tracker.finish("res-1");
        assert!(tracker.try_start("res-1"));
    }

    #[test]
    fn in_flight_tracker_allows_concurrent_actions_on_different_resources() {
        let tracker = InFlightTracker::new();
        assert!(tracker.try_start("res-1"));
        assert!(tracker.try_start("res-2"));
    }

    #[tokio::test]
    async fn dispatch_rejects_mismatched_tag_and_kind() {
        let resource = Resource {
            id: "id1".into(),
            name: "name1".into(),
            type_name: "Microsoft.Storage/storageAccounts".into(),
            location: "eastus".into(),
            group: "rg1".into(),
            status: None,
            tags: None,
            properties: None,
            raw_json: None,
        };
        let err = dispatch(&resource, ActionKind::Ssh).await.unwrap_err();
        assert!(matches!(err, AppError::Precondition(_)));
    }
}
