//! Deterministic demo data (`spec.md` §4.6 startup sequence, glossary
//! "Demo data", scenario S1: "Startup with `DEMO_MODE=true`: the first
//! painted frame contains 4 demo groups and a welcome panel; no subprocess
//! is spawned").

use crate::controller::state::Model;
use crate::model::entities::{Resource, ResourceGroup, Subscription, Tenant};

const DEMO_TENANT_ID: &str = "demo-tenant";
const DEMO_SUBSCRIPTION_ID: &str = "demo-subscription";

/// Seed `model` with static demo records. Called unconditionally at startup
/// so the first frame always renders something (`spec.md` §4.6 step 1);
/// callers decide separately whether to also launch a real-data load.
pub fn seed(model: &mut Model) {
    model.tenants = vec![Tenant { id: DEMO_TENANT_ID.to_string(), name: "Demo Tenant".to_string() }];

    let subscription = Subscription {
        id: DEMO_SUBSCRIPTION_ID.to_string(),
        name: "Demo Subscription".to_string(),
        tenant_id: DEMO_TENANT_ID.to_string(),
        is_default: true,
    };
    model.inventory.subscriptions = vec![subscription];
    model.inventory.activate_subscription(DEMO_SUBSCRIPTION_ID);

    let groups = demo_groups();
    model.inventory.put_groups(DEMO_SUBSCRIPTION_ID, groups.clone());

    for group in &groups {
        model.inventory.put_group_children(
            DEMO_SUBSCRIPTION_ID,
            &group.name,
            demo_resources(&group.name),
            None,
        );
    }

    if !model.demo_mode {
        model.set_status("loading live data...", false);
    }
}

fn demo_groups() -> Vec<ResourceGroup> {
    vec![
        ResourceGroup { name: "demo-compute-rg".to_string(), location: "eastus".to_string(), subscription_id: DEMO_SUBSCRIPTION_ID.to_string() },
        ResourceGroup { name: "demo-web-rg".to_string(), location: "eastus".to_string(), subscription_id: DEMO_SUBSCRIPTION_ID.to_string() },
        ResourceGroup { name: "demo-data-rg".to_string(), location: "westeurope".to_string(), subscription_id: DEMO_SUBSCRIPTION_ID.to_string() },
        ResourceGroup { name: "demo-network-rg".to_string(), location: "westeurope".to_string(), subscription_id: DEMO_SUBSCRIPTION_ID.to_string() },
    ]
}

fn demo_resources(group_name: &str) -> Vec<Resource> {
    let (name, id_suffix, type_name) = match group_name {
        "demo-compute-rg" => ("demo-vm-01", "vm01", "Microsoft.Compute/virtualMachines"),
        "demo-web-rg" => ("demo-webapp-01", "webapp01", "Microsoft.Web/sites"),
        "demo-data-rg" => ("demo-storage-01", "storage01", "Microsoft.Storage/storageAccounts"),
        _ => ("demo-vnet-01", "vnet01", "Microsoft.Network/virtualNetworks"),
    };
    vec![Resource {
        id: format!("/subscriptions/{DEMO_SUBSCRIPTION_ID}/resourceGroups/{group_name}/providers/demo/{id_suffix}"),
        name: name.to_string(),
        type_name: type_name.to_string(),
        location: "eastus".to_string(),
        group: group_name.to_string(),
        status: Some("Running".to_string()),
        tags: None,
        properties: None,
        raw_json: Some(serde_json::json!({ "demo": true, "name": name })),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn seed_populates_four_groups_with_no_pending_loads() {
        let settings = Settings::load(None, true, false);
        let mut model = Model::new(settings);
        seed(&mut model);
        assert_eq!(model.groups_for_active_subscription().len(), 4);
        for group in model.groups_for_active_subscription() {
            let expansion = model.inventory.expansion(DEMO_SUBSCRIPTION_ID, &group.name).unwrap();
            assert!(expansion.loaded);
            assert!(!expansion.loading);
        }
    }
}
