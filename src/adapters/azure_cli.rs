//! The provider-CLI adapter layer (`spec.md` §1, §6).
//!
//! Thin wrappers that shell out to `az` and decode its JSON output into
//! typed records. Grounded on the `<provider-cli> <service> <action>
//! [args] --output json` contract of `spec.md` §6 and on the
//! `Command::new(&cli_args.command).args(&cli_args.args)` construction
//! style of `engine/runner.rs::run_execution`.

use crate::error::AppError;
use crate::model::entities::{Resource, ResourceGroup, Subscription};
use crate::runner::{self, deadlines};

const CLI: &str = "az";

fn argv(parts: &[&str]) -> Vec<String> {
    let mut v = vec![CLI.to_string()];
    v.extend(parts.iter().map(|s| s.to_string()));
    v.push("--output".to_string());
    v.push("json".to_string());
    v
}

pub async fn list_subscriptions() -> Result<Vec<Subscription>, AppError> {
    #[derive(serde::Deserialize)]
    struct Raw {
        id: String,
        name: String,
        #[serde(rename = "tenantId")]
        tenant_id: String,
        #[serde(rename = "isDefault")]
        is_default: bool,
    }
    let raw: Vec<Raw> = runner::run_json(&argv(&["account", "list"]), deadlines::LIST).await?;
    Ok(raw
        .into_iter()
        .map(|r| Subscription {
            id: r.id,
            name: r.name,
            tenant_id: r.tenant_id,
            is_default: r.is_default,
        })
        .collect())
}

pub async fn list_resource_groups(subscription_id: &str) -> Result<Vec<ResourceGroup>, AppError> {
    #[derive(serde::Deserialize)]
    struct Raw {
        name: String,
        location: String,
    }
    let raw: Vec<Raw> = runner::run_json(
        &argv(&["group", "list", "--subscription", subscription_id]),
        deadlines::LIST,
    )
    .await?;
    Ok(raw
        .into_iter()
        .map(|r| ResourceGroup {
            name: r.name,
            location: r.location,
            subscription_id: subscription_id.to_string(),
        })
        .collect())
}

pub async fn list_resources_in_group(
    subscription_id: &str,
    group_name: &str,
) -> Result<Vec<Resource>, AppError> {
    #[derive(serde::Deserialize)]
    struct Raw {
        id: String,
        name: String,
        #[serde(rename = "type")]
        type_name: String,
        location: String,
        tags: Option<std::collections::HashMap<String, String>>,
    }
    let raw: Vec<serde_json::Value> = runner::run_json(
        &argv(&[
            "resource", "list", "--subscription", subscription_id, "--resource-group", group_name,
        ]),
        deadlines::LIST,
    )
    .await?;
    raw.into_iter()
        .map(|v| {
            let parsed: Raw = serde_json::from_value(v.clone())?;
            Ok(Resource {
                id: parsed.id,
                name: parsed.name,
                type_name: parsed.type_name,
                location: parsed.location,
                group: group_name.to_string(),
                status: None,
                tags: parsed.tags,
                properties: None,
                raw_json: Some(v),
            })
        })
        .collect()
}

pub async fn show_resource(resource_id: &str) -> Result<serde_json::Value, AppError> {
    runner::run_json(&argv(&["resource", "show", "--ids", resource_id]), deadlines::INSPECT).await
}

pub async fn get_metrics(resource_id: &str) -> Result<serde_json::Value, AppError> {
    runner::run_json(
        &argv(&["monitor", "metrics", "list", "--resource", resource_id]),
        deadlines::INSPECT,
    )
    .await
}

pub async fn get_usage(subscription_id: &str) -> Result<serde_json::Value, AppError> {
    runner::run_json(
        &argv(&["vm", "list-usage", "--subscription", subscription_id]),
        deadlines::INSPECT,
    )
    .await
}

pub async fn get_alarms(resource_id: &str) -> Result<serde_json::Value, AppError> {
    runner::run_json(
        &argv(&["monitor", "metrics", "alert", "list", "--resource", resource_id]),
        deadlines::INSPECT,
    )
    .await
}

pub async fn get_logs(resource_id: &str) -> Result<serde_json::Value, AppError> {
    runner::run_json(
        &argv(&["monitor", "activity-log", "list", "--resource-id", resource_id]),
        deadlines::INSPECT,
    )
    .await
}

macro_rules! lifecycle_op {
    ($name:ident, $service:literal, $verb:literal, $deadline:expr) => {
        pub async fn $name(resource_group: &str, name: &str) -> Result<(), AppError> {
            runner::run(
                &argv(&[$service, $verb, "--resource-group", resource_group, "--name", name]),
                $deadline,
            )
            .await?;
            Ok(())
        }
    };
}

lifecycle_op!(vm_start, "vm", "start", deadlines::LIFECYCLE);
lifecycle_op!(vm_stop, "vm", "deallocate", deadlines::LIFECYCLE);
lifecycle_op!(vm_restart, "vm", "restart", deadlines::LIFECYCLE);
lifecycle_op!(webapp_start, "webapp", "start", deadlines::LIFECYCLE);
lifecycle_op!(webapp_stop, "webapp", "stop", deadlines::LIFECYCLE);
lifecycle_op!(webapp_restart, "webapp", "restart", deadlines::LIFECYCLE);

pub async fn vm_delete(resource_group: &str, name: &str) -> Result<(), AppError> {
    runner::run(
        &argv(&["vm", "delete", "--resource-group", resource_group, "--name", name, "--yes"]),
        deadlines::LARGE_DELETE,
    )
    .await?;
    Ok(())
}

lifecycle_op!(aks_start, "aks", "start", deadlines::LIFECYCLE);
lifecycle_op!(aks_stop, "aks", "stop", deadlines::LIFECYCLE);

pub async fn aks_scale(resource_group: &str, name: &str, node_count: u32) -> Result<(), AppError> {
    runner::run(
        &argv(&[
            "aks", "scale", "--resource-group", resource_group, "--name", name,
            "--node-count", &node_count.to_string(),
        ]),
        deadlines::SCALE,
    )
    .await?;
    Ok(())
}

pub async fn aks_get_credentials(resource_group: &str, name: &str) -> Result<(), AppError> {
    runner::run(
        &argv(&["aks", "get-credentials", "--resource-group", resource_group, "--name", name, "--overwrite-existing"]),
        deadlines::INSPECT,
    )
    .await?;
    Ok(())
}

pub async fn kubectl_get(kind: &str) -> Result<serde_json::Value, AppError> {
    let argv_vec = vec!["kubectl".to_string(), "get".to_string(), kind.to_string(), "-o".to_string(), "json".to_string()];
    runner::run_json(&argv_vec, deadlines::LIST).await
}

pub async fn storage_list_containers(account: &str) -> Result<serde_json::Value, AppError> {
    runner::run_json(&argv(&["storage", "container", "list", "--account-name", account]), deadlines::LIST).await
}

pub async fn storage_create_container(account: &str, name: &str) -> Result<(), AppError> {
    runner::run(
        &argv(&["storage", "container", "create", "--account-name", account, "--name", name]),
        deadlines::CREATE_LIGHT,
    )
    .await?;
    Ok(())
}

pub async fn storage_delete_container(account: &str, name: &str) -> Result<(), AppError> {
    runner::run(
        &argv(&["storage", "container", "delete", "--account-name", account, "--name", name]),
        deadlines::LIFECYCLE,
    )
    .await?;
    Ok(())
}

pub async fn storage_list_blobs(account: &str, container: &str) -> Result<serde_json::Value, AppError> {
    runner::run_json(
        &argv(&["storage", "blob", "list", "--account-name", account, "--container-name", container]),
        deadlines::LIST,
    )
    .await
}

pub async fn storage_delete_blob(account: &str, container: &str, blob: &str) -> Result<(), AppError> {
    runner::run(
        &argv(&[
            "storage", "blob", "delete", "--account-name", account, "--container-name", container,
            "--name", blob,
        ]),
        deadlines::LIFECYCLE,
    )
    .await?;
    Ok(())
}

/// Generic list/show/delete for the characteristic-action resource types
/// (KeyVault, ACR, ACI, Firewall, NSG, VNet, LoadBalancer, PublicIP, NIC,
/// RouteTable — `spec.md` §4.4).
pub async fn generic_list(service: &str, resource_group: &str) -> Result<serde_json::Value, AppError> {
    runner::run_json(&argv(&[service, "list", "--resource-group", resource_group]), deadlines::LIST).await
}

pub async fn generic_show(service: &str, resource_group: &str, name: &str) -> Result<serde_json::Value, AppError> {
    runner::run_json(
        &argv(&[service, "show", "--resource-group", resource_group, "--name", name]),
        deadlines::INSPECT,
    )
    .await
}

pub async fn generic_delete(service: &str, resource_group: &str, name: &str) -> Result<(), AppError> {
    runner::run(
        &argv(&[service, "delete", "--resource-group", resource_group, "--name", name, "--yes"]),
        deadlines::LIFECYCLE,
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argv_always_requests_json_output() {
        let built = argv(&["account", "list"]);
        assert_eq!(built.last().unwrap(), "json");
        assert_eq!(built[0], CLI);
    }
}
