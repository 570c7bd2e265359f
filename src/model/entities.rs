//! Core entities (`spec.md` §3).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub name: String,
    pub tenant_id: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroup {
    pub name: String,
    pub location: String,
    pub subscription_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub location: String,
    pub group: String,
    pub status: Option<String>,
    pub tags: Option<HashMap<String, String>>,
    pub properties: Option<serde_json::Value>,
    /// Undecoded provider JSON, kept alongside the typed fields so the
    /// Details panel can render a raw-JSON block without a second fetch
    /// (`SPEC_FULL.md` §3).
    pub raw_json: Option<serde_json::Value>,
}

impl Resource {
    /// Dispatch tag for this resource's type, used as the C4 dispatch key.
    /// Unrecognised ARM type strings map to `Other`.
    pub fn type_tag(&self) -> ResourceTypeTag {
        ResourceTypeTag::from_arm_type(&self.type_name)
    }
}

/// Resource-type taxonomy used as the dispatch key for action tables
/// (`spec.md` §4.4, §9 "Polymorphism without inheritance").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString)]
pub enum ResourceTypeTag {
    #[strum(serialize = "VM")]
    Vm,
    WebApp,
    Aks,
    Storage,
    KeyVault,
    Acr,
    Aci,
    Firewall,
    Nsg,
    VNet,
    LoadBalancer,
    PublicIp,
    Nic,
    RouteTable,
    Other,
}

impl ResourceTypeTag {
    /// Map an ARM resource-type string (`Microsoft.Compute/virtualMachines`)
    /// to a dispatch tag. Matching is prefix/substring based, following the
    /// provider-CLI's own `service/resource` vocabulary (`spec.md` §6).
    pub fn from_arm_type(arm_type: &str) -> Self {
        let lower = arm_type.to_ascii_lowercase();
        let table: &[(&str, ResourceTypeTag)] = &[
            ("microsoft.compute/virtualmachines", ResourceTypeTag::Vm),
            ("microsoft.web/sites", ResourceTypeTag::WebApp),
            ("microsoft.containerservice/managedclusters", ResourceTypeTag::Aks),
            ("microsoft.storage/storageaccounts", ResourceTypeTag::Storage),
            ("microsoft.keyvault/vaults", ResourceTypeTag::KeyVault),
            ("microsoft.containerregistry/registries", ResourceTypeTag::Acr),
            ("microsoft.containerinstance/containergroups", ResourceTypeTag::Aci),
            ("microsoft.network/azurefirewalls", ResourceTypeTag::Firewall),
            ("microsoft.network/networksecuritygroups", ResourceTypeTag::Nsg),
            ("microsoft.network/virtualnetworks", ResourceTypeTag::VNet),
            ("microsoft.network/loadbalancers", ResourceTypeTag::LoadBalancer),
            ("microsoft.network/publicipaddresses", ResourceTypeTag::PublicIp),
            ("microsoft.network/networkinterfaces", ResourceTypeTag::Nic),
            ("microsoft.network/routetables", ResourceTypeTag::RouteTable),
        ];
        table
            .iter()
            .find(|(prefix, _)| lower == *prefix)
            .map(|(_, tag)| *tag)
            .unwrap_or(ResourceTypeTag::Other)
    }
}

/// Per resource-group expansion state (`spec.md` §3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpansionNode {
    pub loaded: bool,
    pub loading: bool,
    /// UI open/closed bit, independent of whether children have been
    /// fetched (`spec.md` §4.5 "Space | Expand/collapse tree node").
    pub expanded: bool,
    pub children: Vec<Resource>,
    pub err: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_type_maps_known_types() {
        assert_eq!(
            ResourceTypeTag::from_arm_type("Microsoft.Compute/virtualMachines"),
            ResourceTypeTag::Vm
        );
        assert_eq!(
            ResourceTypeTag::from_arm_type("Microsoft.ContainerService/managedClusters"),
            ResourceTypeTag::Aks
        );
    }

    #[test]
    fn arm_type_unknown_maps_to_other() {
        assert_eq!(
            ResourceTypeTag::from_arm_type("Microsoft.Something/unknownThing"),
            ResourceTypeTag::Other
        );
    }
}
