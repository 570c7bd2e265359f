//! The key-binding table (`spec.md` §4.4), kept as a single source of truth
//! for the help popup. The actual dispatch lives in
//! `controller::reducer::reduce_key` — this module documents the contract
//! rather than driving it, since a `match` over `KeyCode` is clearer and
//! faster than a runtime lookup table for a fixed binding set of this size.
//!
//! `spec.md` §9 open question: `T`/`B` overlap by context (Storage vs.
//! other resource types). Decision recorded in `DESIGN.md`: the
//! resource-type-specific binding wins, implemented in
//! `reducer::dispatch_context_sensitive`.

pub const BINDINGS: &[(&str, &str)] = &[
    ("j/k or ↓/↑", "Move cursor (active panel)"),
    ("h/l or ←/→", "Move focus between Tree and Details panels"),
    ("Tab / Shift+Tab", "Cycle content tabs"),
    ("Space", "Expand/collapse tree node"),
    ("Enter", "Open resource in new tab"),
    ("Esc", "Pop navigation frame; close popup if open"),
    ("/", "Enter search mode"),
    ("?", "Toggle help popup"),
    ("a", "Trigger LLM resource analysis (manual mode)"),
    ("D", "Trigger enhanced dashboard aggregation"),
    ("M", "Show metrics dashboard"),
    ("E", "Open resource editor popup"),
    ("T", "Storage: list containers; else generate IaC (Terraform)"),
    ("B", "Storage: list blobs; else generate IaC (Bicep)"),
    ("O", "Cost optimisation analysis"),
    ("R", "Show action menu for current resource"),
    ("s/S/r", "Start / Stop / Restart (VM, AKS)"),
    ("Ctrl+D", "Delete with confirmation"),
    ("Ctrl+T", "Open IaC manager popup"),
    ("Ctrl+O", "Open DevOps manager popup"),
    ("Ctrl+A", "Open subscription switcher popup"),
    ("Ctrl+X", "Storage delete"),
    ("Ctrl+W", "Close current tab"),
    ("Ctrl+R", "Refresh health"),
    ("e", "Toggle expansion of a complex property block"),
    ("q, Ctrl+C", "Quit"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_binding_has_a_non_empty_description() {
        for (key, description) in BINDINGS {
            assert!(!key.is_empty());
            assert!(!description.is_empty());
        }
    }
}
