//! IaC tooling driver (`spec.md` §1, §4.7): invokes the external `terraform`
//! binary for init/plan/apply/validate/format/destroy/workspace/state.
//! Consumed by the core as `op(ctx, args) -> (text, error)`.

use crate::error::AppError;
use crate::runner::{self, deadlines};

const CLI: &str = "terraform";

async fn run_text(args: &[&str], deadline: std::time::Duration) -> Result<String, AppError> {
    let mut argv = vec![CLI.to_string()];
    argv.extend(args.iter().map(|s| s.to_string()));
    let bytes = runner::run(&argv, deadline).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub async fn init(dir: &str) -> Result<String, AppError> {
    run_text(&["-chdir", dir, "init", "-no-color"], deadlines::CREATE_LIGHT).await
}

pub async fn plan(dir: &str, target: Option<&str>) -> Result<String, AppError> {
    match target {
        Some(t) => run_text(&["-chdir", dir, "plan", "-no-color", "-target", t], deadlines::SCALE).await,
        None => run_text(&["-chdir", dir, "plan", "-no-color"], deadlines::SCALE).await,
    }
}

pub async fn apply(dir: &str, auto_approve: bool) -> Result<String, AppError> {
    if auto_approve {
        run_text(&["-chdir", dir, "apply", "-no-color", "-auto-approve"], deadlines::SCALE).await
    } else {
        run_text(&["-chdir", dir, "apply", "-no-color"], deadlines::SCALE).await
    }
}

pub async fn validate(dir: &str) -> Result<String, AppError> {
    run_text(&["-chdir", dir, "validate", "-no-color"], deadlines::INSPECT).await
}

pub async fn fmt(dir: &str) -> Result<String, AppError> {
    run_text(&["-chdir", dir, "fmt", "-no-color"], deadlines::INSPECT).await
}

pub async fn destroy(dir: &str, auto_approve: bool) -> Result<String, AppError> {
    if auto_approve {
        run_text(&["-chdir", dir, "destroy", "-no-color", "-auto-approve"], deadlines::LARGE_DELETE).await
    } else {
        run_text(&["-chdir", dir, "destroy", "-no-color"], deadlines::LARGE_DELETE).await
    }
}

pub async fn workspace_list(dir: &str) -> Result<String, AppError> {
    run_text(&["-chdir", dir, "workspace", "list", "-no-color"], deadlines::LIST).await
}

pub async fn state_list(dir: &str) -> Result<String, AppError> {
    run_text(&["-chdir", dir, "state", "list", "-no-color"], deadlines::LIST).await
}

/// Generate a Terraform resource skeleton for the given type/name
/// (`spec.md` §4.4 `T`: "generate IaC (Terraform)"). Offline and
/// deterministic; does not shell out.
pub fn generate_terraform_stub(resource_type: &str, resource_name: &str) -> String {
    format!(
        "resource \"azurerm_resource\" \"{resource_name}\" {{\n  # TODO: fill in arguments for {resource_type}\n}}\n"
    )
}

/// Generate a Bicep resource skeleton for the given type/name
/// (`spec.md` §4.4 `B`: "generate IaC (Bicep)").
pub fn generate_bicep_stub(resource_type: &str, resource_name: &str) -> String {
    format!(
        "resource {resource_name} '{resource_type}@2023-01-01' = {{\n  name: '{resource_name}'\n}}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_terraform_stub_includes_resource_name() {
        let out = generate_terraform_stub("Microsoft.Compute/virtualMachines", "vm1");
        assert!(out.contains("vm1"));
    }

    #[test]
    fn generate_bicep_stub_includes_resource_type() {
        let out = generate_bicep_stub("Microsoft.Storage/storageAccounts", "st1");
        assert!(out.contains("Microsoft.Storage/storageAccounts"));
    }
}
