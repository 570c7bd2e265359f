//! External collaborators at their interface with the core (`spec.md` §1):
//! the provider-CLI adapter layer, IaC tooling driver, DevOps manager, and
//! LLM client. Each is consumed as a narrow async function; the core never
//! reaches past these interfaces.

pub mod azure_cli;
pub mod devops;
pub mod iac;
pub mod llm;
