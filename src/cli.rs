//! Entry-point flag parsing. `spec.md` §6: the binary takes no *required*
//! arguments; these are convenience overrides for the env-var surface.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "azure-tui", about = "Interactive terminal workstation for cloud resources")]
pub struct Cli {
    /// Equivalent to DEMO_MODE=true: skip provider calls, use static demo data.
    #[arg(long)]
    pub demo: bool,

    /// Equivalent to DEBUG=true: enable verbose logging and the debug journal.
    #[arg(long)]
    pub debug: bool,

    /// Path to the YAML config file (defaults to the user config directory).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
