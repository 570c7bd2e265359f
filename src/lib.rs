pub mod adapters;
pub mod cli;
pub mod config;
pub mod controller;
pub mod demo;
pub mod engine;
pub mod error;
pub mod keymap;
pub mod logging;
pub mod model;
pub mod ui;

use clap::Parser;

use cli::Cli;
use config::Settings;
use error::AppError;

/// Entry point shared by `main.rs`: parse flags, resolve settings, install
/// the crash hook and journal, then hand off to the controller
/// (`spec.md` §4.6). Grounded on the teacher's `lib.rs::run`'s "resolve
/// paths, install the crash hook, then build and run" ordering.
pub async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.clone(), cli.demo, cli.debug);

    logging::init(settings.debug);

    let data_dir = dirs::data_dir().unwrap_or_else(std::env::temp_dir).join("azure-tui");
    logging::install_crash_hook(&data_dir);
    logging::open_journal(&settings.journal_path);

    tracing::info!(demo_mode = settings.demo_mode, "starting azure-tui v{}", env!("CARGO_PKG_VERSION"));

    let result = controller::run(settings).await;

    logging::close_journal();
    result
}
