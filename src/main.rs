// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    // `spec.md` §6 exit codes: 0 on clean quit, non-zero on unrecoverable
    // startup failure (terminal init, config parse).
    if let Err(e) = azure_tui::run().await {
        eprintln!("azure-tui: {e}");
        std::process::exit(1);
    }
}
