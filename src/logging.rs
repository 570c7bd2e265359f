//! Tracing setup and the append-only debug journal (`spec.md` §6, §9).
//!
//! The journal is the only process-wide mutable state outside the reducer:
//! a single file handle, opened once at startup and closed on exit.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static CRASH_LOG_DIR: OnceLock<PathBuf> = OnceLock::new();
static JOURNAL: OnceLock<Mutex<Option<File>>> = OnceLock::new();

/// Initialize tracing with a compact stdout layer.
/// Default level: INFO, override via `RUST_LOG`; `DEBUG=true` raises the
/// crate's own target to DEBUG (see `config::Settings::debug`).
pub fn init(debug: bool) {
    let default_filter = if debug {
        "info,azure_tui=debug"
    } else {
        "info,azure_tui=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .init();

    tracing::debug!("tracing initialized");
}

/// Install a panic hook that writes crash details to disk before handing
/// off to the previous hook. Must run after the journal directory is known.
pub fn install_crash_hook(data_dir: &Path) {
    if std::env::var("RUST_BACKTRACE").is_err() {
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    let crash_dir = data_dir.join("crash_logs");
    let _ = std::fs::create_dir_all(&crash_dir);
    let _ = CRASH_LOG_DIR.set(crash_dir);

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Some(dir) = CRASH_LOG_DIR.get() {
            let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            let path = dir.join(format!("crash_{timestamp}.log"));

            let mut report = String::new();
            report.push_str(&format!(
                "=== AZURE-TUI CRASH REPORT ===\nTime: {}\nVersion: {}\n\n",
                chrono::Local::now().to_rfc3339(),
                env!("CARGO_PKG_VERSION"),
            ));
            if let Some(msg) = info.payload().downcast_ref::<&str>() {
                report.push_str(&format!("Panic: {msg}\n"));
            } else if let Some(msg) = info.payload().downcast_ref::<String>() {
                report.push_str(&format!("Panic: {msg}\n"));
            }
            if let Some(loc) = info.location() {
                report.push_str(&format!("Location: {}:{}:{}\n", loc.file(), loc.line(), loc.column()));
            }
            report.push_str(&format!(
                "\nBacktrace:\n{}\n",
                std::backtrace::Backtrace::force_capture()
            ));

            let _ = std::fs::write(&path, &report);
            eprintln!("[CRASH] report written to {}", path.display());
        }
        prev_hook(info);
    }));

    tracing::info!("crash hook installed");
}

/// Open the append-only debug journal at `path`. A reducer panic, a dropped
/// subprocess, or a notable controller transition all get one line here.
/// Absence/failure to open is non-fatal: journaling is a debugging aid, never
/// read by the application itself.
pub fn open_journal(path: &Path) {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => {
            let _ = JOURNAL.set(Mutex::new(Some(f)));
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not open debug journal");
        }
    }
}

/// Append a single line to the journal, timestamped. No-op if the journal
/// was never opened or failed to open.
pub fn journal(line: &str) {
    let Some(lock) = JOURNAL.get() else { return };
    let mut guard = lock.lock().unwrap_or_else(|p| p.into_inner());
    if let Some(file) = guard.as_mut() {
        let ts = chrono::Local::now().to_rfc3339();
        let _ = writeln!(file, "[{ts}] {line}");
    }
}

/// Close the journal file handle. Called once on quit.
pub fn close_journal() {
    if let Some(lock) = JOURNAL.get() {
        let mut guard = lock.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }
}
