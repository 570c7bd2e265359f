//! Configuration loading and the environment-variable surface (`spec.md` §6).
//!
//! Grounded on the teacher's settings-key pattern
//! (`db/settings_keys.rs` — named constants for each setting) and its
//! "absence of a config file is non-fatal" handling in `lib.rs::run`'s
//! `setup` closure.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Recognised environment variables (`spec.md` §6).
pub mod env_keys {
    pub const DEMO_MODE: &str = "DEMO_MODE";
    pub const DEBUG: &str = "DEBUG";
    pub const AUTO_AI: &str = "AUTO_AI";
    pub const USE_COPILOT: &str = "USE_COPILOT";
}

/// Resolved runtime settings: config-file values overridden by environment
/// variables, as described in `SPEC_FULL.md` §2a.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub default_subscription: Option<String>,
    pub interface: InterfacePrefs,
    pub llm: LlmPrefs,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterfacePrefs {
    pub theme: Option<String>,
    pub history_depth: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmPrefs {
    pub use_copilot: Option<bool>,
    pub auto_ai: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub demo_mode: bool,
    pub debug: bool,
    pub auto_ai: bool,
    pub use_copilot: bool,
    pub default_subscription: Option<String>,
    pub history_depth: usize,
    pub config_path: Option<PathBuf>,
    pub journal_path: PathBuf,
}

const DEFAULT_HISTORY_DEPTH: usize = 32;

impl Settings {
    /// Load settings: start from the YAML config file (if present), then
    /// apply env-var overrides. Missing/corrupt config file is non-fatal —
    /// `spec.md` §6 says "absence is non-fatal".
    pub fn load(cli_config_path: Option<PathBuf>, cli_demo: bool, cli_debug: bool) -> Self {
        let config_path = cli_config_path.or_else(default_config_path);
        let file_config = config_path
            .as_deref()
            .and_then(|p| load_file_config(p).ok())
            .unwrap_or_default();

        let demo_mode = cli_demo || env_flag(env_keys::DEMO_MODE);
        let debug = cli_debug || env_flag(env_keys::DEBUG);
        let auto_ai = env_flag(env_keys::AUTO_AI) || file_config.llm.auto_ai.unwrap_or(false);
        let use_copilot = env_flag(env_keys::USE_COPILOT) || file_config.llm.use_copilot.unwrap_or(false);

        Settings {
            demo_mode,
            debug,
            auto_ai,
            use_copilot,
            default_subscription: file_config.default_subscription,
            history_depth: file_config
                .interface
                .history_depth
                .unwrap_or(DEFAULT_HISTORY_DEPTH),
            config_path,
            journal_path: PathBuf::from("./debug.txt"),
        }
    }
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("azure-tui").join("config.yaml"))
}

fn load_file_config(path: &Path) -> Result<FileConfig, AppError> {
    let text = std::fs::read_to_string(path).map_err(|e| AppError::Config(e.to_string()))?;
    serde_yaml::from_str(&text).map_err(|e| AppError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_flag_accepts_true_and_1() {
        std::env::set_var("AZURE_TUI_TEST_FLAG", "true");
        assert!(env_flag("AZURE_TUI_TEST_FLAG"));
        std::env::set_var("AZURE_TUI_TEST_FLAG", "1");
        assert!(env_flag("AZURE_TUI_TEST_FLAG"));
        std::env::set_var("AZURE_TUI_TEST_FLAG", "false");
        assert!(!env_flag("AZURE_TUI_TEST_FLAG"));
        std::env::remove_var("AZURE_TUI_TEST_FLAG");
        assert!(!env_flag("AZURE_TUI_TEST_FLAG"));
    }

    #[test]
    fn missing_config_file_is_non_fatal() {
        let settings = Settings::load(Some(PathBuf::from("/nonexistent/azure-tui.yaml")), true, false);
        assert!(settings.demo_mode);
        assert_eq!(settings.history_depth, DEFAULT_HISTORY_DEPTH);
    }
}
