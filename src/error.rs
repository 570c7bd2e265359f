use std::time::Duration;

/// App-wide error type. Every fallible function in the core returns
/// `Result<T, AppError>`.
#[derive(Debug, thiserror::Error, Clone)]
pub enum AppError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("process exited with code {code}: {stderr_sample}")]
    NonZeroExit { code: i32, stderr_sample: String },

    #[error("failed to spawn process: {0}")]
    Spawn(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Short, stable category tag used in status-line messages (`spec.md` §7).
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Timeout(_) => "timeout",
            AppError::NonZeroExit { .. } => "non_zero_exit",
            AppError::Spawn(_) => "spawn",
            AppError::Decode(_) => "decode",
            AppError::Precondition(_) => "precondition",
            AppError::Network(_) => "network",
            AppError::Config(_) => "config",
            AppError::Internal(_) => "internal",
        }
    }

    /// Whether this error is recoverable (substitute stub data and continue)
    /// as opposed to an unrecoverable startup failure.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Config(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Decode(e.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Spawn(e.to_string())
    }
}
