//! C1 — Subprocess Runner (`spec.md` §4.1).
//!
//! Grounded on `engine/runner.rs::run_execution`'s
//! `Command::new(..).spawn()` + `tokio::time::timeout(..)` pattern,
//! generalized from "run one Claude CLI execution and stream its stdout"
//! to "run any argv under a deadline and classify the failure". The single
//! invariant the teacher enforces implicitly (every spawn is wrapped in a
//! timeout) is made structural here: `run` has no overload that omits
//! `deadline` (`spec.md` §9 "Subprocess management").

use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::error::AppError;

const STDERR_SAMPLE_LEN: usize = 500;

/// Recommended deadlines per operation class (`spec.md` §4.1 table).
pub mod deadlines {
    use std::time::Duration;

    pub const LIST: Duration = Duration::from_secs(15);
    pub const INSPECT: Duration = Duration::from_secs(10);
    pub const LIFECYCLE: Duration = Duration::from_secs(30);
    pub const CREATE_LIGHT: Duration = Duration::from_secs(60);
    pub const SCALE: Duration = Duration::from_secs(120);
    pub const LARGE_DELETE: Duration = Duration::from_secs(300);
}

/// Run `argv` to completion under `deadline`, returning raw stdout bytes on
/// success. Every invocation MUST carry a deadline — there is no
/// "no-timeout" entry point (`spec.md` §4.1).
pub async fn run(argv: &[String], deadline: Duration) -> Result<Vec<u8>, AppError> {
    if argv.is_empty() {
        return Err(AppError::Spawn("empty argv".into()));
    }

    let mut cmd = Command::new(&argv[0]);
    cmd.args(&argv[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        cmd.creation_flags(0x08000000); // CREATE_NO_WINDOW
    }

    let mut child = cmd.spawn().map_err(|e| AppError::Spawn(e.to_string()))?;

    let mut stdout = child.stdout.take().expect("stdout piped");
    let mut stderr = child.stderr.take().expect("stderr piped");

    let result = tokio::time::timeout(deadline, async {
        let mut out_buf = Vec::new();
        let mut err_buf = Vec::new();
        let (out_res, err_res) = tokio::join!(
            stdout.read_to_end(&mut out_buf),
            stderr.read_to_end(&mut err_buf),
        );
        out_res.map_err(|e| AppError::Spawn(e.to_string()))?;
        err_res.map_err(|e| AppError::Spawn(e.to_string()))?;
        let status = child.wait().await.map_err(|e| AppError::Spawn(e.to_string()))?;
        Ok::<_, AppError>((status, out_buf, err_buf))
    })
    .await;

    match result {
        Err(_elapsed) => {
            let _ = child.start_kill();
            Err(AppError::Timeout(deadline))
        }
        Ok(Err(e)) => Err(e),
        Ok(Ok((status, out_buf, err_buf))) => {
            if status.success() {
                Ok(out_buf)
            } else {
                let stderr_text = String::from_utf8_lossy(&err_buf);
                let sample: String = stderr_text.chars().take(STDERR_SAMPLE_LEN).collect();
                Err(AppError::NonZeroExit {
                    code: status.code().unwrap_or(-1),
                    stderr_sample: sample,
                })
            }
        }
    }
}

/// Run and decode the stdout as JSON into `T`. Decode failures are a
/// distinct error class from non-zero exit (`spec.md` §4.1).
pub async fn run_json<T: serde::de::DeserializeOwned>(
    argv: &[String],
    deadline: Duration,
) -> Result<T, AppError> {
    let bytes = run(argv, deadline).await?;
    serde_json::from_slice(&bytes).map_err(|e| AppError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn successful_command_returns_stdout() {
        let out = run(&argv(&["echo", "hello"]), Duration::from_secs(5)).await.unwrap();
        assert_eq!(String::from_utf8_lossy(&out).trim(), "hello");
    }

    #[tokio::test]
    async fn nonzero_exit_is_classified() {
        let err = run(&argv(&["sh", "-c", "exit 3"]), Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            AppError::NonZeroExit { code, .. } => assert_eq!(code, 3),
            other => panic!("expected NonZeroExit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn timeout_kills_process_and_classifies() {
        let start = std::time::Instant::now();
        let err = run(&argv(&["sleep", "5"]), Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
        // `spec.md` §8 property 1: elapsed wall time <= deadline + small epsilon.
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn spawn_failure_on_missing_binary() {
        let err = run(&argv(&["definitely-not-a-real-binary-xyz"]), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Spawn(_)));
    }

    #[tokio::test]
    async fn decode_failure_on_non_json_stdout() {
        let err = run_json::<serde_json::Value>(&argv(&["echo", "not json"]), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }
}
