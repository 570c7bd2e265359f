//! C3 — Dashboard Aggregator (`spec.md` §4.3).
//!
//! Fans the five independent provider queries out concurrently and streams
//! progress frames back to the controller as each one settles. Grounded on
//! `engine/queue.rs::ConcurrencyTracker`'s bookkeeping shape (per-key status
//! tracked in a map, admitted/settled counts driving a single summary
//! value) generalized from "per-persona running set" to "per-kind fetch
//! status for one resource".

use std::time::Instant;

use tokio::sync::mpsc;

use crate::adapters::azure_cli;
use crate::model::dashboard::{DashboardProgress, DashboardSnapshot, Kind, KindStatus, PerKindState};

/// Run all five dashboard queries for `resource_id` concurrently, sending a
/// `DashboardProgress` frame on `tx` after every settle and the final
/// `DashboardSnapshot` once all have settled (`spec.md` §8 property 6: the
/// final frame has `percent == 100` and `completed + failed == total`).
pub async fn aggregate(resource_id: String, subscription_id: String, tx: mpsc::UnboundedSender<DashboardProgress>) -> DashboardSnapshot {
    let mut progress = DashboardProgress::initial(&resource_id);
    let _ = tx.send(progress.clone_for_frame());

    let mut snapshot = DashboardSnapshot::new(&resource_id);

    let (details_res, metrics_res, usage_res, alarms_res, logs_res) = tokio::join!(
        azure_cli::show_resource(&resource_id),
        azure_cli::get_metrics(&resource_id),
        azure_cli::get_usage(&subscription_id),
        azure_cli::get_alarms(&resource_id),
        azure_cli::get_logs(&resource_id),
    );

    settle(Kind::Details, details_res, &mut snapshot.details, &mut progress, &mut snapshot.errors);
    let _ = tx.send(progress.clone_for_frame());
    settle(Kind::Metrics, metrics_res, &mut snapshot.metrics, &mut progress, &mut snapshot.errors);
    let _ = tx.send(progress.clone_for_frame());
    settle(Kind::Usage, usage_res, &mut snapshot.usage, &mut progress, &mut snapshot.errors);
    let _ = tx.send(progress.clone_for_frame());
    settle(Kind::Alarms, alarms_res, &mut snapshot.alarms, &mut progress, &mut snapshot.errors);
    let _ = tx.send(progress.clone_for_frame());
    settle(Kind::Logs, logs_res, &mut snapshot.logs, &mut progress, &mut snapshot.errors);
    let _ = tx.send(progress.clone_for_frame());

    // `spec.md` §4.3 step 4: partial reflects whether any query failed, not
    // whether stub substitution left a gap — stub data fills every field
    // regardless.
    snapshot.partial = !snapshot.errors.is_empty();
    snapshot.last_updated = chrono::Utc::now().to_rfc3339();
    snapshot
}

/// Record one settled query into `slot`, `progress`, and the snapshot's
/// error list, then refresh the derived percent/ETA. A failed query still
/// populates `slot` with `kind`'s deterministic stub value (`spec.md` §4.3
/// step 3d, §8 property 2: "never both nil").
fn settle(
    kind: Kind,
    result: Result<serde_json::Value, crate::error::AppError>,
    slot: &mut Option<serde_json::Value>,
    progress: &mut DashboardProgress,
    errors: &mut Vec<String>,
) {
    match result {
        Ok(value) => {
            *slot = Some(value);
            progress.completed += 1;
            progress.per_kind.insert(
                kind,
                PerKindState { status: KindStatus::Completed, started_at: Instant::now(), count: Some(1), err: None },
            );
        }
        Err(e) => {
            *slot = Some(kind.stub_value());
            progress.failed += 1;
            let msg = e.to_string();
            errors.push(format!("{kind}: {msg}"));
            progress.errors.push(msg.clone());
            progress.per_kind.insert(
                kind,
                PerKindState { status: KindStatus::Failed, started_at: Instant::now(), count: None, err: Some(msg) },
            );
        }
    }
    progress.current = Some(kind);
    progress.percent = (progress.completed + progress.failed) as f64 / progress.total as f64 * 100.0;
    progress.recompute_eta();
}

impl DashboardProgress {
    /// Shallow clone for sending over the channel; `Instant` fields are
    /// `Copy` so a plain `.clone()` would do, but this name documents that
    /// the value is a point-in-time frame, not a handle into live state.
    fn clone_for_frame(&self) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn aggregate_emits_five_progress_frames_then_terminal_snapshot() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(aggregate("res-1".to_string(), "sub-1".to_string(), tx));

        let mut frames = Vec::new();
        while let Some(frame) = rx.recv().await {
            frames.push(frame);
        }
        let snapshot = handle.await.unwrap();

        // initial frame + one per kind settled
        assert_eq!(frames.len(), Kind::ALL.len() + 1);
        let last = frames.last().unwrap();
        assert!(last.is_terminal());
        assert_eq!(last.completed + last.failed, last.total);
        assert_eq!(snapshot.resource_id, "res-1");
    }
}
