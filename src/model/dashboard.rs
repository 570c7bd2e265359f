//! C3 data types — the enhanced dashboard (`spec.md` §3, §4.3).

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// One of the five independent provider queries fanned out by the
/// aggregator (`spec.md` glossary: "Kind").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Kind {
    Details,
    Metrics,
    Usage,
    Alarms,
    Logs,
}

impl Kind {
    pub const ALL: [Kind; 5] = [Kind::Details, Kind::Metrics, Kind::Usage, Kind::Alarms, Kind::Logs];

    /// Deterministic stand-in rendered in place of a field whose query
    /// failed, so the snapshot always has something to show
    /// (`spec.md` §4.3 step 3d: "substitute deterministic stub data").
    pub fn stub_value(&self) -> serde_json::Value {
        match self {
            Kind::Details => serde_json::json!({"stub": true, "note": "details unavailable"}),
            Kind::Metrics => serde_json::json!({"stub": true, "series": []}),
            Kind::Usage => serde_json::json!({"stub": true, "percent": 0}),
            Kind::Alarms => serde_json::json!({"stub": true, "alarms": []}),
            Kind::Logs => serde_json::json!({"stub": true, "lines": []}),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KindStatus {
    Pending,
    Loading,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerKindState {
    pub status: KindStatus,
    #[serde(skip, default = "Instant::now")]
    pub started_at: Instant,
    pub count: Option<usize>,
    pub err: Option<String>,
}

impl PerKindState {
    fn pending() -> Self {
        PerKindState {
            status: KindStatus::Pending,
            started_at: Instant::now(),
            count: None,
            err: None,
        }
    }
}

/// A single progress-update message emitted by the aggregator
/// (`spec.md` glossary: "Frame").
#[derive(Debug, Clone)]
pub struct DashboardProgress {
    pub resource_id: String,
    pub current: Option<Kind>,
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub percent: f64,
    pub per_kind: HashMap<Kind, PerKindState>,
    pub errors: Vec<String>,
    pub started_at: Instant,
    /// Advisory-only linear ETA, `spec.md` §4.3: "Non-normative".
    pub eta: String,
}

impl DashboardProgress {
    pub fn initial(resource_id: &str) -> Self {
        let mut per_kind = HashMap::new();
        for kind in Kind::ALL {
            per_kind.insert(kind, PerKindState::pending());
        }
        DashboardProgress {
            resource_id: resource_id.to_string(),
            current: None,
            total: Kind::ALL.len(),
            completed: 0,
            failed: 0,
            percent: 0.0,
            per_kind,
            errors: Vec::new(),
            started_at: Instant::now(),
            eta: "calculating...".to_string(),
        }
    }

    /// `spec.md` §8 property 6: "the final frame has percent=100 and
    /// completed+failed == total".
    pub fn is_terminal(&self) -> bool {
        self.completed + self.failed >= self.total
    }

    pub fn recompute_eta(&mut self) {
        let settled = self.completed + self.failed;
        if settled == 0 {
            self.eta = "calculating...".to_string();
            return;
        }
        if self.is_terminal() {
            self.eta = "done".to_string();
            return;
        }
        let elapsed = self.started_at.elapsed().as_secs_f64();
        let avg_per_completed = elapsed / settled as f64;
        let remaining = (self.total - settled) as f64;
        let eta_secs = avg_per_completed * remaining;
        self.eta = format!("~{}s", eta_secs.round().max(0.0) as u64);
    }
}

/// Partial snapshot is always renderable; every field independently `None`
/// if unavailable (`spec.md` §3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub resource_id: String,
    pub details: Option<serde_json::Value>,
    pub metrics: Option<serde_json::Value>,
    pub usage: Option<serde_json::Value>,
    pub alarms: Option<serde_json::Value>,
    pub logs: Option<serde_json::Value>,
    pub errors: Vec<String>,
    pub last_updated: String,
    pub partial: bool,
}

impl DashboardSnapshot {
    pub fn new(resource_id: &str) -> Self {
        DashboardSnapshot {
            resource_id: resource_id.to_string(),
            last_updated: chrono::Utc::now().to_rfc3339(),
            ..Default::default()
        }
    }

    /// `spec.md` §8 property 2: every field is non-nil real data or
    /// non-nil stub data, never both nil.
    pub fn all_fields_populated(&self) -> bool {
        self.details.is_some()
            && self.metrics.is_some()
            && self.usage.is_some()
            && self.alarms.is_some()
            && self.logs.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_progress_has_zero_percent_and_all_pending() {
        let p = DashboardProgress::initial("res1");
        assert_eq!(p.percent, 0.0);
        assert_eq!(p.total, 5);
        assert!(!p.is_terminal());
        for kind in Kind::ALL {
            assert_eq!(p.per_kind[&kind].status, KindStatus::Pending);
        }
    }

    #[test]
    fn terminal_when_all_kinds_settled() {
        let mut p = DashboardProgress::initial("res1");
        p.completed = 3;
        p.failed = 2;
        assert!(p.is_terminal());
    }

    #[test]
    fn snapshot_requires_all_fields_for_full_population() {
        let mut snap = DashboardSnapshot::new("res1");
        assert!(!snap.all_fields_populated());
        snap.details = Some(serde_json::json!({}));
        snap.metrics = Some(serde_json::json!({}));
        snap.usage = Some(serde_json::json!({}));
        snap.alarms = Some(serde_json::json!({}));
        snap.logs = Some(serde_json::json!({}));
        assert!(snap.all_fields_populated());
    }
}
