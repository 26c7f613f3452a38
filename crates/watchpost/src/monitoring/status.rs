use std::sync::Arc;

use super::history::{HistoryError, HistoryStore};
use super::types::{CheckResult, HealthState, Outcome, OverallStatus, StatusSnapshot};
use crate::registry::TargetRegistry;

/// Read-side projection of the history store.
///
/// Owns no state of its own; every answer is computed from the store's
/// current content.
pub struct StatusAggregator {
    registry: Arc<TargetRegistry>,
    history: Arc<HistoryStore>,
}

impl StatusAggregator {
    pub fn new(registry: Arc<TargetRegistry>, history: Arc<HistoryStore>) -> Self {
        Self { registry, history }
    }

    /// Current status snapshot for one target.
    ///
    /// A target with no recorded history reports `unknown` rather than being
    /// treated as up or down.
    pub fn target_status(&self, name: &str) -> Result<StatusSnapshot, HistoryError> {
        let target = self
            .registry
            .get(name)
            .ok_or_else(|| HistoryError::UnknownTarget(name.to_string()))?;
        let window = self.history.recent(name, None)?;

        let snapshot = match window.last() {
            Some(latest) => StatusSnapshot {
                name: target.name.clone(),
                url: target.url.clone(),
                current_status: latest.outcome.into(),
                last_checked: Some(latest.timestamp),
                latency_ms: latest.latency_ms,
                status_code: latest.status_code,
                detail: latest.detail.clone(),
                consecutive_failures: consecutive_failures(&window),
            },
            // No retained history: unknown, though `last_checked` still
            // reports a check whose result has been evicted since.
            None => StatusSnapshot {
                name: target.name.clone(),
                url: target.url.clone(),
                current_status: HealthState::Unknown,
                last_checked: self.history.last_recorded(name)?,
                latency_ms: None,
                status_code: None,
                detail: None,
                consecutive_failures: 0,
            },
        };

        Ok(snapshot)
    }

    /// Snapshots for every registered target, in config order.
    pub fn all_statuses(&self) -> Vec<StatusSnapshot> {
        self.registry
            .targets()
            .iter()
            .filter_map(|t| self.target_status(&t.name).ok())
            .collect()
    }

    /// Combine all targets' latest outcomes into one system status.
    ///
    /// Targets without history are excluded from the calculation. Among the
    /// rest: all up is healthy, all down/error is down, anything mixed is
    /// degraded. With no recorded outcome anywhere the system reports
    /// healthy, since "every latest outcome is up" holds vacuously.
    pub fn overall_status(&self) -> OverallStatus {
        let latest_outcomes: Vec<Outcome> = self
            .registry
            .targets()
            .iter()
            .filter_map(|t| self.history.latest(&t.name).ok().flatten())
            .map(|result| result.outcome)
            .collect();

        if latest_outcomes.iter().all(|o| *o == Outcome::Up) {
            OverallStatus::Healthy
        } else if latest_outcomes.iter().all(|o| *o != Outcome::Up) {
            OverallStatus::Down
        } else {
            OverallStatus::Degraded
        }
    }
}

/// Length of the trailing non-up run in a chronological window.
fn consecutive_failures(window: &[CheckResult]) -> u32 {
    window.iter().rev().take_while(|r| r.outcome != Outcome::Up).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetConfig;

    fn fixture(names: &[&str]) -> (Arc<TargetRegistry>, Arc<HistoryStore>, StatusAggregator) {
        let configs: Vec<TargetConfig> = names
            .iter()
            .map(|n| TargetConfig { name: n.to_string(), url: format!("https://{n}.example.com") })
            .collect();
        let registry = Arc::new(TargetRegistry::new(&configs));
        let history = Arc::new(HistoryStore::new(&registry, 24));
        let aggregator = StatusAggregator::new(Arc::clone(&registry), Arc::clone(&history));
        (registry, history, aggregator)
    }

    #[test]
    fn snapshot_reflects_latest_result() {
        let (_, history, aggregator) = fixture(&["example"]);
        history.record(CheckResult::up("example", 200, 200)).unwrap();

        let snapshot = aggregator.target_status("example").unwrap();
        assert_eq!(snapshot.current_status, HealthState::Up);
        assert_eq!(snapshot.latency_ms, Some(200));
        assert_eq!(snapshot.url, "https://example.example.com");
        assert!(snapshot.last_checked.is_some());
        assert_eq!(snapshot.consecutive_failures, 0);
    }

    #[test]
    fn never_checked_target_is_unknown() {
        let (_, _, aggregator) = fixture(&["example"]);

        let snapshot = aggregator.target_status("example").unwrap();
        assert_eq!(snapshot.current_status, HealthState::Unknown);
        assert!(snapshot.last_checked.is_none());
        assert_eq!(snapshot.consecutive_failures, 0);
    }

    #[test]
    fn evicted_target_is_unknown_but_keeps_last_checked() {
        let (_, history, aggregator) = fixture(&["example"]);
        let mut result = CheckResult::up("example", 10, 200);
        result.timestamp = chrono::Utc::now() - chrono::Duration::hours(30);
        history.record(result).unwrap();
        history.evict_expired(chrono::Utc::now());

        let snapshot = aggregator.target_status("example").unwrap();
        assert_eq!(snapshot.current_status, HealthState::Unknown);
        assert!(snapshot.last_checked.is_some(), "eviction must not erase last_checked");
    }

    #[test]
    fn unknown_name_fails_not_defaults() {
        let (_, _, aggregator) = fixture(&["example"]);
        assert_eq!(
            aggregator.target_status("ghost").unwrap_err(),
            HistoryError::UnknownTarget("ghost".into())
        );
    }

    #[test]
    fn consecutive_failures_counts_trailing_run() {
        let (_, history, aggregator) = fixture(&["example"]);
        history.record(CheckResult::down("example", 10, 500)).unwrap();
        history.record(CheckResult::up("example", 10, 200)).unwrap();
        history.record(CheckResult::timed_out("example")).unwrap();
        history.record(CheckResult::transport_error("example", "refused")).unwrap();

        let snapshot = aggregator.target_status("example").unwrap();
        assert_eq!(snapshot.current_status, HealthState::Error);
        assert_eq!(snapshot.consecutive_failures, 2);
    }

    #[test]
    fn overall_healthy_iff_all_latest_up() {
        let (_, history, aggregator) = fixture(&["a", "b"]);
        history.record(CheckResult::up("a", 10, 200)).unwrap();
        history.record(CheckResult::up("b", 10, 204)).unwrap();
        assert_eq!(aggregator.overall_status(), OverallStatus::Healthy);

        history.record(CheckResult::down("b", 10, 503)).unwrap();
        assert_ne!(aggregator.overall_status(), OverallStatus::Healthy);
    }

    #[test]
    fn overall_down_when_every_target_failing() {
        let (_, history, aggregator) = fixture(&["a", "b"]);
        history.record(CheckResult::down("a", 10, 500)).unwrap();
        history.record(CheckResult::transport_error("b", "dns")).unwrap();
        assert_eq!(aggregator.overall_status(), OverallStatus::Down);
    }

    #[test]
    fn overall_degraded_when_mixed() {
        let (_, history, aggregator) = fixture(&["a", "b"]);
        history.record(CheckResult::up("a", 10, 200)).unwrap();
        history.record(CheckResult::down("b", 10, 500)).unwrap();
        assert_eq!(aggregator.overall_status(), OverallStatus::Degraded);
    }

    #[test]
    fn unknown_targets_are_excluded_from_overall() {
        let (_, history, aggregator) = fixture(&["a", "b"]);
        history.record(CheckResult::up("a", 10, 200)).unwrap();
        // "b" never checked: neither up nor down.
        assert_eq!(aggregator.overall_status(), OverallStatus::Healthy);

        history.record(CheckResult::down("a", 10, 500)).unwrap();
        assert_eq!(aggregator.overall_status(), OverallStatus::Down);
    }

    #[test]
    fn no_history_anywhere_reports_healthy() {
        let (_, _, aggregator) = fixture(&["a", "b"]);
        assert_eq!(aggregator.overall_status(), OverallStatus::Healthy);
    }

    #[test]
    fn all_statuses_follow_config_order() {
        let (_, history, aggregator) = fixture(&["b", "a"]);
        history.record(CheckResult::up("a", 10, 200)).unwrap();

        let snapshots = aggregator.all_statuses();
        let names: Vec<_> = snapshots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(snapshots[0].current_status, HealthState::Unknown);
        assert_eq!(snapshots[1].current_status, HealthState::Up);
    }
}
