use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use super::types::CheckResult;
use crate::registry::TargetRegistry;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("unknown target: {0}")]
    UnknownTarget(String),
}

/// One target's slice of history.
///
/// `last_recorded` survives eviction, keeping "checked, but everything has
/// expired" distinguishable from "never checked."
#[derive(Debug, Default)]
struct Window {
    entries: VecDeque<CheckResult>,
    last_recorded: Option<DateTime<Utc>>,
}

/// Append-only, retention-bounded record of check results per target.
///
/// One window per registered target, created up front: an empty window means
/// "registered but not yet observed", while a missing window means the name
/// is unknown and queries fail with [`HistoryError::UnknownTarget`].
///
/// Each window has its own mutex. The scheduler is the only writer and the
/// aggregator/API are readers, locks are held for short append/clone
/// operations only and no cross-target locking exists.
pub struct HistoryStore {
    windows: HashMap<String, Mutex<Window>>,
    retention: Duration,
}

impl HistoryStore {
    pub fn new(registry: &TargetRegistry, retention_hours: u64) -> Self {
        let windows = registry
            .targets()
            .iter()
            .map(|t| (t.name.clone(), Mutex::new(Window::default())))
            .collect();
        Self { windows, retention: Duration::hours(retention_hours as i64) }
    }

    fn window(&self, name: &str) -> Result<&Mutex<Window>, HistoryError> {
        self.windows.get(name).ok_or_else(|| HistoryError::UnknownTarget(name.to_string()))
    }

    /// Append a result to its target's window.
    ///
    /// Entries arrive in completion order, which per target equals dispatch
    /// order; the window stays timestamp-ascending without sorting.
    pub fn record(&self, result: CheckResult) -> Result<(), HistoryError> {
        let mut window = self.window(&result.target_name)?.lock().expect("history lock poisoned");
        window.last_recorded = Some(result.timestamp);
        window.entries.push_back(result);
        Ok(())
    }

    /// Recent results in chronological order (newest last).
    ///
    /// `limit` keeps only the most recent N entries.
    pub fn recent(
        &self,
        name: &str,
        limit: Option<usize>,
    ) -> Result<Vec<CheckResult>, HistoryError> {
        let window = self.window(name)?.lock().expect("history lock poisoned");
        let skip = match limit {
            Some(limit) => window.entries.len().saturating_sub(limit),
            None => 0,
        };
        Ok(window.entries.iter().skip(skip).cloned().collect())
    }

    /// The most recent retained result for a target.
    pub fn latest(&self, name: &str) -> Result<Option<CheckResult>, HistoryError> {
        let window = self.window(name)?.lock().expect("history lock poisoned");
        Ok(window.entries.back().cloned())
    }

    /// When the target was last checked, even if that result has since been
    /// evicted. `None` only for a target never checked at all.
    pub fn last_recorded(&self, name: &str) -> Result<Option<DateTime<Utc>>, HistoryError> {
        let window = self.window(name)?.lock().expect("history lock poisoned");
        Ok(window.last_recorded)
    }

    /// Drop every entry older than the retention window.
    ///
    /// Idempotent; safe to run concurrently with `record` since each window
    /// is swept under its own lock. An emptied window stays valid.
    pub fn evict_expired(&self, now: DateTime<Utc>) {
        let cutoff = now - self.retention;
        for window in self.windows.values() {
            let mut window = window.lock().expect("history lock poisoned");
            while window.entries.front().is_some_and(|entry| entry.timestamp < cutoff) {
                window.entries.pop_front();
            }
        }
    }
}
