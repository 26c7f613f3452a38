use std::sync::Arc;

use tracing::debug;

use super::checker::{Checker, ProbeError};
use super::types::CheckResult;
use crate::registry::Target;

/// Executes individual checks and classifies every outcome into data.
///
/// A check never fails at this level: success, failing status, timeout and
/// transport errors all come back as a [`CheckResult`], so the scheduler
/// treats every outcome uniformly.
pub struct CheckExecutor {
    checker: Arc<dyn Checker>,
}

impl CheckExecutor {
    pub fn new(checker: Arc<dyn Checker>) -> Self {
        Self { checker }
    }

    /// Probe one target and classify the outcome.
    ///
    /// Status policy: 2xx and 3xx count as up, anything else as down. A
    /// timeout is down; a transport failure is an error.
    pub async fn execute_check(&self, target: &Target) -> CheckResult {
        let result = match self.checker.probe(&target.url).await {
            Ok(response) if success_status(response.status_code) => {
                CheckResult::up(&target.name, response.latency_ms, response.status_code)
            }
            Ok(response) => {
                CheckResult::down(&target.name, response.latency_ms, response.status_code)
            }
            Err(ProbeError::Timeout) => CheckResult::timed_out(&target.name),
            Err(ProbeError::Transport(detail)) => {
                CheckResult::transport_error(&target.name, detail)
            }
        };

        debug!(
            target_name = %result.target_name,
            outcome = %result.outcome,
            latency_ms = result.latency_ms,
            "check completed"
        );

        result
    }
}

fn success_status(status_code: u16) -> bool {
    (200..400).contains(&status_code)
}
