use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a completed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Response received within the timeout with a 2xx/3xx status.
    Up,
    /// Response received with a failing status, or the probe timed out.
    Down,
    /// Transport-level failure (DNS, connection refused, TLS).
    Error,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Up => write!(f, "up"),
            Outcome::Down => write!(f, "down"),
            Outcome::Error => write!(f, "error"),
        }
    }
}

/// Current health of a target as seen by the aggregator.
///
/// Same vocabulary as [`Outcome`] plus `Unknown` for a target that has no
/// recorded history yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Up,
    Down,
    Error,
    Unknown,
}

impl From<Outcome> for HealthState {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Up => HealthState::Up,
            Outcome::Down => HealthState::Down,
            Outcome::Error => HealthState::Error,
        }
    }
}

/// System-wide status derived from all targets' latest outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Degraded,
    Down,
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverallStatus::Healthy => write!(f, "healthy"),
            OverallStatus::Degraded => write!(f, "degraded"),
            OverallStatus::Down => write!(f, "down"),
        }
    }
}

/// Result of a single check against a target. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Name of the target that was checked
    pub target_name: String,

    /// When the check was performed
    pub timestamp: DateTime<Utc>,

    /// Classification of the outcome
    pub outcome: Outcome,

    /// Wall-clock latency, present whenever a response arrived
    pub latency_ms: Option<u64>,

    /// HTTP status code, present whenever a response arrived
    pub status_code: Option<u16>,

    /// Error text for failed checks
    pub detail: Option<String>,
}

impl CheckResult {
    /// A successful check (2xx/3xx within the timeout).
    pub fn up(target_name: impl Into<String>, latency_ms: u64, status_code: u16) -> Self {
        Self {
            target_name: target_name.into(),
            timestamp: Utc::now(),
            outcome: Outcome::Up,
            latency_ms: Some(latency_ms),
            status_code: Some(status_code),
            detail: None,
        }
    }

    /// A response with a failing status code.
    pub fn down(target_name: impl Into<String>, latency_ms: u64, status_code: u16) -> Self {
        Self {
            target_name: target_name.into(),
            timestamp: Utc::now(),
            outcome: Outcome::Down,
            latency_ms: Some(latency_ms),
            status_code: Some(status_code),
            detail: Some(format!("HTTP {status_code}")),
        }
    }

    /// A probe that exceeded its timeout.
    pub fn timed_out(target_name: impl Into<String>) -> Self {
        Self {
            target_name: target_name.into(),
            timestamp: Utc::now(),
            outcome: Outcome::Down,
            latency_ms: None,
            status_code: None,
            detail: Some("timeout".into()),
        }
    }

    /// A transport-level failure, distinct from a timeout.
    pub fn transport_error(target_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            target_name: target_name.into(),
            timestamp: Utc::now(),
            outcome: Outcome::Error,
            latency_ms: None,
            status_code: None,
            detail: Some(detail.into()),
        }
    }
}

/// Point-in-time derived status view for one target. Never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub name: String,
    pub url: String,
    pub current_status: HealthState,
    pub last_checked: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub consecutive_failures: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Outcome::Up).unwrap(), "\"up\"");
        assert_eq!(serde_json::to_string(&Outcome::Down).unwrap(), "\"down\"");
        assert_eq!(serde_json::to_string(&Outcome::Error).unwrap(), "\"error\"");
        assert_eq!(serde_json::to_string(&HealthState::Unknown).unwrap(), "\"unknown\"");
        assert_eq!(serde_json::to_string(&OverallStatus::Degraded).unwrap(), "\"degraded\"");
    }

    #[test]
    fn up_result_carries_latency_and_status() {
        let result = CheckResult::up("example", 200, 200);
        assert_eq!(result.outcome, Outcome::Up);
        assert_eq!(result.latency_ms, Some(200));
        assert_eq!(result.status_code, Some(200));
        assert!(result.detail.is_none());
    }

    #[test]
    fn down_result_records_http_status_detail() {
        let result = CheckResult::down("example", 35, 503);
        assert_eq!(result.outcome, Outcome::Down);
        assert_eq!(result.detail.as_deref(), Some("HTTP 503"));
    }

    #[test]
    fn timeout_is_down_without_latency() {
        let result = CheckResult::timed_out("example");
        assert_eq!(result.outcome, Outcome::Down);
        assert!(result.latency_ms.is_none());
        assert_eq!(result.detail.as_deref(), Some("timeout"));
    }

    #[test]
    fn transport_failure_is_error() {
        let result = CheckResult::transport_error("example", "dns error");
        assert_eq!(result.outcome, Outcome::Error);
        assert!(result.status_code.is_none());
    }

    #[test]
    fn snapshot_omits_empty_optionals_on_the_wire() {
        let snapshot = StatusSnapshot {
            name: "example".into(),
            url: "https://example.com".into(),
            current_status: HealthState::Unknown,
            last_checked: None,
            latency_ms: None,
            status_code: None,
            detail: None,
            consecutive_failures: 0,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"unknown\""));
        assert!(!json.contains("latency_ms"));
        assert!(!json.contains("detail"));
    }
}
