//! Durable sinks for check results.
//!
//! The engine's contract with persistence is best-effort: every recorded
//! result is eventually appended, but a sink failure never propagates into
//! the check path.

pub mod csv_file;
pub mod export;

use crate::monitoring::types::CheckResult;

pub use csv_file::CsvFileSink;
pub use export::{ExportError, export_csv};

/// Narrow interface the engine writes through.
#[async_trait::async_trait]
pub trait ResultSink: Send + Sync {
    /// Append a single check result to the durable medium.
    async fn append(&self, result: &CheckResult) -> anyhow::Result<()>;
}

/// Column order shared by the append sink and the history export.
pub(crate) const CSV_HEADER: [&str; 7] =
    ["name", "url", "timestamp", "outcome", "latency_ms", "status_code", "detail"];

pub(crate) fn csv_record(result: &CheckResult, url: &str) -> [String; 7] {
    [
        result.target_name.clone(),
        url.to_string(),
        result.timestamp.to_rfc3339(),
        result.outcome.to_string(),
        result.latency_ms.map(|v| v.to_string()).unwrap_or_default(),
        result.status_code.map(|v| v.to_string()).unwrap_or_default(),
        result.detail.clone().unwrap_or_default(),
    ]
}
