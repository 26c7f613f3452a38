//! URL monitoring engine.
//!
//! Periodically probes a configured set of targets over HTTP, records every
//! outcome in a retention-bounded in-memory history, and projects the history
//! into per-target and overall status views. The HTTP API in `apps/server`
//! is a read-only consumer of this crate.

pub mod config;
pub mod monitoring;
pub mod persistence;
pub mod registry;

pub use config::{Config, ConfigError};
pub use monitoring::history::{HistoryError, HistoryStore};
pub use monitoring::scheduler::MonitoringScheduler;
pub use monitoring::status::StatusAggregator;
pub use monitoring::types::CheckResult;
pub use registry::{Target, TargetRegistry};
