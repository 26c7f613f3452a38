use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::executor::CheckExecutor;
use super::history::HistoryStore;
use super::types::CheckResult;
use crate::config::MonitoringOptions;
use crate::persistence::ResultSink;
use crate::registry::{Target, TargetRegistry};

/// How often expired history entries are swept.
const EVICTION_SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Capacity of the channel feeding the persistence sink.
const SINK_CHANNEL_CAPACITY: usize = 256;

/// Drives the check loops: one independent task per target, a history
/// eviction sweeper and an optional persistence sink worker.
///
/// Each target loop ticks on a fixed interval and awaits its own probe, so
/// at most one check per target is in flight at any instant; a probe that
/// overruns the interval skips ticks instead of stacking concurrent checks.
pub struct MonitoringScheduler {
    registry: Arc<TargetRegistry>,
    executor: Arc<CheckExecutor>,
    history: Arc<HistoryStore>,
    check_interval: Duration,
    drain_timeout: Duration,
    cancel: CancellationToken,
    tasks: JoinSet<()>,
}

impl MonitoringScheduler {
    pub fn new(
        registry: Arc<TargetRegistry>,
        executor: Arc<CheckExecutor>,
        history: Arc<HistoryStore>,
        options: &MonitoringOptions,
    ) -> Self {
        Self {
            registry,
            executor,
            history,
            check_interval: Duration::from_secs(options.check_interval_seconds),
            // In-flight probes finish within their own timeout, plus a
            // second of grace for recording.
            drain_timeout: Duration::from_secs(options.timeout_seconds + 1),
            cancel: CancellationToken::new(),
            tasks: JoinSet::new(),
        }
    }

    /// Spawn every check loop plus the eviction sweeper.
    ///
    /// When a sink is given, results are also forwarded to a sink worker
    /// that persists them best-effort off the check path.
    pub fn start(&mut self, sink: Option<Arc<dyn ResultSink>>) {
        let sink_tx = sink.map(|sink| {
            let (tx, rx) = mpsc::channel(SINK_CHANNEL_CAPACITY);
            self.tasks.spawn(sink_loop(sink, rx));
            tx
        });

        for target in self.registry.targets() {
            self.tasks.spawn(check_loop(
                target.clone(),
                Arc::clone(&self.executor),
                Arc::clone(&self.history),
                sink_tx.clone(),
                self.check_interval,
                self.cancel.clone(),
            ));
        }
        // The loops hold the only senders; the sink worker exits once every
        // loop has stopped and the queue is drained.
        drop(sink_tx);

        self.tasks.spawn(eviction_loop(
            Arc::clone(&self.history),
            self.cancel.clone(),
        ));

        info!(targets = self.registry.targets().len(), "monitoring scheduler started");
    }

    /// Stop all loops, letting in-flight checks complete.
    ///
    /// Drain time is bounded: tasks still running after the grace period are
    /// aborted so shutdown never hangs on an unresponsive probe.
    pub async fn shutdown(mut self) {
        info!("stopping monitoring scheduler");
        self.cancel.cancel();

        let drain = async {
            while self.tasks.join_next().await.is_some() {}
        };
        if tokio::time::timeout(self.drain_timeout, drain).await.is_err() {
            warn!("drain timeout elapsed, aborting remaining monitoring tasks");
            self.tasks.shutdown().await;
        }
    }
}

/// Periodic check loop for a single target.
async fn check_loop(
    target: Target,
    executor: Arc<CheckExecutor>,
    history: Arc<HistoryStore>,
    sink_tx: Option<mpsc::Sender<CheckResult>>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = timer.tick() => {}
        }

        let result = executor.execute_check(&target).await;

        if let Some(tx) = &sink_tx {
            // Never let a slow sink delay the next tick.
            if tx.try_send(result.clone()).is_err() {
                warn!(target_name = %target.name, "sink queue full, dropping result");
            }
        }

        if let Err(e) = history.record(result) {
            warn!(target_name = %target.name, "failed to record check result: {e}");
        }
    }
}

/// Sweeps expired history entries on a coarse fixed period, independent of
/// the check loops so sustained probe load cannot starve eviction.
async fn eviction_loop(history: Arc<HistoryStore>, cancel: CancellationToken) {
    let mut timer = interval(EVICTION_SWEEP_PERIOD);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = timer.tick() => history.evict_expired(Utc::now()),
        }
    }
}

/// Persists queued results until every check loop has stopped.
async fn sink_loop(sink: Arc<dyn ResultSink>, mut rx: mpsc::Receiver<CheckResult>) {
    while let Some(result) = rx.recv().await {
        if let Err(e) = sink.append(&result).await {
            warn!("failed to persist check result: {e:#}");
        }
    }
}
