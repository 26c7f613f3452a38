use std::sync::Arc;

use actix_web::web::ServiceConfig;
use watchpost::{HistoryStore, StatusAggregator, TargetRegistry};

mod health;
mod status;

/// Shared read-side handles into the monitoring engine.
pub struct AppState {
    pub registry: Arc<TargetRegistry>,
    pub history: Arc<HistoryStore>,
    pub aggregator: StatusAggregator,
}

impl AppState {
    pub fn new(registry: Arc<TargetRegistry>, history: Arc<HistoryStore>) -> Self {
        let aggregator = StatusAggregator::new(Arc::clone(&registry), Arc::clone(&history));
        Self { registry, history, aggregator }
    }
}

pub fn routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_route)
        .service(status::monitoring_status)
        .service(status::target_status)
        .service(status::target_history)
        .service(status::download_csv);
}
