use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use watchpost::CheckResult;
use watchpost::monitoring::types::{OverallStatus, StatusSnapshot};
use watchpost::persistence::export_csv;

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct MonitoringStatusResponse {
    pub status: OverallStatus,
    pub targets: Vec<StatusSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub name: String,
    pub url: String,
    pub history: Vec<CheckResult>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub name: Option<String>,
}

/// Overall system status plus a snapshot of every target.
#[get("/monitoring/status")]
pub async fn monitoring_status(state: web::Data<AppState>) -> web::Json<MonitoringStatusResponse> {
    web::Json(MonitoringStatusResponse {
        status: state.aggregator.overall_status(),
        targets: state.aggregator.all_statuses(),
    })
}

/// Current status of a single target.
#[get("/status/{name}")]
pub async fn target_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<web::Json<StatusSnapshot>, ApiError> {
    let snapshot = state.aggregator.target_status(&path)?;
    Ok(web::Json(snapshot))
}

/// Recorded history of a single target, oldest first.
#[get("/history/{name}")]
pub async fn target_history(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> Result<web::Json<HistoryResponse>, ApiError> {
    let name = path.into_inner();
    let history = state.history.recent(&name, query.limit)?;

    // The registry is a superset of the history's windows, so the name
    // resolves whenever the query above succeeded.
    let url = state.registry.get(&name).map(|t| t.url.clone()).unwrap_or_default();

    Ok(web::Json(HistoryResponse { name, url, history }))
}

/// Download history as CSV, for one target or all of them.
#[get("/download/csv")]
pub async fn download_csv(
    state: web::Data<AppState>,
    query: web::Query<DownloadQuery>,
) -> Result<HttpResponse, ApiError> {
    let name = query.name.as_deref();
    let bytes = export_csv(&state.registry, &state.history, name)?;

    let filename = match name {
        Some(name) => format!("{name}-history.csv"),
        None => "all-history.csv".to_string(),
    };

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header(("Content-Disposition", format!("attachment; filename=\"{filename}\"")))
        .body(bytes))
}
