#![warn(clippy::all, clippy::pedantic)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use logger::init_tracing;
use tracing::info;
use watchpost::monitoring::checker::HttpChecker;
use watchpost::monitoring::executor::CheckExecutor;
use watchpost::persistence::{CsvFileSink, ResultSink};
use watchpost::{Config, HistoryStore, MonitoringScheduler, TargetRegistry};

mod error;
mod routes;

use error::AppError;
use routes::AppState;

/// URL monitoring service with an HTTP status API.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Address to bind the status API on
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// CSV file check results are appended to
    #[arg(long, default_value = "monitoring-results.csv")]
    results_file: PathBuf,
}

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    init_tracing();

    let args = Args::parse();
    let config = Config::load(&args.config)?;

    let registry = Arc::new(TargetRegistry::new(&config.targets));
    let history =
        Arc::new(HistoryStore::new(&registry, config.monitoring.history_retention_hours));
    let checker = Arc::new(HttpChecker::new(config.monitoring.timeout_seconds)?);
    let executor = Arc::new(CheckExecutor::new(checker));
    let sink: Arc<dyn ResultSink> =
        Arc::new(CsvFileSink::new(&args.results_file, Arc::clone(&registry)));

    let mut scheduler = MonitoringScheduler::new(
        Arc::clone(&registry),
        executor,
        Arc::clone(&history),
        &config.monitoring,
    );
    scheduler.start(Some(sink));

    let state = web::Data::new(AppState::new(Arc::clone(&registry), Arc::clone(&history)));

    info!(bind = %args.bind, "starting status API");
    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes::routes))
        .bind(args.bind)?
        .run()
        .await?;

    // The server returns once SIGINT/SIGTERM has been handled; let in-flight
    // checks finish (bounded) before exiting.
    scheduler.shutdown().await;

    Ok(())
}
