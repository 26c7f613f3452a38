use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use super::{CSV_HEADER, ResultSink, csv_record};
use crate::monitoring::types::CheckResult;
use crate::registry::TargetRegistry;

/// Appends every check result as one CSV row.
///
/// The header is written when the file is first created; subsequent appends
/// add rows only, so the file survives restarts as one continuous log.
pub struct CsvFileSink {
    path: PathBuf,
    registry: Arc<TargetRegistry>,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>, registry: Arc<TargetRegistry>) -> Self {
        Self { path: path.into(), registry }
    }
}

#[async_trait::async_trait]
impl ResultSink for CsvFileSink {
    async fn append(&self, result: &CheckResult) -> anyhow::Result<()> {
        let url = self
            .registry
            .get(&result.target_name)
            .map(|t| t.url.clone())
            .unwrap_or_default();
        let path = self.path.clone();
        let result = result.clone();

        tokio::task::spawn_blocking(move || append_row(&path, &result, &url))
            .await
            .context("sink write task failed")?
    }
}

fn append_row(path: &Path, result: &CheckResult, url: &str) -> anyhow::Result<()> {
    let write_header = !path.exists();

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    if write_header {
        writer.write_record(CSV_HEADER)?;
    }
    writer.write_record(csv_record(result, url))?;
    writer.flush()?;

    Ok(())
}
