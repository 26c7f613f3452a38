use thiserror::Error;

use super::{CSV_HEADER, csv_record};
use crate::monitoring::history::{HistoryError, HistoryStore};
use crate::registry::TargetRegistry;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("failed to build csv: {0}")]
    Csv(String),
}

/// Render the current history of one target (or all targets) as CSV bytes.
///
/// Targets are emitted in config order; rows within a target are
/// chronological. An unknown name fails with `UnknownTarget`.
pub fn export_csv(
    registry: &TargetRegistry,
    history: &HistoryStore,
    name: Option<&str>,
) -> Result<Vec<u8>, ExportError> {
    let targets: Vec<_> = match name {
        Some(name) => {
            let target = registry
                .get(name)
                .ok_or_else(|| HistoryError::UnknownTarget(name.to_string()))?;
            vec![target]
        }
        None => registry.targets().iter().collect(),
    };

    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(CSV_HEADER).map_err(|e| ExportError::Csv(e.to_string()))?;

    for target in targets {
        for result in history.recent(&target.name, None)? {
            writer
                .write_record(csv_record(&result, &target.url))
                .map_err(|e| ExportError::Csv(e.to_string()))?;
        }
    }

    writer.into_inner().map_err(|e| ExportError::Csv(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::TargetConfig;
    use crate::monitoring::types::CheckResult;

    fn fixture() -> (Arc<TargetRegistry>, HistoryStore) {
        let registry = Arc::new(TargetRegistry::new(&[
            TargetConfig { name: "a".into(), url: "https://a.example.com".into() },
            TargetConfig { name: "b".into(), url: "https://b.example.com".into() },
        ]));
        let history = HistoryStore::new(&registry, 24);
        (registry, history)
    }

    #[test]
    fn exports_all_targets_in_config_order() {
        let (registry, history) = fixture();
        history.record(CheckResult::up("b", 10, 200)).unwrap();
        history.record(CheckResult::up("a", 20, 200)).unwrap();

        let bytes = export_csv(&registry, &history, None).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "name,url,timestamp,outcome,latency_ms,status_code,detail");
        assert!(lines[1].starts_with("a,https://a.example.com,"));
        assert!(lines[2].starts_with("b,https://b.example.com,"));
    }

    #[test]
    fn exports_single_target_history() {
        let (registry, history) = fixture();
        history.record(CheckResult::up("a", 10, 200)).unwrap();
        history.record(CheckResult::down("a", 15, 500)).unwrap();
        history.record(CheckResult::up("b", 10, 200)).unwrap();

        let bytes = export_csv(&registry, &history, Some("a")).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text.lines().count(), 3, "header plus a's two rows only");
        assert!(!text.contains("b.example.com"));
    }

    #[test]
    fn unknown_name_fails_with_not_found() {
        let (registry, history) = fixture();
        assert!(matches!(
            export_csv(&registry, &history, Some("ghost")),
            Err(ExportError::History(HistoryError::UnknownTarget(_)))
        ));
    }

    #[test]
    fn empty_history_exports_header_only() {
        let (registry, history) = fixture();
        let bytes = export_csv(&registry, &history, None).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap().lines().count(), 1);
    }
}
