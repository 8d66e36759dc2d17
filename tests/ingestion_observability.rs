use std::sync::{Arc, Mutex};

use tablekit::error_codes::ErrorCode;
use tablekit::errors::{DomainError, FileError};
use tablekit::ingestion::{
    ingest_from_path, CompositeObserver, FileObserver, IngestionContext, IngestionFormat, IngestionObserver,
    IngestionOptions, IngestionSeverity, IngestionStats,
};
use tablekit::types::{DataType, Field, Schema};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<usize>>,
    failures: Mutex<Vec<(IngestionSeverity, ErrorCode)>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_success(&self, _ctx: &IngestionContext, stats: IngestionStats) {
        self.successes.lock().unwrap().push(stats.rows);
    }

    fn on_failure(&self, _ctx: &IngestionContext, severity: IngestionSeverity, error: &FileError) {
        self.failures.lock().unwrap().push((severity, error.error_code()));
    }

    fn on_alert(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &FileError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn schema_id_only() -> Schema {
    Schema::new(vec![Field::new("id", DataType::Int64)])
}

fn schema_missing_col() -> Schema {
    Schema::new(vec![Field::new("definitely_missing", DataType::Utf8)])
}

fn csv_options(observer: Arc<dyn IngestionObserver>) -> IngestionOptions {
    IngestionOptions {
        format: Some(IngestionFormat::Csv),
        observer: Some(observer),
        alert_at_or_above: IngestionSeverity::Critical,
        ..Default::default()
    }
}

#[test]
fn observer_receives_failure_and_alert_on_missing_file() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = csv_options(obs.clone());

    let err = ingest_from_path("tests/fixtures/does_not_exist.csv", &schema_id_only(), &opts).unwrap_err();
    assert!(matches!(err, FileError::FileNotFound(_)));

    let failures = obs.failures.lock().unwrap().clone();
    let alerts = obs.alerts.lock().unwrap().clone();
    assert_eq!(failures, vec![(IngestionSeverity::Critical, ErrorCode::FileNotFound)]);
    assert_eq!(alerts, vec![IngestionSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_schema_mismatch() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = csv_options(obs.clone());

    let err = ingest_from_path("tests/fixtures/people.csv", &schema_missing_col(), &opts).unwrap_err();
    assert_eq!(err.error_code().value(), 12007);

    let failures = obs.failures.lock().unwrap().clone();
    assert_eq!(failures, vec![(IngestionSeverity::Error, ErrorCode::SchemaMismatch)]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_row_count_on_success() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = csv_options(obs.clone());

    let ds = ingest_from_path("tests/fixtures/people.csv", &schema_id_only(), &opts).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(obs.successes.lock().unwrap().clone(), vec![2]);
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn file_observer_writes_error_dicts_as_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("ingest.log");
    let recorder = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![Arc::new(FileObserver::new(&log_path)), recorder.clone()]);
    let opts = csv_options(Arc::new(composite));

    let _ = ingest_from_path("tests/fixtures/people.csv", &schema_id_only(), &opts).unwrap();
    let _ = ingest_from_path("tests/fixtures/does_not_exist.csv", &schema_id_only(), &opts).unwrap_err();

    let text = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    // ok, fail, alert
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["event"], "ok");
    assert_eq!(lines[0]["rows"], 2);
    assert_eq!(lines[1]["event"], "fail");
    assert_eq!(lines[1]["severity"], "critical");
    assert_eq!(lines[1]["error"]["error_type"], "FileNotFoundError");
    assert_eq!(lines[1]["error"]["error_code"], ErrorCode::FileNotFound.value());
    assert_eq!(lines[2]["event"], "alert");
    assert_eq!(recorder.alerts.lock().unwrap().len(), 1);
}

#[test]
fn empty_file_is_a_warning_below_the_alert_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nightly.json");
    std::fs::write(&path, "\n\n").unwrap();

    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestionOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };

    let err = ingest_from_path(&path, &schema_id_only(), &opts).unwrap_err();
    assert!(matches!(err, FileError::EmptyFile(_)));
    assert_eq!(
        obs.failures.lock().unwrap().clone(),
        vec![(IngestionSeverity::Warning, ErrorCode::EmptyFile)]
    );
    assert!(obs.alerts.lock().unwrap().is_empty());

    // Lowering the threshold turns the warning into an alert.
    let opts = IngestionOptions {
        alert_at_or_above: IngestionSeverity::Warning,
        ..opts
    };
    let _ = ingest_from_path(&path, &schema_id_only(), &opts).unwrap_err();
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![IngestionSeverity::Warning]);
}
