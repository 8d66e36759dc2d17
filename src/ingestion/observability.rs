//! Ingestion observers: hooks for logging and alerting on ingestion outcomes.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value as JsonValue;

use super::unified::IngestionFormat;
use crate::error_codes::ErrorCode;
use crate::errors::{error_to_dict, DomainError, FileError};

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// The file was readable but held nothing to ingest.
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (the file could not be reached or read at all).
    Critical,
}

impl IngestionSeverity {
    /// Severity of a failure with the given code.
    pub fn for_code(code: ErrorCode) -> Self {
        match code {
            ErrorCode::FileNotFound | ErrorCode::PermissionDenied | ErrorCode::FileRead => Self::Critical,
            ErrorCode::EmptyFile => Self::Warning,
            _ => Self::Error,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

/// Context about an ingestion attempt.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// The input path used for ingestion.
    pub path: PathBuf,
    /// Format used for ingestion.
    pub format: IngestionFormat,
}

/// Minimal stats reported on successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Number of ingested rows.
    pub rows: usize,
}

/// Observer interface for ingestion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait IngestionObserver: Send + Sync {
    /// Called when ingestion succeeds.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when ingestion fails.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &FileError) {}

    /// Called when an ingestion failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &FileError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &FileError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &FileError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Emits ingestion events as `tracing` events, with the error code as a structured field.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        tracing::info!(
            format = ?ctx.format,
            path = %ctx.path.display(),
            rows = stats.rows,
            "ingestion succeeded"
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &FileError) {
        let code = error.error_code().value();
        match severity {
            IngestionSeverity::Critical | IngestionSeverity::Error => tracing::error!(
                format = ?ctx.format,
                path = %ctx.path.display(),
                severity = severity.as_str(),
                error_code = code,
                error_type = error.error_type(),
                "ingestion failed: {error}"
            ),
            IngestionSeverity::Warning => tracing::warn!(
                format = ?ctx.format,
                path = %ctx.path.display(),
                severity = severity.as_str(),
                error_code = code,
                error_type = error.error_type(),
                "ingestion failed: {error}"
            ),
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &FileError) {
        tracing::error!(
            alert = true,
            format = ?ctx.format,
            path = %ctx.path.display(),
            severity = severity.as_str(),
            error_code = error.error_code().value(),
            "ingestion alert: {error}"
        );
    }
}

/// Appends ingestion events to a local log file, one JSON object per line.
///
/// Failure lines embed the error dict, so log processors can key on `error_code`.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, event: JsonValue) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{event}");
        }
    }

    fn failure_event(
        event: &str,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &FileError,
    ) -> JsonValue {
        serde_json::json!({
            "ts": chrono::Utc::now().to_rfc3339(),
            "event": event,
            "severity": severity.as_str(),
            "format": format!("{:?}", ctx.format),
            "path": ctx.path.display().to_string(),
            "message": error.to_string(),
            "error": JsonValue::Object(error_to_dict(error)),
        })
    }
}

impl IngestionObserver for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.append(serde_json::json!({
            "ts": chrono::Utc::now().to_rfc3339(),
            "event": "ok",
            "format": format!("{:?}", ctx.format),
            "path": ctx.path.display().to_string(),
            "rows": stats.rows,
        }));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &FileError) {
        self.append(Self::failure_event("fail", ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &FileError) {
        self.append(Self::failure_event("alert", ctx, severity, error));
    }
}
