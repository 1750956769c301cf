//! Reporting of load outcomes.
//!
//! [`super::ingest_from_path`] and [`super::ingest_typed_from_path`] describe each load with an
//! [`IngestionContext`] and, on success, [`IngestionStats`] about the records that came back.
//! Loads that succeed but look suspicious (nothing loaded, missing values present) additionally
//! produce [`IngestionWarning`]s.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::IngestionError;
use crate::types::Record;

use super::unified::IngestionFormat;

/// Severity of a failed load, compared against
/// [`super::IngestionOptions::alert_at_or_above`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// The input was readable but did not have the expected shape or types.
    Error,
    /// The input could not be read at all (I/O).
    Critical,
}

/// What a load attempted.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// The input path.
    pub path: PathBuf,
    /// Format the input was parsed as.
    pub format: IngestionFormat,
    /// What the records were loaded as: `"records"`, or the type name for typed loads.
    pub target: &'static str,
}

impl fmt::Display for IngestionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "format={:?} target={} path={}",
            self.format,
            self.target,
            self.path.display()
        )
    }
}

/// What a successful load produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestionStats {
    /// Number of records loaded.
    pub records: usize,
    /// Number of fields, across all records, holding [`crate::types::Value::Null`].
    pub missing_values: usize,
}

impl IngestionStats {
    /// Count records and missing values.
    pub fn from_records(records: &[Record]) -> Self {
        Self {
            records: records.len(),
            missing_values: records
                .iter()
                .flat_map(Record::iter)
                .filter(|(_, v)| v.is_null())
                .count(),
        }
    }

    /// Warnings implied by these stats, in a fixed order.
    pub fn warnings(&self) -> Vec<IngestionWarning> {
        let mut out = Vec::new();
        if self.records == 0 {
            out.push(IngestionWarning::NoRecords);
        }
        if self.missing_values > 0 {
            out.push(IngestionWarning::MissingValues {
                count: self.missing_values,
            });
        }
        out
    }
}

impl fmt::Display for IngestionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "records={} missing_values={}",
            self.records, self.missing_values
        )
    }
}

/// A non-fatal finding about a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestionWarning {
    /// The input parsed but contained no records.
    NoRecords,
    /// Some fields hold the missing marker; downstream lookups on them will miss.
    MissingValues {
        /// Number of missing values.
        count: usize,
    },
}

impl fmt::Display for IngestionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestionWarning::NoRecords => f.write_str("no records loaded"),
            IngestionWarning::MissingValues { count } => write!(f, "{count} missing value(s)"),
        }
    }
}

/// Observer interface for load outcomes.
///
/// Implementors can record metrics, write logs, or raise alerts.
pub trait IngestionObserver: Send + Sync {
    /// Called when a load succeeds.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called after [`Self::on_success`] once per warning the load produced.
    fn on_warning(&self, _ctx: &IngestionContext, _warning: &IngestionWarning) {}

    /// Called when a load fails.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Fans callbacks out to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a composite over `observers`, called in order.
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

    fn on_warning(&self, ctx: &IngestionContext, warning: &IngestionWarning) {
        for o in &self.observers {
            o.on_warning(ctx, warning);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

// Shared line bodies so stderr and file logs read the same.
fn success_line(ctx: &IngestionContext, stats: IngestionStats) -> String {
    format!("ok {ctx} {stats}")
}

fn warning_line(ctx: &IngestionContext, warning: &IngestionWarning) -> String {
    format!("warn {ctx} warning=\"{warning}\"")
}

fn failure_line(tag: &str, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) -> String {
    format!("{tag} severity={severity:?} {ctx} err={error}")
}

/// Logs one line per event to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl IngestionObserver for StdErrObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        eprintln!("[load] {}", success_line(ctx, stats));
    }

    fn on_warning(&self, ctx: &IngestionContext, warning: &IngestionWarning) {
        eprintln!("[load] {}", warning_line(ctx, warning));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!("[load] {}", failure_line("fail", ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!("[ALERT][load] {}", failure_line("fail", ctx, severity, error));
    }
}

/// Appends timestamped events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open or write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {line}", unix_ts());
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.append_line(&success_line(ctx, stats));
    }

    fn on_warning(&self, ctx: &IngestionContext, warning: &IngestionWarning) {
        self.append_line(&warning_line(ctx, warning));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append_line(&failure_line("fail", ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append_line(&failure_line("ALERT", ctx, severity, error));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{
        failure_line, success_line, warning_line, IngestionContext, IngestionObserver,
        IngestionSeverity, IngestionStats, IngestionWarning, StdErrObserver,
    };
    use crate::error::IngestionError;
    use crate::ingestion::IngestionFormat;
    use crate::types::{Record, Value};

    fn ctx() -> IngestionContext {
        IngestionContext {
            path: PathBuf::from("employees.json"),
            format: IngestionFormat::Json,
            target: "records",
        }
    }

    #[test]
    fn stats_count_records_and_missing_values() {
        let records = vec![
            Record::from_iter([("name", Value::from("Rose")), ("id", Value::Null)]),
            Record::from_iter([("name", Value::Null)]),
            Record::from_iter([("name", Value::from("Jim"))]),
        ];
        let stats = IngestionStats::from_records(&records);
        assert_eq!(
            stats,
            IngestionStats {
                records: 3,
                missing_values: 2
            }
        );
    }

    #[test]
    fn warnings_follow_from_stats() {
        assert!(IngestionStats { records: 2, missing_values: 0 }.warnings().is_empty());
        assert_eq!(
            IngestionStats::default().warnings(),
            vec![IngestionWarning::NoRecords]
        );
        assert_eq!(
            IngestionStats { records: 4, missing_values: 1 }.warnings(),
            vec![IngestionWarning::MissingValues { count: 1 }]
        );
    }

    #[test]
    fn log_lines_describe_the_load() {
        let stats = IngestionStats { records: 4, missing_values: 1 };
        assert_eq!(
            success_line(&ctx(), stats),
            "ok format=Json target=records path=employees.json records=4 missing_values=1"
        );
        assert_eq!(
            warning_line(&ctx(), &IngestionWarning::MissingValues { count: 1 }),
            "warn format=Json target=records path=employees.json warning=\"1 missing value(s)\""
        );

        let err = IngestionError::SchemaMismatch {
            message: "row 2 is not a json object".to_string(),
        };
        let line = failure_line("fail", &ctx(), IngestionSeverity::Error, &err);
        assert!(line.starts_with("fail severity=Error format=Json"));
        assert!(line.ends_with("err=schema mismatch: row 2 is not a json object"));
    }

    #[test]
    fn stderr_observer_handles_every_event() {
        let obs = StdErrObserver;
        let err = IngestionError::SchemaMismatch {
            message: "json input is empty".to_string(),
        };
        obs.on_success(&ctx(), IngestionStats::default());
        obs.on_warning(&ctx(), &IngestionWarning::NoRecords);
        obs.on_failure(&ctx(), IngestionSeverity::Error, &err);
        obs.on_alert(&ctx(), IngestionSeverity::Critical, &err);
    }
}
