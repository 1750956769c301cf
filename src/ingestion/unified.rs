//! Path-based loading with format detection and observer reporting.
//!
//! - If [`IngestionOptions::format`] is `None`, the format is inferred from the file extension.
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{Record, Schema};

use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::{csv, json};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// JSON array-of-objects, single object, or NDJSON.
    Json,
}

impl IngestionFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Options controlling [`ingest_from_path`].
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// Column types for CSV input. Required for CSV, ignored for JSON.
    pub schema: Option<Schema>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Failure severity at or above which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("schema", &self.schema)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            schema: None,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Load a file of records.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` with [`IngestionStats`], then `on_warning` for each
///   [`super::observability::IngestionWarning`] the stats imply
/// - `on_failure` with a computed severity (I/O problems are `Critical`, everything else `Error`)
/// - `on_alert` when that severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use record_reshape::ingestion::{ingest_from_path, IngestionOptions};
/// use record_reshape::processing::create_ref;
///
/// # fn main() -> Result<(), record_reshape::IngestionError> {
/// let employees = ingest_from_path("employees.json", &IngestionOptions::default())?;
/// let ids = create_ref(&employees, "name", "id");
/// println!("entries={}", ids.len());
/// # Ok(())
/// # }
/// ```
///
/// CSV needs a schema; typed inputs can be loaded directly:
///
/// ```no_run
/// use record_reshape::ingestion::{ingest_typed_from_path, IngestionOptions};
/// use record_reshape::types::{DataType, Field, RatingEntry, Schema};
///
/// # fn main() -> Result<(), record_reshape::IngestionError> {
/// let opts = IngestionOptions {
///     schema: Some(Schema::new(vec![
///         Field::new("title", DataType::Utf8),
///         Field::new("rating", DataType::Float64),
///     ])),
///     ..Default::default()
/// };
/// let ratings: Vec<RatingEntry> = ingest_typed_from_path("ratings.csv", &opts)?;
/// println!("ratings={}", ratings.len());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    options: &IngestionOptions,
) -> IngestionResult<Vec<Record>> {
    let path = path.as_ref();
    let ctx = context_for(path, options, "records")?;

    let result = load_records(path, ctx.format, options);
    report(options, &ctx, result.as_ref().map(|records| IngestionStats::from_records(records)));
    result
}

/// Load a file and convert every record into `T` (e.g. [`crate::types::RatingEntry`] or
/// [`crate::types::User`]).
///
/// Conversion failures are reported to the observer like load failures, with the 1-based row
/// prefixed to the message. The context's `target` is `T`'s type name.
pub fn ingest_typed_from_path<T>(
    path: impl AsRef<Path>,
    options: &IngestionOptions,
) -> IngestionResult<Vec<T>>
where
    T: for<'r> TryFrom<&'r Record, Error = IngestionError>,
{
    let path = path.as_ref();
    let ctx = context_for(path, options, std::any::type_name::<T>())?;

    let result = load_records(path, ctx.format, options).and_then(|records| {
        let stats = IngestionStats::from_records(&records);
        convert_records::<T>(&records).map(|typed| (stats, typed))
    });
    report(options, &ctx, result.as_ref().map(|(stats, _)| *stats));
    result.map(|(_, typed)| typed)
}

fn context_for(
    path: &Path,
    options: &IngestionOptions,
    target: &'static str,
) -> IngestionResult<IngestionContext> {
    let format = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };
    Ok(IngestionContext {
        path: path.to_path_buf(),
        format,
        target,
    })
}

fn load_records(
    path: &Path,
    format: IngestionFormat,
    options: &IngestionOptions,
) -> IngestionResult<Vec<Record>> {
    match format {
        IngestionFormat::Csv => match options.schema.as_ref() {
            Some(schema) => csv::ingest_csv_from_path(path, schema),
            None => Err(IngestionError::SchemaMismatch {
                message: "csv ingestion requires a schema".to_string(),
            }),
        },
        IngestionFormat::Json => json::ingest_json_from_path(path),
    }
}

fn convert_records<T>(records: &[Record]) -> IngestionResult<Vec<T>>
where
    T: for<'r> TryFrom<&'r Record, Error = IngestionError>,
{
    records
        .iter()
        .enumerate()
        .map(|(idx0, record)| T::try_from(record).map_err(|e| at_row(idx0 + 1, e)))
        .collect()
}

fn at_row(row: usize, e: IngestionError) -> IngestionError {
    match e {
        IngestionError::SchemaMismatch { message } => IngestionError::SchemaMismatch {
            message: format!("row {row}: {message}"),
        },
        other => other,
    }
}

fn report(
    options: &IngestionOptions,
    ctx: &IngestionContext,
    outcome: Result<IngestionStats, &IngestionError>,
) {
    let Some(obs) = options.observer.as_ref() else {
        return;
    };
    match outcome {
        Ok(stats) => {
            obs.on_success(ctx, stats);
            for warning in stats.warnings() {
                obs.on_warning(ctx, &warning);
            }
        }
        Err(e) => {
            let sev = severity_for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= options.alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}

fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        IngestionError::Json(err) if err.is_io() => IngestionSeverity::Critical,
        IngestionError::Json(_) => IngestionSeverity::Error,
        IngestionError::SchemaMismatch { .. } => IngestionSeverity::Error,
        IngestionError::ParseError { .. } => IngestionSeverity::Error,
    }
}

fn infer_format_from_path(path: &Path) -> IngestionResult<IngestionFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ),
        })?;

    IngestionFormat::from_extension(ext).ok_or_else(|| IngestionError::SchemaMismatch {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

/// An owned load request, e.g. for queueing work.
#[derive(Clone)]
pub struct IngestionRequest {
    pub path: PathBuf,
    pub options: IngestionOptions,
}

impl fmt::Debug for IngestionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionRequest")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish()
    }
}

impl IngestionRequest {
    /// Execute the request by calling [`ingest_from_path`].
    pub fn run(&self) -> IngestionResult<Vec<Record>> {
        ingest_from_path(&self.path, &self.options)
    }
}
