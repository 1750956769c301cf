use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned when loading records from JSON or CSV.
///
/// The transformations in [`crate::processing`] never fail; this type only covers turning text or
/// files into records and typed inputs.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON syntax error, or a row that does not deserialize into the requested type.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input does not have the expected shape (missing columns/fields, non-object rows, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be converted into a record [`crate::types::Value`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}
