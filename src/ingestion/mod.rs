//! Loading record sequences from JSON and CSV.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - loads into a `Vec<`[`crate::types::Record`]`>`
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions live under [`csv`] and [`json`]. Typed inputs for
//! [`crate::processing`] can be obtained with [`ingest_typed_from_path`],
//! [`json::deserialize_json_from_str`], or by converting records with `TryFrom` (see
//! [`crate::types::RatingEntry`] and [`crate::types::User`]).

pub mod csv;
pub mod json;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    IngestionWarning, StdErrObserver,
};
pub use unified::{
    ingest_from_path, ingest_typed_from_path, IngestionFormat, IngestionOptions, IngestionRequest,
};
