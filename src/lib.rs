//! `record-reshape` is a small library of pure reshaping helpers for plain in-memory records
//! (employees, albums, users, film ratings).
//!
//! ## Transformations
//!
//! All of these live in [`processing`], borrow their inputs, return new values and never fail:
//!
//! - [`processing::create_ref`]: build a [`types::ReferenceMap`] from one field of each record to
//!   another
//! - [`processing::format_albums`]: swap each album's `artist` for an `artistId`
//! - [`processing::create_film_lookup`]: mean rating per film title
//! - [`processing::format_user_data`]: replace users' favourite film titles with `{name, score}`
//!
//! Absence is explicit: [`types::Value::Null`] inside records, `None` in typed outputs. A record
//! that lacks a field is distinguishable from one holding `Null` via
//! [`types::Record::contains_field`].
//!
//! ```rust
//! use record_reshape::processing::create_ref;
//! use record_reshape::types::{Record, Value};
//!
//! let employees = vec![
//!     Record::from_iter([("name", Value::from("Rose")), ("id", Value::from("dS8rJns"))]),
//!     Record::from_iter([("name", Value::from("David"))]),
//!     Record::from_iter([("surname", Value::from("Jim")), ("id", Value::from("lk1ff8s"))]),
//! ];
//!
//! let ids = create_ref(&employees, "name", "id");
//! assert_eq!(ids.get("Rose"), Some(&Value::from("dS8rJns")));
//! // David owns `name` but not `id`: the entry exists with no value.
//! assert!(ids.contains_key("David"));
//! assert_eq!(ids.get("David"), None);
//! // Jim has no `name`, so contributes nothing.
//! assert_eq!(ids.len(), 2);
//! ```
//!
//! ## Loading seed data
//!
//! [`ingestion`] loads records from JSON (array, object or NDJSON) and CSV (with a
//! [`types::Schema`]), optionally reporting outcomes to an
//! [`ingestion::IngestionObserver`].
//!
//! ```rust
//! use record_reshape::ingestion::json::deserialize_json_from_str;
//! use record_reshape::processing::format_user_data;
//! use record_reshape::types::{RatingEntry, User};
//!
//! # fn main() -> Result<(), record_reshape::IngestionError> {
//! let users: Vec<User> =
//!     deserialize_json_from_str(r#"[{"username":"bartyBoo","favFilms":["Barbie"]}]"#)?;
//! let ratings: Vec<RatingEntry> = deserialize_json_from_str(
//!     r#"[{"title":"Barbie","rating":3},{"title":"Barbie","rating":4}]"#,
//! )?;
//!
//! let scored = format_user_data(&users, &ratings);
//! assert_eq!(scored[0].fav_films[0].score, Some(3.5));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`processing`]: the transformations
//! - [`types`]: values, records, reference maps and the typed user/rating shapes
//! - [`ingestion`]: JSON/CSV loading and observers
//! - [`error`]: error types used across ingestion

pub mod error;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{IngestionError, IngestionResult};
