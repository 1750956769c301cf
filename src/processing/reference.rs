//! Reference-map building for sequences of [`crate::types::Record`]s.

use crate::types::{Record, ReferenceMap};

/// Build a lookup from the `key` field of each record to its `value` field.
///
/// - Records that do not own `key` are skipped.
/// - Records that own `key` but not `value` produce an entry with no value.
/// - Records are visited in order, so a later duplicate key overwrites an earlier one.
///
/// Keys are the [`Display`](std::fmt::Display) form of the key field's value.
pub fn create_ref(records: &[Record], key: &str, value: &str) -> ReferenceMap {
    let mut reference = ReferenceMap::new();
    for record in records {
        if let Some(k) = record.get(key) {
            reference.insert(k.to_string(), record.get(value).cloned());
        }
    }
    reference
}
