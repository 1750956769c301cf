//! CSV ingestion.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataType, Record, Schema, Value};

/// Read a CSV file into records.
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ); other columns are ignored.
/// - Each cell is parsed according to its schema field type; empty cells become [`Value::Null`],
///   except [`DataType::TextList`] cells, which become an empty list.
/// - Record fields follow schema order.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr, schema)
}

/// Read CSV records from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> IngestionResult<Vec<Record>> {
    let headers = rdr.headers()?.clone();

    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(IngestionError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut records = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based, and the header is row 1.
        let user_row = row_idx0 + 2;
        let row = result?;

        let mut record = Record::new();
        for (field, &csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = row.get(csv_idx).unwrap_or("");
            record.insert(
                field.name.as_str(),
                parse_typed_value(user_row, &field.name, &field.data_type, raw)?,
            );
        }
        records.push(record);
    }

    Ok(records)
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: &DataType,
    raw: &str,
) -> IngestionResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        // An empty list is a value, not a missing one.
        return Ok(match data_type {
            DataType::TextList => Value::TextList(Vec::new()),
            _ => Value::Null,
        });
    }

    let parse_error = |message: String| IngestionError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_error),
        DataType::TextList => Ok(Value::TextList(
            trimmed
                .split('|')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_owned)
                .collect(),
        )),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::ingest_csv_from_reader;
    use crate::types::{DataType, Field, Schema, User, Value};

    fn reader(input: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(input.as_bytes())
    }

    #[test]
    fn splits_text_lists_on_pipes() {
        let schema = Schema::new(vec![
            Field::new("username", DataType::Utf8),
            Field::new("favFilms", DataType::TextList),
        ]);
        let records =
            ingest_csv_from_reader(&mut reader("username,favFilms\nsam,Barbie | Ben-Hur|\n"), &schema)
                .unwrap();
        assert_eq!(
            records[0].get("favFilms"),
            Some(&Value::TextList(vec!["Barbie".to_string(), "Ben-Hur".to_string()]))
        );
    }

    #[test]
    fn empty_cells_become_null() {
        let schema = Schema::new(vec![
            Field::new("name", DataType::Utf8),
            Field::new("id", DataType::Int64),
        ]);
        let records = ingest_csv_from_reader(&mut reader("name,id\nDavid,\n"), &schema).unwrap();
        assert!(records[0].contains_field("id"));
        assert_eq!(records[0].get("id"), Some(&Value::Null));
    }

    #[test]
    fn empty_text_list_cell_is_an_empty_list() {
        let schema = Schema::new(vec![
            Field::new("username", DataType::Utf8),
            Field::new("favFilms", DataType::TextList),
        ]);
        let records =
            ingest_csv_from_reader(&mut reader("username,favFilms\nsam,\n"), &schema).unwrap();
        assert_eq!(records[0].get("favFilms"), Some(&Value::TextList(Vec::new())));

        let user = User::try_from(&records[0]).unwrap();
        assert_eq!(user.username, "sam");
        assert!(user.fav_films.is_empty());
    }

    #[test]
    fn parses_bool_aliases() {
        let schema = Schema::new(vec![Field::new("active", DataType::Bool)]);
        let records =
            ingest_csv_from_reader(&mut reader("active\nyes\nN\n"), &schema).unwrap();
        assert_eq!(records[0].get("active"), Some(&Value::Bool(true)));
        assert_eq!(records[1].get("active"), Some(&Value::Bool(false)));
    }
}
