use record_reshape::ingestion::csv::{ingest_csv_from_path, ingest_csv_from_reader};
use record_reshape::types::{DataType, Field, RatingEntry, Schema, Value};

fn ratings_schema() -> Schema {
    Schema::new(vec![
        Field::new("title", DataType::Utf8),
        Field::new("rating", DataType::Float64),
    ])
}

#[test]
fn ingest_csv_from_path_happy_path() {
    let records = ingest_csv_from_path("tests/fixtures/ratings.csv", &ratings_schema()).unwrap();

    assert_eq!(records.len(), 7);
    assert_eq!(records[0].get("title"), Some(&Value::Utf8("Barbie".to_string())));
    assert_eq!(records[0].get("rating"), Some(&Value::Float64(3.0)));
    assert_eq!(records[6].get("title"), Some(&Value::Utf8("Ben-Hur".to_string())));
}

#[test]
fn ingest_csv_records_convert_to_rating_entries() {
    let records = ingest_csv_from_path("tests/fixtures/ratings.csv", &ratings_schema()).unwrap();
    let ratings = records
        .iter()
        .map(RatingEntry::try_from)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(ratings[1], RatingEntry::new("Barbie", 1.0));
}

#[test]
fn ingest_csv_allows_reordered_and_extra_columns() {
    let schema = Schema::new(vec![
        Field::new("name", DataType::Utf8),
        Field::new("artistId", DataType::Int64),
    ]);
    let records = ingest_csv_from_path("tests/fixtures/artists.csv", &schema).unwrap();

    assert_eq!(records.len(), 2);
    // Fields follow schema order, not header order.
    assert_eq!(
        records[0].field_names().collect::<Vec<_>>(),
        vec!["name", "artistId"]
    );
    assert_eq!(records[1].get("artistId"), Some(&Value::Int64(324)));
    assert!(!records[1].contains_field("country"));
}

#[test]
fn ingest_csv_errors_on_missing_required_column() {
    let input = "title\nBarbie\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let err = ingest_csv_from_reader(&mut rdr, &ratings_schema()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("missing required column 'rating'"));
}

#[test]
fn ingest_csv_errors_on_type_parse() {
    let err = ingest_csv_from_path("tests/fixtures/ratings_bad.csv", &ratings_schema()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse value at row 2"));
    assert!(msg.contains("column 'rating'"));
    assert!(msg.contains("raw='three'"));
}
