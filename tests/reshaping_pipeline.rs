use record_reshape::ingestion::json::{deserialize_json_from_path, ingest_json_from_path};
use record_reshape::ingestion::{ingest_from_path, ingest_typed_from_path, IngestionOptions};
use record_reshape::processing::{create_film_lookup, create_ref, format_albums, format_user_data};
use record_reshape::types::{
    DataType, Field, FilmScore, RatingEntry, Record, Schema, User, Value,
};

fn load_ratings() -> Vec<RatingEntry> {
    deserialize_json_from_path("tests/fixtures/ratings.ndjson").unwrap()
}

fn score(name: &str, score: Option<f64>) -> FilmScore {
    FilmScore {
        name: name.to_string(),
        score,
    }
}

#[test]
fn employees_reference_map_marks_missing_ids() {
    let employees = ingest_json_from_path("tests/fixtures/employees.json").unwrap();
    let ids = create_ref(&employees, "name", "id");

    assert_eq!(ids.len(), 4);
    assert_eq!(ids.get("Simon"), Some(&Value::from("Pk34ABs")));
    assert!(ids.contains_key("David"));
    assert_eq!(ids.get("David"), None);
}

#[test]
fn albums_take_artist_ids_from_csv_reference() {
    let opts = IngestionOptions {
        schema: Some(Schema::new(vec![
            Field::new("name", DataType::Utf8),
            Field::new("artistId", DataType::Int64),
        ])),
        ..Default::default()
    };
    let artists = ingest_from_path("tests/fixtures/artists.csv", &opts).unwrap();
    let albums = ingest_json_from_path("tests/fixtures/albums.json").unwrap();
    let albums_before = albums.clone();

    let artist_ids = create_ref(&artists, "name", "artistId");
    let out = format_albums(&albums, &artist_ids);

    assert_eq!(
        out[0],
        Record::from_iter([
            ("name", Value::from("Lover")),
            ("artistId", Value::Int64(9923)),
            ("releaseYear", Value::Int64(2019)),
        ])
    );
    assert_eq!(out[1].get("artistId"), Some(&Value::Int64(324)));
    assert_eq!(out[2].get("artistId"), Some(&Value::Null));
    assert_eq!(albums, albums_before);
}

#[test]
fn film_lookup_from_ndjson() {
    let lookup = create_film_lookup(&load_ratings());
    assert_eq!(lookup.len(), 3);
    assert_eq!(lookup["Barbie"], 3.25);
    assert_eq!(lookup["Braveheart"], 3.5);
    assert_eq!(lookup["Ben-Hur"], 4.0);
}

#[test]
fn users_from_json_are_scored_and_left_untouched() {
    let users: Vec<User> = deserialize_json_from_path("tests/fixtures/users.json").unwrap();
    let users_before = users.clone();

    let out = format_user_data(&users, &load_ratings());

    assert_eq!(
        out[0].fav_films,
        vec![
            score("Barbie", Some(3.25)),
            score("Braveheart", Some(3.5)),
            score("Ben-Hur", Some(4.0)),
        ]
    );
    assert_eq!(
        out[1].fav_films,
        vec![score("Ben-Hur", Some(4.0)), score("Casablanca", None)]
    );
    assert_eq!(out[1].extra.get("joined"), Some(&Value::Int64(2021)));
    assert_eq!(users, users_before);
}

#[test]
fn users_from_csv_records_convert_and_score() {
    let opts = IngestionOptions {
        schema: Some(Schema::new(vec![
            Field::new("username", DataType::Utf8),
            Field::new("favFilms", DataType::TextList),
        ])),
        ..Default::default()
    };
    let users = ingest_from_path("tests/fixtures/users.csv", &opts)
        .unwrap()
        .iter()
        .map(User::try_from)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    let out = format_user_data(&users, &load_ratings());
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].username, "bartyBoo");
    assert_eq!(out[0].fav_films[0], score("Barbie", Some(3.25)));
    // `sam,` has no favourite films.
    assert_eq!(out[1].username, "sam");
    assert!(out[1].fav_films.is_empty());
}

#[test]
fn users_with_empty_film_cells_load_as_typed_users() {
    let opts = IngestionOptions {
        schema: Some(Schema::new(vec![
            Field::new("username", DataType::Utf8),
            Field::new("favFilms", DataType::TextList),
        ])),
        ..Default::default()
    };
    let users: Vec<User> = ingest_typed_from_path("tests/fixtures/users.csv", &opts).unwrap();
    assert_eq!(users[1], User::new("sam", Vec::<String>::new()));
}

#[test]
fn scored_users_serialize_with_null_scores() {
    let users = vec![User::new("sam", ["Casablanca"])];
    let out = format_user_data(&users, &load_ratings());
    let json = serde_json::to_string(&out).unwrap();
    assert_eq!(
        json,
        r#"[{"username":"sam","favFilms":[{"name":"Casablanca","score":null}]}]"#
    );
}
