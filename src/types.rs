//! Core data model: dynamically-shaped [`Record`]s, the [`ReferenceMap`] built from them, and the
//! typed film-rating shapes consumed and produced by [`crate::processing`].
//!
//! Two missing markers are used, one per world:
//!
//! - in records and reference maps, a value that is present-but-missing is [`Value::Null`]
//! - in typed outputs (e.g. [`FilmScore::score`]), absence is `None`

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IngestionError;

/// A single value held by a [`Record`] field.
///
/// Deserializes from any self-describing format the same way
/// [`crate::ingestion::json::ingest_json_from_str`] converts JSON: integers above `i64::MAX`,
/// non-string list items and nested maps are rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
    /// Ordered sequence of strings (e.g. a user's favourite film titles).
    TextList(Vec<String>),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the string payload of a [`Value::Utf8`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric payload widened to `f64` (integers included).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null, a boolean, a number, a string, or an array of strings")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int64(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        i64::try_from(v)
            .map(Value::Int64)
            .map_err(|_| E::custom(format!("u64 out of range for i64: {v}")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::Utf8(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::Utf8(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            match item {
                Value::Utf8(s) => items.push(s),
                _ => return Err(de::Error::custom("expected array of strings")),
            }
        }
        Ok(Value::TextList(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, _map: A) -> Result<Value, A::Error> {
        Err(de::Error::custom("nested objects are not supported"))
    }
}

/// Key form of a value, as used for [`ReferenceMap`] keys.
///
/// Numbers render the way a JavaScript object key would: `4.0` is `4`, `-0.0` is `0`, and
/// magnitudes at or above `1e21` or below `1e-6` use exponent form (`1e+21`, `1.5e-7`).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write_number_key(f, *v),
            Value::Utf8(s) => f.write_str(s),
            Value::TextList(items) => f.write_str(&items.join(",")),
        }
    }
}

fn write_number_key(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        return f.write_str("NaN");
    }
    if v.is_infinite() {
        return f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if v == 0.0 {
        return f.write_str("0");
    }
    let abs = v.abs();
    if (1e-6..1e21).contains(&abs) {
        return write!(f, "{v}");
    }
    let exp_form = format!("{v:e}");
    match exp_form.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{mantissa}e+{exp}"),
        _ => f.write_str(&exp_form),
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Utf8(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Utf8(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::TextList(items)
    }
}

/// An ordered mapping from field name to [`Value`].
///
/// Field order is insertion order. A field that is absent is different from a field holding
/// [`Value::Null`]; use [`Record::contains_field`] to tell them apart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|(name, _)| name == field)
    }

    /// Returns `true` if the record owns `field` (even when it holds [`Value::Null`]).
    pub fn contains_field(&self, field: &str) -> bool {
        self.position(field).is_some()
    }

    /// Value of `field`, if the record owns it.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, v)| v)
    }

    /// Set `field` to `value`.
    ///
    /// An existing field keeps its position and the previous value is returned; a new field is
    /// appended.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        let field = field.into();
        match self.position(&field) {
            Some(idx) => Some(std::mem::replace(&mut self.fields[idx].1, value)),
            None => {
                self.fields.push((field, value));
                None
            }
        }
    }

    /// Remove `field`, returning its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        let idx = self.position(field)?;
        Some(self.fields.remove(idx).1)
    }

    /// Swap field `old` for field `new` holding `value`, keeping `old`'s position.
    ///
    /// Any other field already named `new` is dropped. If `old` is absent, `new` is appended.
    /// Returns the value `old` held.
    pub fn replace_field(
        &mut self,
        old: &str,
        new: impl Into<String>,
        value: Value,
    ) -> Option<Value> {
        let new = new.into();
        if new != old {
            self.fields.retain(|(name, _)| *name != new);
        }
        match self.position(old) {
            Some(idx) => {
                let (_, previous) = std::mem::replace(&mut self.fields[idx], (new, value));
                Some(previous)
            }
            None => {
                self.fields.push((new, value));
                None
            }
        }
    }

    /// Iterate `(field, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, v)| (name.as_str(), v))
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (field, value) in iter {
            record.insert(field, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut record = Record::new();
                while let Some((field, value)) = access.next_entry::<String, Value>()? {
                    record.insert(field, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Lookup from a key (the [`Display`](fmt::Display) form of one record field) to the value of
/// another field.
///
/// An entry whose value is `None` records that the source record owned the key field but not the
/// value field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceMap {
    entries: HashMap<String, Option<Value>>,
}

impl ReferenceMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or overwrite the entry for `key`, returning the previous entry.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<Value>) -> Option<Option<Value>> {
        self.entries.insert(key.into(), value)
    }

    /// Returns `true` if an entry exists for `key`, even one with a missing value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Value stored for `key`. `None` if there is no entry or the entry has no value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).and_then(Option::as_ref)
    }

    /// Iterate entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ReferenceMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut map = ReferenceMap::new();
        for (key, value) in iter {
            map.insert(key, Some(value));
        }
        map
    }
}

/// One rating recorded against a film title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    /// Film title the rating belongs to.
    pub title: String,
    /// The rating itself.
    pub rating: f64,
}

impl RatingEntry {
    /// Create a rating for `title`.
    pub fn new(title: impl Into<String>, rating: f64) -> Self {
        Self {
            title: title.into(),
            rating,
        }
    }
}

impl TryFrom<&Record> for RatingEntry {
    type Error = IngestionError;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        let title = record
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| missing_field("title", "text"))?;
        let rating = record
            .get("rating")
            .and_then(Value::as_f64)
            .ok_or_else(|| missing_field("rating", "number"))?;
        Ok(Self::new(title, rating))
    }
}

/// Mean rating per film title.
pub type FilmLookup = HashMap<String, f64>;

/// A user and the titles of their favourite films.
///
/// Fields other than `username` and `favFilms` are kept in `extra` and carried through
/// [`crate::processing::format_user_data`] unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    /// Favourite film titles, serialized as `favFilms`.
    #[serde(rename = "favFilms")]
    pub fav_films: Vec<String>,
    /// Every other field, in input order.
    #[serde(flatten)]
    pub extra: Record,
}

impl User {
    /// Create a user with no extra fields.
    pub fn new<I, S>(username: impl Into<String>, fav_films: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: username.into(),
            fav_films: fav_films.into_iter().map(Into::into).collect(),
            extra: Record::new(),
        }
    }
}

impl TryFrom<&Record> for User {
    type Error = IngestionError;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        let username = record
            .get("username")
            .and_then(Value::as_str)
            .ok_or_else(|| missing_field("username", "text"))?;
        let fav_films = match record.get("favFilms") {
            Some(Value::TextList(titles)) => titles.clone(),
            _ => return Err(missing_field("favFilms", "list of text")),
        };
        let extra = record
            .iter()
            .filter(|(name, _)| !matches!(*name, "username" | "favFilms"))
            .map(|(name, v)| (name, v.clone()))
            .collect();
        Ok(Self {
            username: username.to_string(),
            fav_films,
            extra,
        })
    }
}

/// A film title paired with its mean rating (`None` when the title has no ratings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmScore {
    /// Film title.
    pub name: String,
    /// Mean rating, serialized as `null` when unrated.
    pub score: Option<f64>,
}

/// A [`User`] whose favourite films have been scored.
///
/// Serializes as `username`, then `favFilms`, then the `extra` fields in their original order.
/// Where `username` or `favFilms` sat among the input fields is not preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredUser {
    pub username: String,
    #[serde(rename = "favFilms")]
    pub fav_films: Vec<FilmScore>,
    #[serde(flatten)]
    pub extra: Record,
}

fn missing_field(field: &str, expected: &str) -> IngestionError {
    IngestionError::SchemaMismatch {
        message: format!("record missing {expected} field '{field}'"),
    }
}

/// Column type used when parsing CSV cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// Parsed with `i64::from_str`.
    Int64,
    /// Parsed with `f64::from_str`.
    Float64,
    /// `true`/`false`, `t`/`f`, `1`/`0`, `yes`/`no`, `y`/`n`, case-insensitive.
    Bool,
    /// Kept as trimmed text.
    Utf8,
    /// `|`-separated list of strings; an empty cell is an empty list.
    TextList,
}

/// A single named, typed CSV column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Header name the column is matched by.
    pub name: String,
    /// How cells in the column are parsed.
    pub data_type: DataType,
}

impl Field {
    /// Create a column description.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of columns describing the expected shape of CSV input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Columns in the order record fields are produced.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a schema from its columns.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}
