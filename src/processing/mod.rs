//! In-memory record transformations.
//!
//! Every function here borrows its inputs and returns freshly allocated output; nothing is
//! mutated and nothing can fail. Absence is reported with [`crate::types::Value::Null`] (records)
//! or `None` (typed outputs).
//!
//! - [`create_ref()`]: build a key → value [`crate::types::ReferenceMap`] from records
//! - [`format_albums()`]: swap each album's `artist` for an `artistId` via a reference map
//! - [`create_film_lookup()`]: mean rating per film title
//! - [`format_user_data()`]: replace each user's favourite titles with `{name, score}` pairs
//!
//! ## Example: artists → albums
//!
//! ```rust
//! use record_reshape::processing::{create_ref, format_albums};
//! use record_reshape::types::{Record, Value};
//!
//! let artists = vec![Record::from_iter([
//!     ("name", Value::from("Taylor Swift")),
//!     ("id", Value::Int64(9923)),
//! ])];
//! let albums = vec![Record::from_iter([
//!     ("name", Value::from("Lover")),
//!     ("artist", Value::from("Taylor Swift")),
//!     ("releaseYear", Value::Int64(2019)),
//! ])];
//!
//! let artist_ids = create_ref(&artists, "name", "id");
//! let out = format_albums(&albums, &artist_ids);
//! assert_eq!(out[0].get("artistId"), Some(&Value::Int64(9923)));
//! assert!(!out[0].contains_field("artist"));
//! ```
//!
//! ## Example: scoring favourite films
//!
//! ```rust
//! use record_reshape::processing::format_user_data;
//! use record_reshape::types::{RatingEntry, User};
//!
//! let users = vec![User::new("bartyBoo", ["Barbie", "Cats"])];
//! let ratings = vec![RatingEntry::new("Barbie", 3.0), RatingEntry::new("Barbie", 4.0)];
//!
//! let out = format_user_data(&users, &ratings);
//! assert_eq!(out[0].fav_films[0].score, Some(3.5));
//! assert_eq!(out[0].fav_films[1].score, None);
//! ```

pub mod albums;
pub mod ratings;
pub mod reference;
pub mod users;

pub use albums::format_albums;
pub use ratings::create_film_lookup;
pub use reference::create_ref;
pub use users::{format_user_data, score_user};
