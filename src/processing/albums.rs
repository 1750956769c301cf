//! Artist → artist id swapping for album records.

use crate::types::{Record, ReferenceMap, Value};

/// Field replaced on each album.
pub const ARTIST_FIELD: &str = "artist";
/// Field written in its place.
pub const ARTIST_ID_FIELD: &str = "artistId";

/// Returns copies of `albums` with `artist` swapped for `artistId`.
///
/// `artistId` takes `artist`'s position and holds `artist_ids`' entry for the artist, or
/// [`Value::Null`] when there is none. Albums without an `artist` field get `artistId: null`
/// appended. Every other field is copied as-is.
pub fn format_albums(albums: &[Record], artist_ids: &ReferenceMap) -> Vec<Record> {
    albums
        .iter()
        .map(|album| {
            let artist_id = album
                .get(ARTIST_FIELD)
                .and_then(|artist| artist_ids.get(&artist.to_string()))
                .cloned()
                .unwrap_or(Value::Null);

            let mut updated = album.clone();
            updated.replace_field(ARTIST_FIELD, ARTIST_ID_FIELD, artist_id);
            updated
        })
        .collect()
}
