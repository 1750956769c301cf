//! Scoring users' favourite films.

use crate::types::{FilmLookup, FilmScore, RatingEntry, ScoredUser, User};

use super::ratings::create_film_lookup;

/// Returns copies of `users` with each favourite film title replaced by `{name, score}`.
///
/// The per-title averages are computed once from `ratings` (see [`create_film_lookup`]) and shared
/// across all users. Titles without ratings get `score: None`. Title order is preserved.
pub fn format_user_data(users: &[User], ratings: &[RatingEntry]) -> Vec<ScoredUser> {
    let lookup = create_film_lookup(ratings);
    users.iter().map(|user| score_user(user, &lookup)).collect()
}

/// Score a single user against a prebuilt lookup.
pub fn score_user(user: &User, lookup: &FilmLookup) -> ScoredUser {
    ScoredUser {
        username: user.username.clone(),
        fav_films: user
            .fav_films
            .iter()
            .map(|title| FilmScore {
                name: title.clone(),
                score: lookup.get(title).copied(),
            })
            .collect(),
        extra: user.extra.clone(),
    }
}
