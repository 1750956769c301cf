//! Per-title rating aggregation.

use std::collections::HashMap;

use crate::types::{FilmLookup, RatingEntry};

/// Mean rating per film title.
///
/// Ratings are grouped by title in input order, then each group is reduced to its arithmetic
/// mean. No rounding is applied. Returns an empty map for empty input.
pub fn create_film_lookup(ratings: &[RatingEntry]) -> FilmLookup {
    let mut grouped: HashMap<&str, Vec<f64>> = HashMap::new();
    for entry in ratings {
        grouped
            .entry(entry.title.as_str())
            .or_default()
            .push(entry.rating);
    }

    grouped
        .into_iter()
        .map(|(title, scores)| (title.to_string(), mean(&scores)))
        .collect()
}

// Groups are never empty: a title only appears once it has a rating.
fn mean(scores: &[f64]) -> f64 {
    scores.iter().sum::<f64>() / scores.len() as f64
}

#[cfg(test)]
mod tests {
    use super::create_film_lookup;
    use crate::types::RatingEntry;

    fn barbie_ratings() -> Vec<RatingEntry> {
        vec![
            RatingEntry::new("Barbie", 3.0),
            RatingEntry::new("Barbie", 1.0),
            RatingEntry::new("Barbie", 5.0),
            RatingEntry::new("Barbie", 4.0),
        ]
    }

    #[test]
    fn empty_ratings_yield_empty_lookup() {
        assert!(create_film_lookup(&[]).is_empty());
    }

    #[test]
    fn single_rating_is_its_own_average() {
        let out = create_film_lookup(&[RatingEntry::new("Ben-Hur", 4.0)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out["Ben-Hur"], 4.0);
    }

    #[test]
    fn averages_ratings_for_one_title() {
        let out = create_film_lookup(&barbie_ratings());
        assert_eq!(out.len(), 1);
        assert_eq!(out["Barbie"], 3.25);
    }

    #[test]
    fn averages_interleaved_titles_independently() {
        let input = vec![
            RatingEntry::new("Barbie", 3.0),
            RatingEntry::new("Braveheart", 3.0),
            RatingEntry::new("Barbie", 1.0),
            RatingEntry::new("Braveheart", 4.0),
            RatingEntry::new("Ben-Hur", 4.0),
        ];
        let out = create_film_lookup(&input);
        assert_eq!(out.len(), 3);
        assert_eq!(out["Barbie"], 2.0);
        assert_eq!(out["Braveheart"], 3.5);
        assert_eq!(out["Ben-Hur"], 4.0);
    }

    #[test]
    fn does_not_round() {
        let input = vec![
            RatingEntry::new("Up", 1.0),
            RatingEntry::new("Up", 1.0),
            RatingEntry::new("Up", 2.0),
        ];
        let out = create_film_lookup(&input);
        assert_eq!(out["Up"], 4.0 / 3.0);
    }

    #[test]
    fn repeated_calls_do_not_accumulate() {
        let input = barbie_ratings();
        let first = create_film_lookup(&input);
        let second = create_film_lookup(&input);
        assert_eq!(first, second);
    }
}
