//! Fuzzy ranking of search candidates against a free-text query.
//!
//! The title index has no server-side search, so the whole index is scored
//! locally by case-insensitive Levenshtein distance and only the closest matches
//! are returned.
//!
//! # Examples
//!
//! ```rust
//! use tosho_mangaplus::search::rank_candidates;
//! use tosho_mangaplus::types::SeriesCandidate;
//!
//! let index = vec![
//!     SeriesCandidate::new("1", "Naruto", None),
//!     SeriesCandidate::new("2", "One Piece", None),
//!     SeriesCandidate::new("3", "Bleach", None),
//! ];
//!
//! let ranked = rank_candidates("one piece", &index, 2);
//! assert_eq!(ranked.len(), 2);
//! assert_eq!(ranked[0].name, "One Piece");
//! assert_eq!(ranked[0].rank, Some(0));
//! ```

use rayon::prelude::*;

use crate::types::SeriesCandidate;

/// Computes the Levenshtein edit distance between two strings, compared by
/// Unicode scalar value.
///
/// ```rust
/// use tosho_mangaplus::search::levenshtein;
///
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// assert_eq!(levenshtein("", "abc"), 3);
/// ```
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single rolling row over `b`
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }

    row[b.len()]
}

/// Case-insensitive edit distance between a query and a title name.
pub fn title_distance(query: &str, name: &str) -> usize {
    levenshtein(&query.to_lowercase(), &name.to_lowercase())
}

/// Returns the `limit` candidates closest to `query`, best first.
///
/// Candidates are sorted by ascending [`title_distance`]; equal distances keep
/// their input order. The returned values are new copies carrying their
/// position as `rank`. Candidates past `limit` are discarded and the input slice
/// is left untouched.
pub fn rank_candidates(
    query: &str,
    candidates: &[SeriesCandidate],
    limit: usize,
) -> Vec<SeriesCandidate> {
    let query = query.to_lowercase();

    // par_iter keeps input order on collect
    let mut scored: Vec<(usize, &SeriesCandidate)> = candidates
        .par_iter()
        .map(|candidate| (levenshtein(&query, &candidate.name.to_lowercase()), candidate))
        .collect();

    scored.sort_by_key(|(distance, _)| *distance);

    scored
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(rank, (_, candidate))| candidate.with_rank(rank))
        .collect()
}
