//! Title resolution: exact case-insensitive lookup first, then the closest title by
//! Ratcliff/Obershelp similarity.
//!
//! The ratio is `2 * M / (|a| + |b|)` where `M` is the number of characters in the
//! matching blocks found by recursively taking the longest common substring and
//! repeating on the unmatched pieces to its left and right.

use crate::error::{CoreError, Result};
use crate::index::DocId;

/// Minimum ratio accepted for an approximate title match.
pub const DEFAULT_CUTOFF: f64 = 0.6;

/// Best approximate candidate: position in the candidate list and its ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloseMatch {
    pub index: usize,
    pub ratio: f64,
}

pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, size)`.
/// Among equally long blocks, the one ending earliest in `a`, then earliest in `b`, wins.
fn longest_match(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // prev[j + 1] = length of the match ending at (i - 1, j)
    let mut prev = vec![0usize; bhi - blo + 1];
    let mut cur = vec![0usize; bhi - blo + 1];
    for i in alo..ahi {
        for j in blo..bhi {
            let k = j - blo;
            if a[i] == b[j] {
                let len = prev[k] + 1;
                cur[k + 1] = len;
                if len > best_size {
                    best_i = i + 1 - len;
                    best_j = j + 1 - len;
                    best_size = len;
                }
            } else {
                cur[k + 1] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    (best_i, best_j, best_size)
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut stack = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = stack.pop() {
        if alo >= ahi || blo >= bhi { continue; }
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 { continue; }
        total += k;
        stack.push((alo, i, blo, j));
        stack.push((i + k, ahi, j + k, bhi));
    }
    total
}

/// Ratcliff/Obershelp similarity in `[0, 1]`. Two empty strings score 1.0.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Highest-ratio candidate at or above `cutoff`; the first one in list order wins ties.
///
/// The ratio is not symmetric, so the candidate is always the first sequence and the query
/// the second.
pub fn closest_match<S: AsRef<str>>(query: &str, candidates: &[S], cutoff: f64) -> Option<CloseMatch> {
    let mut best: Option<CloseMatch> = None;
    for (index, cand) in candidates.iter().enumerate() {
        let ratio = similarity_ratio(cand.as_ref(), query);
        if ratio < cutoff { continue; }
        if best.map_or(true, |b| ratio > b.ratio) {
            best = Some(CloseMatch { index, ratio });
        }
    }
    best
}

/// Resolve `query` against lowercase titles in corpus order.
pub fn resolve_title<S: AsRef<str>>(query: &str, lowercase_titles: &[S]) -> Result<DocId> {
    let needle = normalize_query(query);
    if let Some(idx) = lowercase_titles.iter().position(|t| t.as_ref() == needle) {
        return Ok(idx);
    }
    match closest_match(&needle, lowercase_titles, DEFAULT_CUTOFF) {
        Some(m) => {
            tracing::debug!(query = %needle, matched = lowercase_titles[m.index].as_ref(), ratio = m.ratio, "approximate title match");
            Ok(m.index)
        }
        None => Err(CoreError::MovieNotFound(query.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_known_values() {
        assert_eq!(similarity_ratio("", ""), 1.0);
        assert_eq!(similarity_ratio("abc", ""), 0.0);
        assert_eq!(similarity_ratio("avatar", "avatar"), 1.0);
        // "avatr" vs "avatar": blocks "avat" + "r" => 2 * 5 / 11
        assert!((similarity_ratio("avatr", "avatar") - 10.0 / 11.0).abs() < 1e-12);
        // "abcd" vs "bcde": block "bcd" => 6 / 8
        assert!((similarity_ratio("abcd", "bcde") - 0.75).abs() < 1e-12);
    }

    #[test]
    fn exact_match_beats_approximate() {
        let titles = ["avatars", "avatar"];
        assert_eq!(resolve_title("  AVATAR ", &titles).unwrap(), 1);
    }

    #[test]
    fn duplicates_resolve_to_first() {
        let titles = ["heat", "up", "heat"];
        assert_eq!(resolve_title("Heat", &titles).unwrap(), 0);
    }

    #[test]
    fn misspelling_resolves() {
        let titles = ["titanic", "avatar", "spectre"];
        assert_eq!(resolve_title("avatr", &titles).unwrap(), 1);
    }

    #[test]
    fn ties_keep_corpus_order() {
        let m = closest_match("abcx", &["abcy", "abcz"], 0.6).unwrap();
        assert_eq!(m.index, 0);
    }

    #[test]
    fn ratio_depends_on_argument_order() {
        assert!((similarity_ratio("spectre", "spcerte") - 10.0 / 14.0).abs() < 1e-12);
        assert!((similarity_ratio("spcerte", "spectre") - 8.0 / 14.0).abs() < 1e-12);
    }

    #[test]
    fn transposed_letters_resolve_against_candidate_order() {
        assert_eq!(resolve_title("spcerte", &["spectre"]).unwrap(), 0);
        assert!(matches!(resolve_title("septcrle", &["spectre"]), Err(CoreError::MovieNotFound(_))));
    }

    #[test]
    fn cutoff_is_inclusive() {
        assert_eq!(similarity_ratio("abcxy", "abcde"), 0.6);
        assert_eq!(resolve_title("abcde", &["abcxy"]).unwrap(), 0);
        // 8 / 14 just under the cutoff
        assert!(matches!(resolve_title("abcdefg", &["abcdxyz"]), Err(CoreError::MovieNotFound(_))));
    }

    #[test]
    fn below_cutoff_is_not_found() {
        let titles = ["avatar", "titanic"];
        let err = resolve_title("Nonexistent Movie Title Xyz", &titles).unwrap_err();
        assert!(matches!(err, CoreError::MovieNotFound(_)));
        assert!(closest_match("qqq", &["avatar"], DEFAULT_CUTOFF).is_none());
    }
}
