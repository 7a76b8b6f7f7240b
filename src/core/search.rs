//! Approximate symbol search over the token universe.
//!
//! A query is matched against the best substring of each symbol using edit
//! distance. The score is `errors / query_len + start / location_distance`,
//! where `start` is the offset of the matched substring, so lower is better
//! and a match at the start of the symbol beats the same match further in.

use super::token::Token;
use std::cmp::Ordering;

pub const DEFAULT_THRESHOLD: f64 = 0.6;
pub const DEFAULT_LOCATION_DISTANCE: f64 = 100.0;

#[derive(Debug, Clone, Copy)]
pub struct FuzzySearch {
    threshold: f64,
    location_distance: f64,
}

impl Default for FuzzySearch {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            location_distance: DEFAULT_LOCATION_DISTANCE,
        }
    }
}

impl FuzzySearch {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Filters and ranks `tokens` by their symbol. An empty query returns
    /// every token in its original order.
    pub fn search<'a>(&self, tokens: &'a [Token], query: &str) -> Vec<&'a Token> {
        if query.is_empty() {
            return tokens.iter().collect();
        }

        let query = query.to_lowercase();
        let query_len = query.chars().count();
        let mut hits: Vec<(f64, usize, &Token)> = tokens
            .iter()
            .filter_map(|token| {
                let symbol = token.symbol.to_lowercase();
                let score = self.score(&symbol, &query)?;
                let length_gap = symbol.chars().count().abs_diff(query_len);
                Some((score, length_gap, token))
            })
            .collect();

        hits.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        hits.into_iter().map(|(_, _, token)| token).collect()
    }

    /// Scores `query` against `text`; `None` when above the threshold.
    pub(crate) fn score(&self, text: &str, query: &str) -> Option<f64> {
        let (errors, start) = best_substring_match(text, query)?;
        let query_len = query.chars().count() as f64;
        let score = errors as f64 / query_len + start as f64 / self.location_distance;
        (score <= self.threshold).then_some(score)
    }
}

/// Smallest edit distance between `pattern` and any substring of `text`,
/// with the start offset of that substring. Ties go to the earliest start.
fn best_substring_match(text: &str, pattern: &str) -> Option<(usize, usize)> {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    if pattern.is_empty() {
        return None;
    }

    // column[i] = (cost, start) of matching pattern[..i] ending at the
    // current text position.
    let mut column: Vec<(usize, usize)> = (0..=pattern.len()).map(|i| (i, 0)).collect();
    let mut best = column[pattern.len()];

    for (j, &tc) in text.iter().enumerate() {
        let mut next = Vec::with_capacity(column.len());
        next.push((0, j + 1));
        for (i, &pc) in pattern.iter().enumerate() {
            let substitute = {
                let (cost, start) = column[i];
                (cost + usize::from(pc != tc), start)
            };
            let skip_text = {
                let (cost, start) = column[i + 1];
                (cost + 1, start)
            };
            let skip_pattern = {
                let (cost, start) = next[i];
                (cost + 1, start)
            };
            next.push(cheapest([substitute, skip_text, skip_pattern]));
        }
        column = next;
        best = cheapest([best, column[pattern.len()]]);
    }

    Some(best)
}

fn cheapest<const N: usize>(candidates: [(usize, usize); N]) -> (usize, usize) {
    candidates
        .into_iter()
        .min_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)))
        .unwrap_or((usize::MAX, 0))
}
