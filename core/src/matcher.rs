//! Token matchers run against a field's vocabulary.
//!
//! Each [`MatchStrategy`] looks at one vocabulary token at a time and either
//! rejects it or returns a score contribution. A token accepted by several
//! strategies collects all of their contributions.

use crate::config;
use rapidfuzz::distance::levenshtein;
use std::collections::HashMap;

/// Score contribution of each kind of token match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Fuzzy match at edit distance 0.
    pub exact: f32,
    /// Fuzzy match at edit distance 1. Divided by the distance for larger bounds.
    pub one_edit: f32,
    pub prefix: f32,
    pub substring: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            exact: config::SCORE_EXACT,
            one_edit: config::SCORE_ONE_EDIT,
            prefix: config::SCORE_PREFIX,
            substring: config::SCORE_SUBSTRING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Levenshtein distance between term and token at most `max_edits`.
    Fuzzy { max_edits: usize },
    /// Token starts with the term.
    Prefix,
    /// Term occurs anywhere in the token, i.e. `*term*`.
    Substring,
}

impl MatchStrategy {
    /// The strategies every query runs, per field.
    pub const ALL: [MatchStrategy; 3] = [
        MatchStrategy::Fuzzy { max_edits: config::FUZZINESS },
        MatchStrategy::Prefix,
        MatchStrategy::Substring,
    ];

    /// Contribution of `token` for query `term`, or `None` if it does not match.
    /// Both are expected to be lowercased already.
    pub fn score(&self, term: &str, token: &str, weights: &ScoreWeights) -> Option<f32> {
        match *self {
            MatchStrategy::Fuzzy { max_edits } => {
                let term_len = term.chars().count();
                let token_len = token.chars().count();
                // distance is at least the length difference
                if term_len.abs_diff(token_len) > max_edits {
                    return None;
                }
                if term == token {
                    return Some(weights.exact);
                }
                let distance = levenshtein::distance(term.chars(), token.chars());
                match distance {
                    0 => Some(weights.exact),
                    d if d <= max_edits => Some(weights.one_edit / d as f32),
                    _ => None,
                }
            }
            MatchStrategy::Prefix => token.starts_with(term).then_some(weights.prefix),
            MatchStrategy::Substring => token.contains(term).then_some(weights.substring),
        }
    }

    /// Score every token in `vocabulary`, adding matches into `scores`.
    pub fn score_candidates<'v, I>(
        &self,
        term: &str,
        vocabulary: I,
        weights: &ScoreWeights,
        scores: &mut HashMap<&'v str, f32>,
    ) where
        I: IntoIterator<Item = &'v str>,
    {
        if term.is_empty() {
            return;
        }
        for token in vocabulary {
            if let Some(s) = self.score(term, token, weights) {
                *scores.entry(token).or_insert(0.0) += s;
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MatchStrategy::Fuzzy { .. } => "fuzzy",
            MatchStrategy::Prefix => "prefix",
            MatchStrategy::Substring => "substring",
        }
    }
}
