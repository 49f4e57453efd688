use crate::analyzer::analyze;
use crate::error::{IndexError, Result};
use crate::index::{DocId, Field, InvertedIndex, Product};
use crate::matcher::{MatchStrategy, ScoreWeights};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Ranked hits for one query. `total` counts every matching document,
/// regardless of how many were returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub products: Vec<Product>,
    pub total: usize,
}

/// Split query text into distinct lowercase terms, keeping first-seen order.
pub fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for token in analyze(query) {
        if !terms.contains(&token) {
            terms.push(token);
        }
    }
    terms
}

/// Accumulated score per document for every term, field and strategy.
pub fn score_documents(index: &InvertedIndex, terms: &[String], weights: &ScoreWeights) -> HashMap<DocId, f32> {
    let mut scores: HashMap<DocId, f32> = HashMap::new();
    for term in terms {
        for field in Field::ALL {
            let mut token_scores: HashMap<&str, f32> = HashMap::new();
            for strategy in MatchStrategy::ALL {
                strategy.score_candidates(term, index.vocabulary(field), weights, &mut token_scores);
            }
            for (token, contrib) in token_scores {
                for &doc_id in index.postings_for(field, token) {
                    *scores.entry(doc_id).or_insert(0.0) += contrib;
                }
            }
        }
    }
    scores
}

fn by_rank(a: &(DocId, f32), b: &(DocId, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

/// Order by descending score then ascending id, keeping only the first `limit`.
pub fn top_k(mut scored: Vec<(DocId, f32)>, limit: usize) -> Vec<(DocId, f32)> {
    if limit == 0 {
        return Vec::new();
    }
    if limit < scored.len() {
        scored.select_nth_unstable_by(limit - 1, by_rank);
        scored.truncate(limit);
    }
    scored.sort_unstable_by(by_rank);
    scored
}

/// Run `query` against both fields with every match strategy, OR-ing the
/// results together.
pub fn search(index: &InvertedIndex, query: &str, limit: usize, weights: &ScoreWeights) -> Result<SearchResults> {
    if query.trim().is_empty() {
        return Err(IndexError::InvalidQuery("query text is blank".into()));
    }
    let terms = query_terms(query);
    let scores = score_documents(index, &terms, weights);

    let scored: Vec<(DocId, f32)> = scores.into_iter().filter(|(_, s)| *s > 0.0).collect();
    let total = scored.len();
    let ranked = top_k(scored, limit);

    let mut products = Vec::with_capacity(ranked.len());
    for (doc_id, _score) in ranked {
        let product = index
            .forward_record(doc_id)
            .map_err(|e| IndexError::SearchFailure(format!("posting references missing record: {e}")))?;
        products.push(product.clone());
    }

    tracing::debug!(query, terms = terms.len(), total, returned = products.len(), "search complete");
    Ok(SearchResults { products, total })
}
