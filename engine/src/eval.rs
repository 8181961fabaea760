//! Ranking-quality metrics. Both functions are pure and total: degenerate
//! inputs return 0.0 instead of failing, so callers can sweep k values and
//! relevance sets without guarding.

use std::collections::HashSet;

use crate::document::DocId;

/// Fraction of the top k results that are relevant. The divisor is the
/// nominal k even when fewer than k results were retrieved; `k == 0`
/// returns 0.0.
pub fn precision_at_k(results: &[(DocId, f64)], relevant: &HashSet<DocId>, k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    let hits = results
        .iter()
        .take(k)
        .filter(|(doc_id, _)| relevant.contains(doc_id))
        .count();
    hits as f64 / k as f64
}

/// Fraction of the relevant documents found in the top k results. An empty
/// relevant set returns 0.0.
pub fn recall_at_k(results: &[(DocId, f64)], relevant: &HashSet<DocId>, k: usize) -> f64 {
    if relevant.is_empty() {
        return 0.0;
    }
    let hits = results
        .iter()
        .take(k)
        .filter(|(doc_id, _)| relevant.contains(doc_id))
        .count();
    hits as f64 / relevant.len() as f64
}
