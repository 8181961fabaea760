use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::document::DocId;
use crate::index::FieldIndex;

/// BM25 tuning constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f64,
    /// Length-normalization strength.
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

/// Weights for combining title and body rankings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FieldWeights {
    pub title: f64,
    pub body: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 2.0,
            body: 1.0,
        }
    }
}

/// TF-IDF ranking. Scoring is sparse: only documents containing at least one
/// query term appear in the output. Repeated query terms contribute once per
/// occurrence.
pub fn rank_tfidf(index: &FieldIndex, query: &[String]) -> Vec<(DocId, f64)> {
    let mut scores: HashMap<DocId, f64> = HashMap::new();
    for term in query {
        let Some(postings) = index.postings(term) else {
            continue;
        };
        let idf = index.idf(term).unwrap_or(0.0);
        for (doc_id, &tf) in postings {
            *scores.entry(doc_id.clone()).or_insert(0.0) += tf as f64 * idf;
        }
    }
    sort_ranked(scores)
}

/// BM25 ranking, same sparse behavior as [`rank_tfidf`].
pub fn rank_bm25(index: &FieldIndex, query: &[String], params: Bm25Params) -> Vec<(DocId, f64)> {
    let avg_dl = index.avg_doc_length();
    let mut scores: HashMap<DocId, f64> = HashMap::new();
    for term in query {
        let Some(postings) = index.postings(term) else {
            continue;
        };
        let idf = index.idf(term).unwrap_or(0.0);
        for (doc_id, &tf) in postings {
            let tf = tf as f64;
            let dl = index.doc_length(doc_id).unwrap_or(0) as f64;
            let numerator = tf * (params.k1 + 1.0);
            let denominator = tf + params.k1 * (1.0 - params.b + params.b * dl / avg_dl);
            *scores.entry(doc_id.clone()).or_insert(0.0) += idf * numerator / denominator;
        }
    }
    sort_ranked(scores)
}

/// Weighted merge of two rankings over the UNION of their documents: a
/// document scored in only one ranking keeps its weighted score, with the
/// missing side counted as zero. This differs on purpose from the sparse
/// per-field rule above.
pub fn combine_weighted(
    a: &[(DocId, f64)],
    b: &[(DocId, f64)],
    w_a: f64,
    w_b: f64,
) -> Vec<(DocId, f64)> {
    let mut scores: HashMap<DocId, f64> = HashMap::new();
    for (doc_id, score) in a {
        *scores.entry(doc_id.clone()).or_insert(0.0) += w_a * score;
    }
    for (doc_id, score) in b {
        *scores.entry(doc_id.clone()).or_insert(0.0) += w_b * score;
    }
    sort_ranked(scores)
}

/// TF-IDF over a title index and a body index, combined per [`combine_weighted`].
pub fn rank_tfidf_weighted(
    title: &FieldIndex,
    body: &FieldIndex,
    query: &[String],
    weights: FieldWeights,
) -> Vec<(DocId, f64)> {
    let title_results = rank_tfidf(title, query);
    let body_results = rank_tfidf(body, query);
    combine_weighted(&title_results, &body_results, weights.title, weights.body)
}

/// BM25 over a title index and a body index, combined per [`combine_weighted`].
pub fn rank_bm25_weighted(
    title: &FieldIndex,
    body: &FieldIndex,
    query: &[String],
    params: Bm25Params,
    weights: FieldWeights,
) -> Vec<(DocId, f64)> {
    let title_results = rank_bm25(title, query, params);
    let body_results = rank_bm25(body, query, params);
    combine_weighted(&title_results, &body_results, weights.title, weights.body)
}

/// Score descending; ties broken by ascending doc id so repeated runs over
/// the same index produce identical orderings.
fn sort_ranked(scores: HashMap<DocId, f64>) -> Vec<(DocId, f64)> {
    let mut ranked: Vec<(DocId, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, Field};
    use crate::index::IdfMode;

    fn doc(doc_id: &str, body: &[&str]) -> Document {
        Document {
            doc_id: doc_id.to_string(),
            title_tokens: Vec::new(),
            body_tokens: body.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn query(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    fn index(docs: &[Document]) -> FieldIndex {
        FieldIndex::build(docs, Field::Body, IdfMode::Smoothed).unwrap()
    }

    #[test]
    fn non_matching_documents_are_omitted() {
        let docs = vec![doc("d1", &["cat"]), doc("d2", &["dog"])];
        let idx = index(&docs);
        let results = rank_tfidf(&idx, &query(&["cat"]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "d1");
    }

    #[test]
    fn unknown_query_terms_yield_empty_ranking() {
        let docs = vec![doc("d1", &["cat"])];
        let idx = index(&docs);
        assert!(rank_tfidf(&idx, &query(&["zebra"])).is_empty());
        assert!(rank_bm25(&idx, &query(&["zebra"]), Bm25Params::default()).is_empty());
    }

    #[test]
    fn repeated_query_terms_count_per_occurrence() {
        let docs = vec![doc("d1", &["cat", "fish"]), doc("d2", &["fish", "fish"])];
        let idx = index(&docs);
        let once = rank_tfidf(&idx, &query(&["cat"]));
        let twice = rank_tfidf(&idx, &query(&["cat", "cat"]));
        assert!((twice[0].1 - 2.0 * once[0].1).abs() < 1e-12);
    }

    #[test]
    fn ties_break_by_doc_id() {
        let docs = vec![doc("b", &["cat"]), doc("a", &["cat"]), doc("c", &["cat"])];
        let idx = index(&docs);
        let results = rank_tfidf(&idx, &query(&["cat"]));
        let ids: Vec<&str> = results
            .iter()
            .map(|(id, _)| id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn scores_are_non_increasing() {
        let docs = vec![
            doc("d1", &["cat", "cat", "cat"]),
            doc("d2", &["cat", "dog"]),
            doc("d3", &["dog", "dog", "fish"]),
        ];
        let idx = index(&docs);
        for results in [
            rank_tfidf(&idx, &query(&["cat", "dog", "fish"])),
            rank_bm25(&idx, &query(&["cat", "dog", "fish"]), Bm25Params::default()),
        ] {
            for pair in results.windows(2) {
                assert!(pair[0].1 >= pair[1].1);
            }
        }
    }

    #[test]
    fn combine_unions_with_zero_default() {
        let a = vec![("d1".to_string(), 2.0), ("d2".to_string(), 1.0)];
        let b = vec![("d2".to_string(), 3.0), ("d3".to_string(), 4.0)];
        let combined = combine_weighted(&a, &b, 2.0, 1.0);

        let scores: HashMap<&str, f64> = combined.iter().map(|(id, s)| (id.as_str(), *s)).collect();
        assert_eq!(scores.len(), 3);
        assert!((scores["d1"] - 4.0).abs() < 1e-12); // title side only
        assert!((scores["d2"] - 5.0).abs() < 1e-12); // both sides
        assert!((scores["d3"] - 4.0).abs() < 1e-12); // body side only
    }

    #[test]
    fn combine_is_model_agnostic_over_empty_inputs() {
        let a: Vec<(DocId, f64)> = Vec::new();
        let b = vec![("d1".to_string(), 1.5)];
        let combined = combine_weighted(&a, &b, 2.0, 1.0);
        assert_eq!(combined, vec![("d1".to_string(), 1.5)]);
    }
}
