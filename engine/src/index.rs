use std::collections::HashMap;

use thiserror::Error;

use crate::document::{DocId, Document, Field};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("duplicate doc_id during ingestion: {0}")]
    DuplicateDocId(DocId),
    #[error("cannot build an index over an empty corpus")]
    EmptyCorpus,
}

/// IDF weighting variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdfMode {
    /// `ln((n + 1) / (df + 1)) + 1`. Strictly positive for every indexed
    /// term, including terms that occur in every document.
    #[default]
    Smoothed,
    /// `ln(n / df)`. Zero for ubiquitous terms; `df >= 1` always holds
    /// because postings carry no zero entries.
    Standard,
}

/// Inverted index over one field of a document collection, bundled with the
/// per-document lengths and the IDF table derived from it. Built in a single
/// construction step so the IDF weights can never be paired with postings
/// from a different build.
#[derive(Debug, Clone)]
pub struct FieldIndex {
    postings: HashMap<String, HashMap<DocId, u32>>,
    doc_lengths: HashMap<DocId, usize>,
    avg_doc_length: f64,
    num_docs: usize,
    idf: HashMap<String, f64>,
}

impl FieldIndex {
    /// One pass over the documents, one pass over each document's tokens.
    /// Rejects duplicate ids instead of silently overwriting the earlier
    /// document's postings.
    pub fn build(documents: &[Document], field: Field, mode: IdfMode) -> Result<Self, IndexError> {
        if documents.is_empty() {
            return Err(IndexError::EmptyCorpus);
        }

        let mut postings: HashMap<String, HashMap<DocId, u32>> = HashMap::new();
        let mut doc_lengths: HashMap<DocId, usize> = HashMap::new();
        let mut total_len = 0usize;

        for doc in documents {
            let tokens = doc.tokens(field);
            if doc_lengths
                .insert(doc.doc_id.clone(), tokens.len())
                .is_some()
            {
                return Err(IndexError::DuplicateDocId(doc.doc_id.clone()));
            }
            total_len += tokens.len();
            for token in tokens {
                *postings
                    .entry(token.clone())
                    .or_default()
                    .entry(doc.doc_id.clone())
                    .or_insert(0) += 1;
            }
        }

        let num_docs = documents.len();
        let avg_doc_length = total_len as f64 / num_docs as f64;
        let idf = compute_idf(&postings, num_docs, mode);

        tracing::debug!(num_docs, num_terms = postings.len(), "field index built");

        Ok(Self {
            postings,
            doc_lengths,
            avg_doc_length,
            num_docs,
            idf,
        })
    }

    /// Postings for one term: `doc_id -> term frequency`, every entry >= 1.
    pub fn postings(&self, term: &str) -> Option<&HashMap<DocId, u32>> {
        self.postings.get(term)
    }

    /// IDF weight for a term, defined exactly for the indexed terms.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Token count of one document in the indexed field.
    pub fn doc_length(&self, doc_id: &str) -> Option<usize> {
        self.doc_lengths.get(doc_id).copied()
    }

    pub fn avg_doc_length(&self) -> f64 {
        self.avg_doc_length
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }
}

fn compute_idf(
    postings: &HashMap<String, HashMap<DocId, u32>>,
    num_docs: usize,
    mode: IdfMode,
) -> HashMap<String, f64> {
    let n = num_docs as f64;
    postings
        .iter()
        .map(|(term, docs)| {
            let df = docs.len() as f64;
            let idf = match mode {
                IdfMode::Smoothed => ((n + 1.0) / (df + 1.0)).ln() + 1.0,
                IdfMode::Standard => (n / df).ln(),
            };
            (term.clone(), idf)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(doc_id: &str, body: &[&str]) -> Document {
        Document {
            doc_id: doc_id.to_string(),
            title_tokens: Vec::new(),
            body_tokens: body.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn counts_term_frequencies() {
        let docs = vec![doc("d1", &["cat", "cat"]), doc("d2", &["cat", "dog"])];
        let index = FieldIndex::build(&docs, Field::Body, IdfMode::Smoothed).unwrap();

        let cat = index.postings("cat").unwrap();
        assert_eq!(cat.get("d1"), Some(&2));
        assert_eq!(cat.get("d2"), Some(&1));
        assert!(index.postings("dog").unwrap().get("d1").is_none());
    }

    #[test]
    fn doc_length_equals_sum_of_postings() {
        let docs = vec![
            doc("d1", &["a", "b", "a", "c"]),
            doc("d2", &["b", "b"]),
            doc("d3", &["c"]),
        ];
        let index = FieldIndex::build(&docs, Field::Body, IdfMode::Smoothed).unwrap();

        for id in ["d1", "d2", "d3"] {
            let summed: u32 = index
                .terms()
                .map(|t| index.postings(t).and_then(|p| p.get(id)).copied().unwrap_or(0))
                .sum();
            assert_eq!(summed as usize, index.doc_length(id).unwrap());
        }
    }

    #[test]
    fn average_length_is_arithmetic_mean() {
        let docs = vec![doc("d1", &["a", "b"]), doc("d2", &["a", "b", "c", "d"])];
        let index = FieldIndex::build(&docs, Field::Body, IdfMode::Smoothed).unwrap();
        assert!((index.avg_doc_length() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_empty_corpus() {
        let err = FieldIndex::build(&[], Field::Body, IdfMode::Smoothed).unwrap_err();
        assert_eq!(err, IndexError::EmptyCorpus);
    }

    #[test]
    fn rejects_duplicate_doc_id() {
        let docs = vec![doc("d1", &["a"]), doc("d1", &["b"])];
        let err = FieldIndex::build(&docs, Field::Body, IdfMode::Smoothed).unwrap_err();
        assert_eq!(err, IndexError::DuplicateDocId("d1".to_string()));
    }

    #[test]
    fn smoothed_idf_is_strictly_positive() {
        let docs = vec![
            doc("d1", &["ubiquitous", "rare"]),
            doc("d2", &["ubiquitous"]),
            doc("d3", &["ubiquitous"]),
        ];
        let index = FieldIndex::build(&docs, Field::Body, IdfMode::Smoothed).unwrap();
        for term in index.terms() {
            assert!(index.idf(term).unwrap() > 0.0, "idf({term}) not positive");
        }
    }

    #[test]
    fn standard_idf_is_zero_for_ubiquitous_terms() {
        let docs = vec![doc("d1", &["everywhere"]), doc("d2", &["everywhere"])];
        let index = FieldIndex::build(&docs, Field::Body, IdfMode::Standard).unwrap();
        assert!(index.idf("everywhere").unwrap().abs() < 1e-12);
    }

    #[test]
    fn idf_defined_only_for_indexed_terms() {
        let docs = vec![doc("d1", &["a"])];
        let index = FieldIndex::build(&docs, Field::Body, IdfMode::Smoothed).unwrap();
        assert!(index.idf("missing").is_none());
    }
}
