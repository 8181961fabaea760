use serde::{Deserialize, Serialize};

/// Stable, opaque document identifier. For a stored HTML collection this is
/// the file name; the engine only relies on uniqueness.
pub type DocId = String;

/// Which token sequence of a document an index is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Title,
    Body,
}

/// A tokenized document. Immutable after ingestion; the engine never touches
/// the raw text, only the token sequences the caller prepared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: DocId,
    pub title_tokens: Vec<String>,
    pub body_tokens: Vec<String>,
}

impl Document {
    pub fn tokens(&self, field: Field) -> &[String] {
        match field {
            Field::Title => &self.title_tokens,
            Field::Body => &self.body_tokens,
        }
    }
}
