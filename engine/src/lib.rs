//! In-memory inverted-index retrieval: TF-IDF and BM25 ranking over a fixed
//! document collection, with optional title/body field weighting and
//! precision/recall evaluation.

pub mod document;
pub mod eval;
pub mod index;
pub mod rank;
pub mod tokenizer;

pub use document::{DocId, Document, Field};
pub use index::{FieldIndex, IdfMode, IndexError};
pub use rank::{Bm25Params, FieldWeights};
