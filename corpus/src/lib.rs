//! Collection loading: stored HTML pages to plain (doc_id, title, body)
//! records, plus the CSV metadata used to build relevance-judgment sets.

pub mod metadata;
pub mod parser;

pub use metadata::{load_metadata, DocMeta};
pub use parser::{parse_collection, parse_html, RawDoc};
