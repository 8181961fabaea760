use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::parser::RawDoc;

/// One row of the collection CSV, keyed to a page by the last path segment
/// of its `url` column. The column headers carry the exporter's type prefix.
#[derive(Debug, Deserialize)]
struct MetaRow {
    url: String,
    #[serde(rename = "STRING : publisher", default)]
    publisher: String,
    #[serde(rename = "STRING : genre", default)]
    genre: String,
    #[serde(rename = "STRING : esrb", default)]
    esrb: String,
}

#[derive(Debug, Clone, Default)]
pub struct DocMeta {
    pub publisher: String,
    pub genre: String,
    pub esrb: String,
}

pub fn load_metadata(path: &Path) -> Result<HashMap<String, DocMeta>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut meta = HashMap::new();
    for row in reader.deserialize() {
        let row: MetaRow = row?;
        let doc_id = row
            .url
            .rsplit('/')
            .next()
            .unwrap_or(row.url.as_str())
            .to_string();
        meta.insert(
            doc_id,
            DocMeta {
                publisher: row.publisher,
                genre: row.genre,
                esrb: row.esrb,
            },
        );
    }
    tracing::info!(num_rows = meta.len(), path = %path.display(), "loaded metadata");
    Ok(meta)
}

/// Documents whose publisher matches exactly (case-insensitive).
pub fn relevant_by_publisher(meta: &HashMap<String, DocMeta>, publisher: &str) -> HashSet<String> {
    let publisher = publisher.to_lowercase();
    meta.iter()
        .filter(|(_, m)| m.publisher.to_lowercase() == publisher)
        .map(|(doc_id, _)| doc_id.clone())
        .collect()
}

/// Documents whose genre contains the term (case-insensitive substring).
pub fn relevant_by_genre_contains(meta: &HashMap<String, DocMeta>, term: &str) -> HashSet<String> {
    let term = term.to_lowercase();
    meta.iter()
        .filter(|(_, m)| m.genre.to_lowercase().contains(&term))
        .map(|(doc_id, _)| doc_id.clone())
        .collect()
}

/// Documents whose page title contains the phrase (case-insensitive substring).
pub fn relevant_by_title_contains(docs: &[RawDoc], phrase: &str) -> HashSet<String> {
    let phrase = phrase.to_lowercase();
    docs.iter()
        .filter(|d| d.title.to_lowercase().contains(&phrase))
        .map(|d| d.doc_id.clone())
        .collect()
}
