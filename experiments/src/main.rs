//! Retrieval-quality experiments: TF-IDF vs BM25, preprocessing sweeps, and
//! title/body field weighting, evaluated with precision@k and recall@k
//! against metadata-derived relevance sets.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use corpus::metadata::{
    load_metadata, relevant_by_genre_contains, relevant_by_publisher, relevant_by_title_contains,
};
use corpus::{parse_collection, DocMeta, RawDoc};
use engine::eval::{precision_at_k, recall_at_k};
use engine::rank::{rank_bm25, rank_bm25_weighted, rank_tfidf, rank_tfidf_weighted};
use engine::tokenizer::{process_text, TokenizeConfig};
use engine::{Bm25Params, DocId, Document, Field, FieldIndex, FieldWeights, IdfMode};
use tracing_subscriber::{fmt, EnvFilter};

const QUERIES: [&str; 6] = [
    "Pokémon Trozei",
    "Tony Hawk's Downhill Jam",
    "Arcade type games",
    "London Taxi: Rush Hour",
    "Game published by Atari",
    "The Sims 2 Apartment Pets",
];

/// Stop-word / stemming configurations swept in the preprocessing experiment.
const CONFIGS: [(&str, bool, bool); 4] = [
    ("SW_ON_STEM_ON", true, true),
    ("SW_OFF_STEM_ON", false, true),
    ("SW_ON_STEM_OFF", true, false),
    ("SW_OFF_STEM_OFF", false, false),
];

#[derive(Parser)]
#[command(name = "experiments")]
#[command(about = "Evaluate TF-IDF and BM25 ranking over a stored HTML collection", long_about = None)]
struct Cli {
    /// Directory of stored .html pages
    #[arg(long)]
    corpus: PathBuf,
    /// Collection metadata CSV (url, publisher, genre, esrb columns)
    #[arg(long)]
    metadata: PathBuf,
    /// Evaluation cutoff
    #[arg(long, default_value_t = 10)]
    k: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let raw = parse_collection(&cli.corpus)?;
    let meta = load_metadata(&cli.metadata)?;
    tracing::info!(num_docs = raw.len(), num_meta = meta.len(), "collection loaded");
    let relevance = build_relevance_sets(&raw, &meta);
    let titles: HashMap<DocId, String> = raw
        .iter()
        .map(|d| (d.doc_id.clone(), d.title.clone()))
        .collect();

    let config = TokenizeConfig::default();
    let documents = tokenize_collection(&raw, &config);
    let title_index = FieldIndex::build(&documents, Field::Title, IdfMode::Smoothed)?;
    let body_index = FieldIndex::build(&documents, Field::Body, IdfMode::Smoothed)?;
    let params = Bm25Params::default();
    let k = cli.k;

    // Baseline: single-field (body) TF-IDF vs BM25.
    println!("Query,TFIDF_P{k},TFIDF_R{k},BM25_P{k},BM25_R{k},NumRelevant");
    for q in QUERIES {
        let relevant = relevance.get(q).cloned().unwrap_or_default();
        if relevant.is_empty() {
            println!("# WARNING: no relevant docs found for query: {q}");
        }
        let query_tokens = process_text(q, &config);
        let tfidf_results = rank_tfidf(&body_index, &query_tokens);
        let bm25_results = rank_bm25(&body_index, &query_tokens, params);

        println!(
            "{q},{:.3},{:.3},{:.3},{:.3},{}",
            precision_at_k(&tfidf_results, &relevant, k),
            recall_at_k(&tfidf_results, &relevant, k),
            precision_at_k(&bm25_results, &relevant, k),
            recall_at_k(&bm25_results, &relevant, k),
            relevant.len()
        );

        // Full top-10 dump for the first query only, to keep output readable.
        if q == QUERIES[0] {
            print_top10(&format!("TF-IDF ({q})"), &tfidf_results, &relevant, &titles);
            print_top10(&format!("BM25 ({q})"), &bm25_results, &relevant, &titles);
        }
    }

    // Field weighting: title counted twice as much as body.
    let weights = FieldWeights::default();
    println!("\nField-weighted (title={}, body={}):", weights.title, weights.body);
    println!("Query,TFIDF_FW_P{k},TFIDF_FW_R{k},BM25_FW_P{k},BM25_FW_R{k}");
    for q in QUERIES {
        let relevant = relevance.get(q).cloned().unwrap_or_default();
        let query_tokens = process_text(q, &config);
        let tfidf_fw = rank_tfidf_weighted(&title_index, &body_index, &query_tokens, weights);
        let bm25_fw = rank_bm25_weighted(&title_index, &body_index, &query_tokens, params, weights);
        println!(
            "{q},{:.3},{:.3},{:.3},{:.3}",
            precision_at_k(&tfidf_fw, &relevant, k),
            recall_at_k(&tfidf_fw, &relevant, k),
            precision_at_k(&bm25_fw, &relevant, k),
            recall_at_k(&bm25_fw, &relevant, k),
        );
    }

    // Preprocessing sweep: rebuild the body index per configuration and
    // tokenize each query the same way.
    for (name, stopwords, stemming) in CONFIGS {
        let sweep_config = TokenizeConfig { stopwords, stemming };
        let sweep_docs = tokenize_collection(&raw, &sweep_config);
        let sweep_index = FieldIndex::build(&sweep_docs, Field::Body, IdfMode::Smoothed)?;

        println!("\n==============================");
        println!("CONFIG: {name}");
        println!("==============================");
        for q in QUERIES {
            let relevant = relevance.get(q).cloned().unwrap_or_default();
            let query_tokens = process_text(q, &sweep_config);
            let tfidf_results = rank_tfidf(&sweep_index, &query_tokens);
            let bm25_results = rank_bm25(&sweep_index, &query_tokens, params);

            println!("\nQuery: {q}");
            println!("TF-IDF P@{k}: {:.3}", precision_at_k(&tfidf_results, &relevant, k));
            println!("BM25   P@{k}: {:.3}", precision_at_k(&bm25_results, &relevant, k));
            println!("TF-IDF R@{k}: {:.3}", recall_at_k(&tfidf_results, &relevant, k));
            println!("BM25   R@{k}: {:.3}", recall_at_k(&bm25_results, &relevant, k));
        }
    }

    Ok(())
}

fn tokenize_collection(raw: &[RawDoc], config: &TokenizeConfig) -> Vec<Document> {
    raw.iter()
        .map(|d| Document {
            doc_id: d.doc_id.clone(),
            title_tokens: process_text(&d.title, config),
            body_tokens: process_text(&d.body, config),
        })
        .collect()
}

fn build_relevance_sets(
    raw: &[RawDoc],
    meta: &HashMap<String, DocMeta>,
) -> HashMap<&'static str, HashSet<DocId>> {
    let mut relevance: HashMap<&'static str, HashSet<DocId>> = HashMap::new();

    relevance.insert("Game published by Atari", relevant_by_publisher(meta, "Atari"));
    relevance.insert("Arcade type games", relevant_by_genre_contains(meta, "Arcade"));

    // Title-based relevance for the specific game queries.
    relevance.insert("Pokémon Trozei", relevant_by_title_contains(raw, "trozei"));
    relevance.insert(
        "Tony Hawk's Downhill Jam",
        relevant_by_title_contains(raw, "tony hawk"),
    );
    relevance.insert(
        "London Taxi: Rush Hour",
        relevant_by_title_contains(raw, "london taxi"),
    );
    relevance.insert(
        "The Sims 2 Apartment Pets",
        relevant_by_title_contains(raw, "apartment pets"),
    );

    relevance
}

fn print_top10(
    label: &str,
    results: &[(DocId, f64)],
    relevant: &HashSet<DocId>,
    titles: &HashMap<DocId, String>,
) {
    println!("\n{label} Top 10 Results:\n");
    for (rank, (doc_id, score)) in results.iter().take(10).enumerate() {
        let tag = if relevant.contains(doc_id) { "REL" } else { "   " };
        let title = titles.get(doc_id).map(String::as_str).unwrap_or("UNKNOWN TITLE");
        println!("{:2}. [{tag}] {doc_id}", rank + 1);
        println!("    {title}");
        println!("    score = {score:.4}\n");
    }
}
