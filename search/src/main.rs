use std::collections::HashMap;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use corpus::parse_collection;
use engine::rank::rank_bm25;
use engine::tokenizer::{process_text, TokenizeConfig};
use engine::{Bm25Params, DocId, Document, Field, FieldIndex, IdfMode};
use time::macros::format_description;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "search")]
#[command(about = "Interactive BM25 search over a stored HTML collection", long_about = None)]
struct Cli {
    /// Directory of stored .html pages
    #[arg(long)]
    corpus: PathBuf,
    /// Directory where each query's results are saved
    #[arg(long, default_value = "./results")]
    results_dir: PathBuf,
    /// BM25 term-frequency saturation
    #[arg(long, default_value_t = 1.5)]
    k1: f64,
    /// BM25 length-normalization strength
    #[arg(long, default_value_t = 0.75)]
    b: f64,
    /// Keep stop words instead of filtering them
    #[arg(long)]
    keep_stopwords: bool,
    /// Disable Porter stemming
    #[arg(long)]
    no_stemming: bool,
    /// Number of results to print and save
    #[arg(long, default_value_t = 10)]
    top_k: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let config = TokenizeConfig {
        stopwords: !cli.keep_stopwords,
        stemming: !cli.no_stemming,
    };

    let raw = parse_collection(&cli.corpus)?;
    println!("Number of documents: {}", raw.len());

    let titles: HashMap<DocId, String> = raw
        .iter()
        .map(|d| (d.doc_id.clone(), d.title.clone()))
        .collect();
    let documents: Vec<Document> = raw
        .iter()
        .map(|d| Document {
            doc_id: d.doc_id.clone(),
            title_tokens: process_text(&d.title, &config),
            body_tokens: process_text(&d.body, &config),
        })
        .collect();

    let index = FieldIndex::build(&documents, Field::Body, IdfMode::Smoothed)?;
    tracing::info!(
        num_terms = index.num_terms(),
        avg_doc_length = index.avg_doc_length(),
        "index built"
    );

    let params = Bm25Params {
        k1: cli.k1,
        b: cli.b,
    };
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("\nEnter query (or type 'exit'): ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") {
            break;
        }

        let query_tokens = process_text(query, &config);
        let results = rank_bm25(&index, &query_tokens, params);
        print_top(&results, &titles, cli.top_k);

        let path = save_results(&cli.results_dir, query, &results, &titles, cli.top_k)?;
        println!("\nSaved results to: {}", path.display());
    }

    Ok(())
}

fn print_top(results: &[(DocId, f64)], titles: &HashMap<DocId, String>, k: usize) {
    if results.is_empty() {
        println!("\nNo matching documents.");
        return;
    }
    println!("\nTop {} results:\n", k.min(results.len()));
    for (rank, (doc_id, score)) in results.iter().take(k).enumerate() {
        let title = titles.get(doc_id).map(String::as_str).unwrap_or("UNKNOWN TITLE");
        println!("{:2}. {doc_id}", rank + 1);
        println!("    {title}");
        println!("    score = {score:.4}");
    }
}

fn save_results(
    results_dir: &Path,
    query: &str,
    results: &[(DocId, f64)],
    titles: &HashMap<DocId, String>,
    k: usize,
) -> Result<PathBuf> {
    fs::create_dir_all(results_dir)?;
    let stamp = time::OffsetDateTime::now_utc()
        .format(format_description!("[year][month][day]-[hour][minute][second]"))?;
    let path = results_dir.join(format!("results_{stamp}.txt"));

    let mut out = String::new();
    out.push_str(&format!("Query: {query}\n"));
    out.push_str(&format!("Top {k} results:\n\n"));
    for (rank, (doc_id, score)) in results.iter().take(k).enumerate() {
        let title = titles.get(doc_id).map(String::as_str).unwrap_or("UNKNOWN TITLE");
        out.push_str(&format!("{}. {doc_id}\n", rank + 1));
        out.push_str(&format!("  {title}\n"));
        out.push_str(&format!("  score={score:.4}\n\n"));
    }
    fs::write(&path, out)?;
    Ok(path)
}
