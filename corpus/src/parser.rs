use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use lazy_static::lazy_static;
use scraper::{Html, Node, Selector};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

lazy_static! {
    static ref TITLE_SEL: Selector = Selector::parse("title").expect("valid selector");
    static ref BODY_SEL: Selector = Selector::parse("body").expect("valid selector");
}

/// Boilerplate elements whose text never belongs in the indexed body.
const SKIP_TAGS: &[&str] = &["script", "style", "nav", "footer", "header"];

/// A parsed page: stable id (the file name) plus cleaned title and body text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDoc {
    pub doc_id: String,
    pub title: String,
    pub body: String,
}

/// Extract title and body text from one HTML page. Falls back to the whole
/// document's text when there is no `<body>` element.
pub fn parse_html(doc_id: impl Into<String>, html: &str) -> RawDoc {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SEL)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();

    let mut body = String::new();
    match document.select(&BODY_SEL).next() {
        Some(el) => collect_text(*el, &mut body),
        None => collect_text(document.tree.root(), &mut body),
    }

    RawDoc {
        doc_id: doc_id.into(),
        title: clean_text(&title),
        body: clean_text(&body),
    }
}

/// Load every `*.html` file directly under `dir`, sorted by path so document
/// order is stable between runs. Unreadable files are skipped with a warning;
/// a missing directory is an error.
pub fn parse_collection(dir: &Path) -> Result<Vec<RawDoc>> {
    if !dir.is_dir() {
        bail!("collection directory not found: {}", dir.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path().is_file()
                && e.path().extension().and_then(|s| s.to_str()) == Some("html")
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();

    let mut docs = Vec::with_capacity(files.len());
    for path in files {
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "skipping unreadable file");
                continue;
            }
        };
        let html = String::from_utf8_lossy(&bytes);
        let doc_id = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        docs.push(parse_html(doc_id, &html));
    }

    tracing::info!(num_docs = docs.len(), dir = %dir.display(), "parsed collection");
    Ok(docs)
}

fn collect_text(node: ego_tree::NodeRef<'_, Node>, out: &mut String) {
    if let Some(el) = node.value().as_element() {
        if SKIP_TAGS.contains(&el.name()) {
            return;
        }
    }
    if let Some(text) = node.value().as_text() {
        out.push_str(text);
        out.push(' ');
    }
    for child in node.children() {
        collect_text(child, out);
    }
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title_and_body() {
        let html = "<html><head><title>Test  Page</title></head>\
                    <body><p>Hello   world</p><p>again</p></body></html>";
        let doc = parse_html("page.html", html);
        assert_eq!(doc.doc_id, "page.html");
        assert_eq!(doc.title, "Test Page");
        assert_eq!(doc.body, "Hello world again");
    }

    #[test]
    fn strips_boilerplate_elements() {
        let html = "<html><head><title>T</title><style>p { color: red; }</style></head>\
                    <body><nav>site nav</nav><header>masthead</header>\
                    <p>keep this</p><script>var hidden = 1;</script>\
                    <footer>copyright</footer></body></html>";
        let doc = parse_html("page.html", html);
        assert_eq!(doc.body, "keep this");
    }

    #[test]
    fn falls_back_without_body_element() {
        let doc = parse_html("frag.html", "<p>bare fragment</p>");
        // The HTML5 parser may or may not synthesize a body for a fragment;
        // the text must survive either way.
        assert!(doc.body.contains("bare fragment"));
    }

    #[test]
    fn missing_title_is_empty() {
        let doc = parse_html("page.html", "<html><body>text</body></html>");
        assert_eq!(doc.title, "");
    }
}
