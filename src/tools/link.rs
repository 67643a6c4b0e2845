//! URL classification for conditional enrichment.
//!
//! The search provider returns general web results; these pure functions
//! decide which URLs the specialized extractors can enrich. Malformed URLs
//! classify as plain web links, never as errors.

use url::Url;

use crate::models::ClassifiedLinks;

const ARXIV_DOMAIN: &str = "arxiv.org";
const ARXIV_PATH_PATTERNS: [&str; 2] = ["/abs/", "/pdf/"];

const WIKIPEDIA_DOMAIN: &str = "wikipedia.org";
const WIKIPEDIA_PATH_PATTERN: &str = "/wiki/";

/// Group URLs by the extractor that can handle them.
pub fn classify(urls: &[String]) -> ClassifiedLinks {
    let mut result = ClassifiedLinks::default();

    for raw in urls {
        if is_arxiv(raw) {
            result.papers.push(raw.clone());
        } else if is_wikipedia(raw) {
            result.encyclopedia.push(raw.clone());
        } else {
            result.other.push(raw.clone());
        }
    }

    result
}

fn is_arxiv(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => {
            let domain_matches = url
                .host_str()
                .map(|h| h.to_ascii_lowercase().contains(ARXIV_DOMAIN))
                .unwrap_or(false);
            let path = url.path().to_ascii_lowercase();
            domain_matches && ARXIV_PATH_PATTERNS.iter().any(|p| path.contains(p))
        }
        Err(_) => false,
    }
}

fn is_wikipedia(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => {
            let domain_matches = url
                .host_str()
                .map(|h| h.to_ascii_lowercase().contains(WIKIPEDIA_DOMAIN))
                .unwrap_or(false);
            let path = url.path().to_ascii_lowercase();
            domain_matches && path.contains(WIKIPEDIA_PATH_PATTERN)
        }
        Err(_) => false,
    }
}

/// Extract the paper id from an arXiv URL.
///
/// Handles `/abs/<id>` and `/pdf/<id>` forms, stripping a `.pdf` suffix
/// and trailing slashes.
pub fn arxiv_id(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let path = url.path();

    for pattern in ARXIV_PATH_PATTERNS {
        if let Some(rest) = path.split(pattern).nth(1) {
            let id = rest.trim_end_matches(".pdf").trim_matches('/');
            if !id.is_empty() {
                return Some(id.to_string());
            }
        }
    }

    None
}

/// Extract the article title from a Wikipedia URL, dropping fragment and
/// query parts.
pub fn wikipedia_title(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let path = url.path();

    let title = path.split(WIKIPEDIA_PATH_PATTERN).nth(1)?;
    let title = title.trim_matches('/');
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}
