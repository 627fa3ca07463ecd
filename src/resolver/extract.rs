//! CSS-selector and regex based rank extraction from raw HTML.
//!
//! The upstream profile page is an uncontrolled document: class names and
//! layout drift without notice. Extraction therefore runs an explicit
//! ordered list of strategies, each a pure `fn(&Html) -> Option<String>`,
//! composed by first-success — once a strategy yields, later ones never
//! run. Structural selectors go first, a broad tag scan second, and regex
//! patterns over the raw text are the last resort.
//!
//! All entry points are **synchronous** because the `scraper` crate's
//! types are `!Send` — async callers wrap these in
//! `tokio::task::spawn_blocking`.

use regex::Regex;
use scraper::{Html, Selector};
use serde::Serialize;
use tracing::debug;

/// Tier keywords a candidate label must contain (case-insensitive).
pub const RANK_KEYWORDS: [&str; 8] = [
    "copper",
    "bronze",
    "silver",
    "gold",
    "platinum",
    "diamond",
    "champion",
    "unranked",
];

/// Upper bound on candidate label length. Rejects container elements
/// whose text is an entire paragraph rather than a short tier label.
pub const MAX_LABEL_LEN: usize = 50;

/// How much markup to keep per element in debug reports.
const DEBUG_HTML_TRUNCATE: usize = 120;

/// A single extraction strategy. Pure: document in, candidate label out.
pub type Strategy = fn(&Html) -> Option<String>;

/// The ordered strategy chain, highest priority first.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("known-classes", by_known_classes),
    ("class-contains-rank", by_rank_class_substring),
    ("class-contains-tier", by_tier_class_substring),
    ("broad-tag-scan", by_broad_tag_scan),
    ("regex-key-value", by_regex_key_value),
];

/// Run the strategy chain against raw HTML, returning the first hit.
pub fn extract_rank(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    for (name, strategy) in STRATEGIES {
        if let Some(rank) = strategy(&document) {
            debug!(strategy = name, rank = %rank, "extraction strategy matched");
            return Some(rank);
        }
    }
    debug!("no extraction strategy matched");
    None
}

/// Whether trimmed element text qualifies as a rank label: non-empty,
/// shorter than [`MAX_LABEL_LEN`], containing a tier keyword.
pub fn is_rank_label(text: &str) -> bool {
    if text.is_empty() || text.chars().count() >= MAX_LABEL_LEN {
        return false;
    }
    let lower = text.to_lowercase();
    RANK_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Collapse an element's text fragments into one trimmed, space-normalized
/// string. `ElementRef::text()` yields one fragment per text node.
fn element_text(el: scraper::ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Evaluate one selector in document order, returning the first element
/// whose text passes [`is_rank_label`].
fn first_label_matching(document: &Html, selector: &Selector, name: &str) -> Option<String> {
    let mut candidates = 0usize;
    let mut hit = None;
    for el in document.select(selector) {
        candidates += 1;
        if hit.is_none() {
            let text = element_text(el);
            if is_rank_label(&text) {
                hit = Some(text);
            }
        }
    }
    debug!(selector = name, candidates, matched = hit.is_some(), "selector pass");
    hit
}

// ── Strategies, in priority order ────────────────────────────────────────────

/// Class names the upstream has been observed to use for the tier label.
fn by_known_classes(document: &Html) -> Option<String> {
    let sel = Selector::parse("span.rank-text, .rank-name, .player-rank, .tier-label").unwrap();
    first_label_matching(document, &sel, "known-classes")
}

/// Any element whose class attribute contains "rank".
fn by_rank_class_substring(document: &Html) -> Option<String> {
    let sel = Selector::parse(r#"[class*="rank"]"#).unwrap();
    first_label_matching(document, &sel, "class-contains-rank")
}

/// Any element whose class attribute contains "tier".
fn by_tier_class_substring(document: &Html) -> Option<String> {
    let sel = Selector::parse(r#"[class*="tier"]"#).unwrap();
    first_label_matching(document, &sel, "class-contains-tier")
}

/// Fallback: scan the broad label-bearing tag set in document order.
fn by_broad_tag_scan(document: &Html) -> Option<String> {
    let sel = Selector::parse("span, div, p, td, th").unwrap();
    first_label_matching(document, &sel, "broad-tag-scan")
}

/// Last resort: `rank:` / `tier:` key-value patterns over the raw
/// document text. The first captured group containing a keyword wins.
fn by_regex_key_value(document: &Html) -> Option<String> {
    let text = document.root_element().text().collect::<String>();

    let rank_re = Regex::new(r"(?i)\brank\s*:\s*([A-Za-z]+(?:\s+[IVX0-9]+)?)")
        .expect("rank key-value regex is valid");
    let tier_re = Regex::new(r"(?i)\btier\s*:\s*([A-Za-z]+(?:\s+[IVX0-9]+)?)")
        .expect("tier key-value regex is valid");

    for re in [&rank_re, &tier_re] {
        for caps in re.captures_iter(&text) {
            let candidate = caps[1].trim().to_string();
            if is_rank_label(&candidate) {
                debug!(pattern = re.as_str(), rank = %candidate, "regex fallback matched");
                return Some(candidate);
            }
        }
    }
    None
}

// ── Debug scan ───────────────────────────────────────────────────────────────

/// One element whose text contained a rank keyword, for `/debug` output.
#[derive(Debug, Clone, Serialize)]
pub struct ElementHit {
    pub tag: String,
    pub classes: Vec<String>,
    /// Outer markup, truncated.
    pub html: String,
    pub text: String,
}

/// Collect every element whose text contains a rank keyword, regardless
/// of length or class. Introspection aid for upstream drift, not part of
/// the extraction chain.
pub fn scan_keyword_elements(html: &str) -> Vec<ElementHit> {
    let document = Html::parse_document(html);
    let all = Selector::parse("*").unwrap();

    document
        .select(&all)
        .filter_map(|el| {
            let text = element_text(el);
            let lower = text.to_lowercase();
            if !RANK_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
                return None;
            }
            Some(ElementHit {
                tag: el.value().name().to_string(),
                classes: el.value().classes().map(str::to_string).collect(),
                html: el.html().chars().take(DEBUG_HTML_TRUNCATE).collect(),
                text,
            })
        })
        .collect()
}
