//! Plaintext digest of a page's body paragraphs.
//!
//! Chrome subtrees (scripts, navigation, headers, footers, forms, ...) are
//! skipped rather than removed, so the parsed document stays untouched and
//! can be shared with headline discovery.

use super::headline::element_text;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Paragraphs must be longer than this (in cleaned chars) to be kept.
const MIN_PARAGRAPH_CHARS: usize = 30;

const STRIPPED_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "aside", "noscript", "iframe", "form",
];

static MAIN_ROOTS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["main", "article", r#"[role="main"]"#, r#"[class*="content"]"#, "body"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

fn is_stripped(element: ElementRef<'_>) -> bool {
    STRIPPED_TAGS.contains(&element.value().name())
}

/// True when the element or one of its ancestors is a chrome subtree.
fn inside_stripped(element: ElementRef<'_>) -> bool {
    is_stripped(element) || element.ancestors().filter_map(ElementRef::wrap).any(is_stripped)
}

/// The element whose paragraphs make up the page's main content.
fn main_root(document: &Html) -> Option<ElementRef<'_>> {
    MAIN_ROOTS.iter().find_map(|selector| {
        document
            .select(selector)
            .find(|el| !inside_stripped(*el))
    })
}

/// Concatenate every sufficiently long paragraph under the main content root,
/// each followed by a blank line.
pub fn extract_content(document: &Html) -> String {
    let Some(root) = main_root(document) else {
        return String::new();
    };

    let mut out = String::new();
    for paragraph in root.select(&PARAGRAPH) {
        if inside_stripped(paragraph) {
            continue;
        }
        let text = element_text(paragraph);
        if text.chars().count() > MIN_PARAGRAPH_CHARS {
            out.push_str(&text);
            out.push_str("\n\n");
        }
    }
    out.trim().to_string()
}
