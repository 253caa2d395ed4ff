//! Headline text extraction and validation for anchor elements.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

/// Minimum cleaned length for nested heading/title text to be preferred.
const PREFERRED_MIN_CHARS: usize = 10;
const MIN_HEADLINE_CHARS: usize = 15;
const MAX_HEADLINE_CHARS: usize = 300;
const MIN_HEADLINE_WORDS: usize = 3;

/// Navigation, promo and boilerplate phrases that never appear in a real headline.
const SKIP_PHRASES: &[&str] = &[
    "read more", "click here", "learn more", "view all", "see more", "see all",
    "subscribe", "sign up", "log in", "register", "newsletter",
    "privacy policy", "terms of service", "cookie policy", "contact us",
    "about us", "advertise", "careers", "copyright", "all rights reserved",
    "follow us", "share this", "comments", "reply", "next page",
    "previous", "load more", "show more", "expand", "menu",
    "search", "back to", "skip to", "jump to",
    "top stories", "trending", "popular", "most read", "editor's picks",
    "sponsored", "advertisement", "promoted", "partner content",
];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());
static TITLE_CLASS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[class*="title"], [class*="headline"]"#).unwrap());

/// Collapse whitespace runs to one space and trim.
///
/// Input is parser output, so entities are already decoded exactly once;
/// decoding again would turn escaped markup on the page into real tags.
pub fn clean_text(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Concatenated, cleaned text content of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Pick the most headline-like text inside a link.
///
/// Prefers a nested `h1`–`h6`, then a descendant whose class mentions
/// "title" or "headline", and finally the link's own text. Returns `None`
/// when nothing but whitespace is found.
pub fn extract_headline(link: ElementRef<'_>) -> Option<String> {
    for selector in [&*HEADING, &*TITLE_CLASS] {
        let preferred = link
            .select(selector)
            .find(|el| el.id() != link.id())
            .map(element_text)
            .filter(|text| text.chars().count() >= PREFERRED_MIN_CHARS);
        if preferred.is_some() {
            return preferred;
        }
    }

    Some(element_text(link)).filter(|text| !text.is_empty())
}

/// Whether `text` reads like an article headline rather than UI chrome.
pub fn is_valid_headline(text: &str) -> bool {
    let len = text.chars().count();
    if !(MIN_HEADLINE_CHARS..=MAX_HEADLINE_CHARS).contains(&len) {
        return false;
    }

    let lower = text.to_lowercase();
    if SKIP_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
        return false;
    }

    let letters = text.chars().filter(|c| c.is_alphabetic()).count();
    if (letters as f64) < len as f64 * 0.5 {
        return false;
    }

    text.split(' ').filter(|w| !w.is_empty()).count() >= MIN_HEADLINE_WORDS
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first_link(html: &str) -> String {
        let doc = Html::parse_fragment(html);
        let a = Selector::parse("a").unwrap();
        let link = doc.select(&a).next().unwrap();
        extract_headline(link).unwrap_or_default()
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  Fed\n\t raises   rates & more  "), "Fed raises rates & more");
        assert_eq!(clean_text("\u{a0}Café owners rally "), "Café owners rally");
    }

    #[test]
    fn test_entities_decoded_once() {
        let html = r#"<a href="/x">Why &amp;lt;div&amp;gt; soup still rules the web</a>"#;
        assert_eq!(first_link(html), "Why &lt;div&gt; soup still rules the web");

        let html = r#"<a href="/x">Caf&eacute; owners rally &amp; march downtown</a>"#;
        assert_eq!(first_link(html), "Café owners rally & march downtown");
    }

    #[test]
    fn test_prefers_nested_heading() {
        let html = r#"<a href="/x"><span>Opinion</span><h3>Storm batters the northern coast overnight</h3><p>Teaser</p></a>"#;
        assert_eq!(first_link(html), "Storm batters the northern coast overnight");
    }

    #[test]
    fn test_short_heading_falls_through_to_title_class() {
        let html = r#"<a href="/x"><h2>Live</h2><div class="card__title">Markets slide as bond yields climb</div></a>"#;
        assert_eq!(first_link(html), "Markets slide as bond yields climb");
    }

    #[test]
    fn test_falls_back_to_link_text() {
        let html = r#"<a href="/x">  Council approves   new <b>budget</b> plan </a>"#;
        assert_eq!(first_link(html), "Council approves new budget plan");
    }

    #[test]
    fn test_empty_link_has_no_headline() {
        let doc = Html::parse_fragment(r#"<a href="/x"> <img src="a.png"> </a>"#);
        let a = Selector::parse("a").unwrap();
        assert_eq!(extract_headline(doc.select(&a).next().unwrap()), None);
    }

    #[test]
    fn test_valid_headlines() {
        assert!(is_valid_headline("Foo Bar Baz Breaks New Ground"));
        assert!(is_valid_headline("Scientists map 3,000 new deep-sea species"));
    }

    #[test]
    fn test_rejects_length_bounds() {
        assert!(!is_valid_headline("Too short one"));
        assert!(!is_valid_headline(&"word ".repeat(70)));
    }

    /// Three-word headline padded to exactly `len` chars.
    fn headline_of_len(len: usize) -> String {
        let head = "Council approves ";
        format!("{head}{}", "b".repeat(len - head.len()))
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        assert!(!is_valid_headline("Rain hits farm"));
        assert!(is_valid_headline("Rain hits farms"));

        assert!(is_valid_headline(&headline_of_len(300)));
        assert!(!is_valid_headline(&headline_of_len(301)));
    }

    #[test]
    fn test_letter_ratio_boundary() {
        // 10 letters out of 20 chars passes, 9 out of 20 does not
        assert!(is_valid_headline("Abc de fghij 1234567"));
        assert!(!is_valid_headline("Abc de fghi 12345678"));
    }

    #[test]
    fn test_rejects_navigation_phrases() {
        assert!(!is_valid_headline("Read more about the election results"));
        assert!(!is_valid_headline("Sign up for our daily briefing today"));
        assert!(!is_valid_headline("Top Stories from around the world"));
        assert!(!is_valid_headline("Sponsored: the best laptops this year"));
    }

    #[test]
    fn test_rejects_symbol_heavy_text() {
        assert!(!is_valid_headline("12/05/2024 - 14:30 - 99%"));
    }

    #[test]
    fn test_rejects_too_few_words() {
        assert!(!is_valid_headline("Extraordinarily-long-hyphenated"));
        assert!(!is_valid_headline("Unbelievable announcements"));
    }
}
