//! Article discovery: from a homepage's HTML to a ranked set of headlines.
//!
//! The engine composes the pieces in this module:
//!
//! | Step | Module |
//! |------|--------|
//! | href → absolute, allow-listed URL | [`resolver`] + [`allowlist`] |
//! | URL → article likelihood | [`scorer`] |
//! | anchor → headline text | [`headline`] |
//! | document → plaintext digest | [`content`] |
//!
//! # Passes
//!
//! 1. **Selector pass**: structural selectors from most to least specific.
//! 2. **Broadening pass**: when the first pass found fewer than
//!    [`DiscoveryOptions::broaden_below`] headlines, every anchor on the page
//!    is considered with the same gates.
//! 3. **Homepage fallback**: a page that yields nothing still produces one
//!    `"Latest news from {host}"` entry pointing at the site root.

pub mod allowlist;
pub mod content;
pub mod headline;
pub mod resolver;
pub mod scorer;

use crate::models::HeadlineCandidate;
use allowlist::DomainAllowList;
use headline::{element_text, extract_headline, is_valid_headline};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, trace};
use url::Url;

/// Tunables for one discovery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Hard cap on headlines returned for a page.
    pub max_headlines: usize,
    /// Run the broadening pass when the selector pass found fewer than this.
    pub broaden_below: usize,
    /// Minimum [`scorer::score_url`] value for a link to be kept.
    pub min_score: i32,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_headlines: 15,
            broaden_below: 3,
            min_score: scorer::DEFAULT_MIN_SCORE,
        }
    }
}

/// Everything discovery extracts from a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub title: String,
    pub headlines: Vec<HeadlineCandidate>,
    pub content: String,
}

/// How a selector pass picks candidate anchors.
enum CandidateQuery {
    Css(Selector),
    /// `a` elements with an `h1`–`h4` somewhere inside them.
    AnchorWrappingHeading,
}

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static WRAPPED_HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3, h4").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());

/// Selector-pass queries, most specific first.
static CANDIDATE_QUERIES: Lazy<Vec<CandidateQuery>> = Lazy::new(|| {
    let css = |s: &str| CandidateQuery::Css(Selector::parse(s).unwrap());
    vec![
        css("article a[href]"),
        CandidateQuery::AnchorWrappingHeading,
        css("h1 > a[href]"),
        css("h2 > a[href]"),
        css("h3 > a[href]"),
        css("h4 > a[href]"),
        css(r#"a[href][class*="article"]"#),
        css(r#"a[href][class*="headline"]"#),
        css(r#"a[href][class*="story"]"#),
        css(r#"a[href][class*="title"]"#),
        css(r#"a[href][class*="post"]"#),
        css(r#"[class*="article"] a[href]"#),
        css(r#"[class*="story"] a[href]"#),
        css(r#"[class*="headline"] a[href]"#),
        css(r#"[class*="card"] a[href]"#),
        css("main a[href]"),
    ]
});

impl CandidateQuery {
    fn select<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        match self {
            CandidateQuery::Css(selector) => document.select(selector).collect(),
            CandidateQuery::AnchorWrappingHeading => document
                .select(&ANCHOR)
                .filter(|a| a.select(&WRAPPED_HEADING).next().is_some())
                .collect(),
        }
    }
}

/// Running state for one `discover` call: what has been seen and kept so far.
#[derive(Debug, Default)]
struct Accumulator {
    seen_urls: HashSet<String>,
    seen_titles: HashSet<String>,
    headlines: Vec<HeadlineCandidate>,
}

impl Accumulator {
    fn len(&self) -> usize {
        self.headlines.len()
    }

    /// Record a URL; false if it was already seen (case-insensitively).
    fn first_sighting(&mut self, url: &Url) -> bool {
        self.seen_urls.insert(url.as_str().to_lowercase())
    }

    /// Keep a headline unless its title was already used (case-insensitively).
    fn push(&mut self, title: String, url: Url) -> bool {
        if !self.seen_titles.insert(title.to_lowercase()) {
            return false;
        }
        self.headlines.push(HeadlineCandidate::new(title, url.as_str()));
        true
    }
}

/// Discovers article headlines on news homepages.
///
/// Holds only read-only configuration, so one engine can serve many
/// concurrent sources.
#[derive(Debug, Clone)]
pub struct DiscoveryEngine {
    allow_list: DomainAllowList,
    options: DiscoveryOptions,
}

impl DiscoveryEngine {
    pub fn new(allow_list: DomainAllowList, options: DiscoveryOptions) -> Self {
        Self {
            allow_list,
            options,
        }
    }

    /// Parse `html` and run the full discovery against `base`.
    pub fn discover_html(&self, html: &str, base: &Url) -> Discovery {
        let document = Html::parse_document(html);
        Discovery {
            title: page_title(&document),
            headlines: self.discover(&document, base),
            content: content::extract_content(&document),
        }
    }

    /// Headlines for `document`, never more than `max_headlines` and never empty.
    pub fn discover(&self, document: &Html, base: &Url) -> Vec<HeadlineCandidate> {
        let mut acc = Accumulator::default();

        for query in CANDIDATE_QUERIES.iter() {
            self.consider_all(query.select(document), base, &mut acc);
            if acc.len() >= self.options.max_headlines {
                break;
            }
        }
        debug!(found = acc.len(), "selector pass complete");

        if acc.len() < self.options.broaden_below {
            let before = acc.len();
            self.consider_all(document.select(&ANCHOR).collect(), base, &mut acc);
            debug!(added = acc.len() - before, "broadening pass complete");
        }

        if acc.headlines.is_empty() {
            if let Some(fallback) = homepage_fallback(base) {
                debug!(url = %fallback.url, "no headlines survived; using homepage fallback");
                acc.headlines.push(fallback);
            }
        }
        acc.headlines
    }

    fn consider_all(&self, nodes: Vec<ElementRef<'_>>, base: &Url, acc: &mut Accumulator) {
        for node in nodes {
            if acc.len() >= self.options.max_headlines {
                return;
            }
            self.consider(node, base, acc);
        }
    }

    /// Run one anchor through resolve → de-dup → score → headline gates.
    fn consider(&self, node: ElementRef<'_>, base: &Url, acc: &mut Accumulator) {
        let Some(href) = node.value().attr("href") else {
            return;
        };
        let url = match resolver::resolve(href, base, &self.allow_list) {
            Ok(url) => url,
            Err(rejection) => {
                trace!(%href, ?rejection, "href rejected");
                return;
            }
        };
        if !acc.first_sighting(&url) {
            return;
        }

        let score = scorer::score_url(&url);
        if score < self.options.min_score {
            trace!(%url, score, "below article threshold");
            return;
        }

        let Some(title) = extract_headline(node) else {
            return;
        };
        if !is_valid_headline(&title) {
            trace!(%url, %title, "headline rejected");
            return;
        }
        if acc.push(title, url) {
            trace!(score, "headline accepted");
        }
    }
}

impl Default for DiscoveryEngine {
    fn default() -> Self {
        Self::new(DomainAllowList::builtin().clone(), DiscoveryOptions::default())
    }
}

/// First non-empty `<title>`, then `<h1>`, else `"Untitled"`.
pub fn page_title(document: &Html) -> String {
    [&*TITLE, &*H1]
        .into_iter()
        .find_map(|selector| {
            document
                .select(selector)
                .next()
                .map(element_text)
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_else(|| "Untitled".to_string())
}

/// The synthetic entry used when a page yields no headlines at all.
pub fn homepage_fallback(base: &Url) -> Option<HeadlineCandidate> {
    let host = base.host_str()?;
    Some(HeadlineCandidate::new(
        format!("Latest news from {host}"),
        format!("{}://{}", base.scheme(), host),
    ))
}
