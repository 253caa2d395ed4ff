//! Heuristic "is this a real article page" scoring for candidate URLs.
//!
//! The scorer is an ordered list of named [`ScoringRule`]s. Each rule is a pure
//! function of a pre-computed [`UrlShape`] and either adjusts the score or
//! rejects the URL outright. Rejection short-circuits to a score of 0.
//!
//! Typical scores:
//!
//! | URL path | Score |
//! |----------|-------|
//! | `/` | 0 (rejected) |
//! | `/category/sports` | -1 |
//! | `/politics` | 0 |
//! | `/tech/2024/05/01/foo-bar-baz` | 12 |
//! | `/science/new-telescope-spots-distant-galaxy` | 5 |

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// Default minimum score for a URL to count as an article.
pub const DEFAULT_MIN_SCORE: i32 = 1;

/// Path tokens that mark listing/navigation pages rather than articles.
const CATEGORY_WORDS: &[&str] = &[
    // generic
    "news", "article", "articles", "story", "stories", "post", "posts",
    "category", "categories", "tag", "tags", "topic", "topics",
    "section", "sections", "archive", "archives", "feed", "rss",
    // site sections
    "home", "about", "contact", "privacy", "terms", "login", "register",
    "subscribe", "newsletter", "search", "author", "authors", "profile",
    // media
    "video", "videos", "gallery", "galleries", "photos", "images", "media",
    // health
    "condition", "conditions", "diseases", "symptoms", "treatments",
    "health", "wellness", "fitness", "nutrition", "diet", "diets",
    "mind", "body", "beauty", "weight", "pregnancy", "parenting",
    // tech
    "tech", "technology", "gadgets", "apps", "software", "hardware",
    "gaming", "games", "reviews", "guides", "tutorials", "how-to",
    // news desks
    "politics", "business", "sports", "entertainment", "lifestyle",
    "science", "world", "local", "national", "opinion", "editorial",
    // time based
    "latest", "trending", "popular", "featured", "top", "best",
    "today", "week", "month", "year",
];

static CATEGORY_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| CATEGORY_WORDS.iter().copied().collect());

static HOMEPAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/?$").unwrap());
static SOCIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(linkedin|twitter|facebook|instagram)\.com").unwrap());
static QUERY_OR_FRAGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#?]").unwrap());
static BINARY_ASSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|gif|pdf|mp4|mp3)($|\?)").unwrap());
static SCRIPT_SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(javascript|mailto):").unwrap());

static ARTICLE_SHAPES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"/\d{4}/\d{2}/\d{2}/",     // /2024/12/29/
        r"/\d{4}/\d{2}/",           // /2024/12/
        r"[/-]\d{4}-\d{2}-\d{2}",   // /2024-12-29 or -2024-12-29
        r"-\d{6,}($|/|\?)",         // slug-123456
        r"/\d{6,}($|/|\?)",         // /123456
        r"\.html?($|\?)",           // .html / .htm
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static TRAILING_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[-_]?[0-9a-z]{5,}$").unwrap());
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"20\d{2}").unwrap());
static LONG_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{5,}").unwrap());

/// What a rule decided about a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Delta(i32),
    Reject,
}

/// A named scoring step.
#[derive(Clone, Copy)]
pub struct ScoringRule {
    pub name: &'static str,
    pub apply: fn(&UrlShape<'_>) -> RuleOutcome,
}

impl std::fmt::Debug for ScoringRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringRule").field("name", &self.name).finish()
    }
}

/// The pieces of a URL every rule looks at.
#[derive(Debug)]
pub struct UrlShape<'a> {
    pub raw: &'a str,
    pub path: &'a str,
    pub segments: Vec<&'a str>,
    pub last_segment: &'a str,
    pub last_words: Vec<&'a str>,
}

impl<'a> UrlShape<'a> {
    pub fn new(raw: &'a str, path: &'a str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let last_segment = segments.last().copied().unwrap_or("");
        let last_words = last_segment
            .split(['-', '_'])
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            raw,
            path,
            segments,
            last_segment,
            last_words,
        }
    }

    fn matches(&self, re: &Regex) -> bool {
        re.is_match(self.path) || re.is_match(self.raw)
    }
}

fn is_category_word(word: &str) -> bool {
    CATEGORY_SET.contains(word.to_ascii_lowercase().as_str())
}

fn reject_if(cond: bool) -> RuleOutcome {
    if cond { RuleOutcome::Reject } else { RuleOutcome::Delta(0) }
}

fn bonus_if(cond: bool, delta: i32) -> RuleOutcome {
    RuleOutcome::Delta(if cond { delta } else { 0 })
}

/// The rules, in evaluation order.
pub static RULES: &[ScoringRule] = &[
    ScoringRule { name: "homepage", apply: homepage },
    ScoringRule { name: "social_profile", apply: social_profile },
    ScoringRule { name: "query_or_fragment", apply: query_or_fragment },
    ScoringRule { name: "binary_asset", apply: binary_asset },
    ScoringRule { name: "script_scheme", apply: script_scheme },
    ScoringRule { name: "article_shape", apply: article_shape },
    ScoringRule { name: "segment_depth", apply: segment_depth },
    ScoringRule { name: "last_segment_lexical", apply: last_segment_lexical },
    ScoringRule { name: "year_token", apply: year_token },
    ScoringRule { name: "numeric_id", apply: numeric_id },
    ScoringRule { name: "bare_category_slug", apply: bare_category_slug },
    ScoringRule { name: "article_path_marker", apply: article_path_marker },
    ScoringRule { name: "long_slug", apply: long_slug },
];

fn homepage(s: &UrlShape<'_>) -> RuleOutcome {
    reject_if(HOMEPAGE.is_match(s.path) || s.segments.is_empty())
}

fn social_profile(s: &UrlShape<'_>) -> RuleOutcome {
    reject_if(s.matches(&SOCIAL))
}

fn query_or_fragment(s: &UrlShape<'_>) -> RuleOutcome {
    reject_if(s.matches(&QUERY_OR_FRAGMENT))
}

fn binary_asset(s: &UrlShape<'_>) -> RuleOutcome {
    reject_if(s.matches(&BINARY_ASSET))
}

fn script_scheme(s: &UrlShape<'_>) -> RuleOutcome {
    reject_if(SCRIPT_SCHEME.is_match(s.raw))
}

fn article_shape(s: &UrlShape<'_>) -> RuleOutcome {
    bonus_if(ARTICLE_SHAPES.iter().any(|re| re.is_match(s.path)), 5)
}

fn segment_depth(s: &UrlShape<'_>) -> RuleOutcome {
    let delta = match s.segments.len() {
        0 => 0,
        1 => {
            let lower = s.last_segment.to_ascii_lowercase();
            if [".php", ".html", ".htm"].iter().any(|ext| lower.ends_with(ext)) {
                2
            } else if TRAILING_ID.is_match(s.last_segment) {
                3
            } else if s.last_words.len() >= 4 {
                2
            } else {
                0
            }
        }
        2 => 1,
        _ => 2,
    };
    RuleOutcome::Delta(delta)
}

fn last_segment_lexical(s: &UrlShape<'_>) -> RuleOutcome {
    let delta = if is_category_word(s.last_segment) {
        -2
    } else {
        match s.last_words.as_slice() {
            words if words.len() >= 3 => 3,
            [_, _] => 1,
            [word] if !is_category_word(word) && s.last_segment.chars().any(|c| c.is_ascii_digit()) => 2,
            _ => 0,
        }
    };
    RuleOutcome::Delta(delta)
}

fn year_token(s: &UrlShape<'_>) -> RuleOutcome {
    bonus_if(YEAR.is_match(s.path), 2)
}

fn numeric_id(s: &UrlShape<'_>) -> RuleOutcome {
    bonus_if(LONG_NUMBER.is_match(s.last_segment), 3)
}

// one-segment paths without an id are usually section slugs
fn bare_category_slug(s: &UrlShape<'_>) -> RuleOutcome {
    bonus_if(s.segments.len() == 1 && !LONG_NUMBER.is_match(s.last_segment), -1)
}

fn article_path_marker(s: &UrlShape<'_>) -> RuleOutcome {
    let marked = ["/article/", "/story/", "/news/", "/post/"]
        .iter()
        .any(|m| s.path.contains(m));
    bonus_if(marked, 2)
}

fn long_slug(s: &UrlShape<'_>) -> RuleOutcome {
    bonus_if(s.last_segment.chars().count() > 30, 1)
}

/// Score a URL string; anything that does not parse scores 0.
pub fn score(url: &str) -> i32 {
    match Url::parse(url) {
        Ok(parsed) => score_url(&parsed),
        Err(_) => 0,
    }
}

/// Score a parsed URL by running every rule in order.
pub fn score_url(url: &Url) -> i32 {
    let shape = UrlShape::new(url.as_str(), url.path());
    let mut total = 0;
    for rule in RULES {
        match (rule.apply)(&shape) {
            RuleOutcome::Reject => return 0,
            RuleOutcome::Delta(delta) => total += delta,
        }
    }
    total
}
