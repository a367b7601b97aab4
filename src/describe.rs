use std::sync::LazyLock;

use regex::Regex;

static NOISE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(home|about|contact|privacy|terms|cookies?|login|sign up|subscribe)\s*\|",
        r"(?i)copyright\s+©?\s*\d{4}",
        r"(?i)all rights reserved",
        r"(?i)follow us on",
        r"(?i)(facebook|twitter|linkedin|instagram|youtube)\s*:?",
        r"(?i)menu\s*\n",
        r"(?i)skip to (main )?content",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static SENTENCE_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SPECIAL_CHAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s]").unwrap());

/// Sentences containing these never describe the business.
const BOILERPLATE_KEYWORDS: &[&str] = &[
    "cookie", "privacy policy", "terms of service", "login", "sign up", "subscribe",
    "newsletter", "click here", "read more",
];

const BUSINESS_PHRASES: &[&str] = &[
    "we provide", "we offer", "we help", "we are", "we specialize",
    "our company", "our mission", "our service", "our product",
    "leading provider", "established", "founded", "specializes in",
    "delivers", "creates", "develops", "builds", "designs",
    "trusted by", "serving", "dedicated to",
];

const INDUSTRY_TERMS: &[&str] = &[
    "software", "technology", "services", "solutions", "platform",
    "healthcare", "financial", "consulting", "manufacturing", "retail",
    "education", "enterprise", "business", "professional", "digital",
    "innovative", "comprehensive", "quality", "expert",
];

const CTA_WORDS: &[&str] = &["click", "here", "more info", "learn more", "contact us"];

const SHORT_FALLBACK: &str = "Company providing business services and solutions.";
const LONG_FALLBACK: &str = "Company providing business services and solutions. \
    Committed to delivering quality products and professional support to customers.";

const MIN_SHORT_LEN: usize = 20;
const MIN_LONG_LEN: usize = 40;

/// Build (short, long) descriptions from page text by ranking candidate
/// sentences. Neither string is ever empty: weak or missing candidates are
/// replaced with fixed generic text.
pub fn generate(text: &str) -> (String, String) {
    let cleaned = clean_text(text);
    let sentences = extract_sentences(&cleaned);

    if sentences.is_empty() {
        return (SHORT_FALLBACK.to_string(), LONG_FALLBACK.to_string());
    }

    let mut scored: Vec<(&String, i32)> =
        sentences.iter().map(|s| (s, score_sentence(s))).collect();
    // Stable sort: equally-scored sentences keep document order.
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let best: Vec<&String> = scored
        .iter()
        .filter(|(_, score)| *score > 0)
        .map(|(s, _)| *s)
        .collect();
    let chosen: Vec<&String> = if best.is_empty() {
        sentences.iter().take(3).collect()
    } else {
        best
    };

    let mut short = chosen[0].clone();
    if !short.ends_with('.') {
        short.push('.');
    }

    let mut long = chosen
        .iter()
        .take(3)
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(". ");
    if !long.ends_with('.') {
        long.push('.');
    }

    short = WHITESPACE_RE.replace_all(&short, " ").trim().to_string();
    long = WHITESPACE_RE.replace_all(&long, " ").trim().to_string();

    if short.chars().count() < MIN_SHORT_LEN {
        short = SHORT_FALLBACK.to_string();
    }
    if long.chars().count() < MIN_LONG_LEN {
        long = format!(
            "{} Committed to delivering quality products and professional support.",
            short
        );
    }

    (short, long)
}

/// Strip cookie/social/footer boilerplate before sentence splitting.
fn clean_text(text: &str) -> String {
    let mut cleaned = text.to_string();
    for pattern in NOISE_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, "").to_string();
    }
    WHITESPACE_RE.replace_all(&cleaned, " ").trim().to_string()
}

/// Split into sentences and keep only plausible description candidates.
fn extract_sentences(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    SENTENCE_SPLIT_RE
        .split(text)
        .filter_map(|raw| {
            let sent = raw.trim();
            let len = sent.chars().count();
            if len < 20 || len > 200 {
                return None;
            }

            let lower = sent.to_lowercase();
            if BOILERPLATE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
                return None;
            }

            let special = SPECIAL_CHAR_RE.find_iter(sent).count();
            if special as f64 > len as f64 * 0.3 {
                return None;
            }

            Some(sent.to_string())
        })
        .collect()
}

/// Business-voice phrases score up, calls to action score down. The score
/// can go negative; only positive sentences make the cut.
fn score_sentence(sentence: &str) -> i32 {
    let lower = sentence.to_lowercase();
    let mut score = 0;

    for phrase in BUSINESS_PHRASES {
        if lower.contains(phrase) {
            score += 15;
        }
    }
    for term in INDUSTRY_TERMS {
        if lower.contains(term) {
            score += 5;
        }
    }
    for word in CTA_WORDS {
        if lower.contains(word) {
            score -= 20;
        }
    }

    score
}

// ── Tests ──
