use crate::keywords::{Feature, Intent, KEYWORD_PATTERNS, KNOWN_BRANDS};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use unicode_normalization::UnicodeNormalization;

/// Budget ceiling assumed when the query only says "affordable"/"cheap"
/// and carries no literal number.
pub const DEFAULT_AFFORDABLE_BUDGET: u32 = 20_000;

/// Numbers below this found by the auxiliary first-number scan are treated
/// as false positives (RAM sizes, camera megapixels), never as prices.
const MIN_PLAUSIBLE_PRICE: u32 = 1_000;

const AFFORDABLE_WORDS: [&str; 4] = ["affordable", "budget", "cheap", "low-end"];

lazy_static! {
    // "under 25k", "within 30 k", bare "25k"; qualifier optional.
    static ref K_BUDGET_RE: Regex =
        Regex::new(r"(?:under|below|less than|upto|within)?\s*(\d{1,2})\s*k\b")
            .expect("valid regex");
    // "30,000", "₹30000", "rs. 45000". The not-followed-by-g guard is
    // applied by hand after matching since the regex crate has no lookahead.
    static ref AMOUNT_RE: Regex =
        Regex::new(r"(?:₹|rs\.?|inr)?\s*([0-9]{1,3}(?:,?[0-9]{2,3})+|[0-9]{4,6})")
            .expect("valid regex");
    static ref NUMBER_RE: Regex = Regex::new(r"\d+").expect("valid regex");
    static ref WORD_RE: Regex = Regex::new(r"\w+").expect("valid regex");
}

/// Structured form of one free-text query. Built fresh per query, never
/// mutated afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedQuery {
    pub intent: Option<Intent>,
    pub budget: Option<u32>,
    pub brand: Option<String>,
    pub matched_keywords: BTreeSet<String>,
    pub supporting_features: BTreeSet<Feature>,
}

/// NFKC-fold and lowercase, so all downstream matching is case-insensitive.
fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Classify a query against the intent and supporting-feature dictionaries.
///
/// Two passes accumulate into the same state: a phrase-aware pass that
/// searches every dictionary keyword (single or multi-word) as a whole-word
/// match, and a fallback per-word pass that catches keywords the phrase
/// pass can miss after punctuation normalization. An intent's score is the
/// number of distinct dictionary keywords of its list that matched; ties
/// are broken by `Intent::PRIORITY` order.
pub fn classify(text: &str) -> ParsedQuery {
    let prompt = normalize(text);
    let mut matched_keywords: BTreeSet<String> = BTreeSet::new();
    let mut supporting_features: BTreeSet<Feature> = BTreeSet::new();
    let mut intent_hits: HashMap<Intent, BTreeSet<&'static str>> = HashMap::new();

    // Phrase-aware pass over both dictionaries.
    for feature in Feature::ALL {
        for kw in feature.keywords() {
            if KEYWORD_PATTERNS[kw].is_match(&prompt) {
                matched_keywords.insert((*kw).to_string());
                supporting_features.insert(feature);
            }
        }
    }
    for intent in Intent::PRIORITY {
        for kw in intent.keywords() {
            if KEYWORD_PATTERNS[kw].is_match(&prompt) {
                matched_keywords.insert((*kw).to_string());
                intent_hits.entry(intent).or_default().insert(*kw);
            }
        }
    }

    // Fallback single-word pass.
    for word in WORD_RE.find_iter(&prompt) {
        let w = word.as_str();
        for feature in Feature::ALL {
            if let Some(kw) = feature.keywords().iter().find(|k| **k == w) {
                matched_keywords.insert((*kw).to_string());
                supporting_features.insert(feature);
            }
        }
        for intent in Intent::PRIORITY {
            if let Some(kw) = intent.keywords().iter().find(|k| **k == w) {
                matched_keywords.insert((*kw).to_string());
                intent_hits.entry(intent).or_default().insert(*kw);
            }
        }
    }

    // Highest distinct-keyword count wins; first in priority order on ties.
    let mut top_intent = None;
    let mut top_score = 0usize;
    for intent in Intent::PRIORITY {
        let score = intent_hits.get(&intent).map_or(0, BTreeSet::len);
        if score > top_score {
            top_score = score;
            top_intent = Some(intent);
        }
    }

    ParsedQuery {
        intent: top_intent,
        budget: extract_budget(&prompt),
        brand: None,
        matched_keywords,
        supporting_features,
    }
}

/// Pull a numeric INR budget out of free text.
///
/// Rule 1 (shorthand) takes priority: a 1-2 digit number directly followed
/// by "k" means thousands ("25k" -> 25000). Rule 2 accepts an explicit
/// amount with optional thousands separators or currency prefix, rejecting
/// numbers glued to a following "g" so "5g"/"4g" network mentions never
/// read as prices. Returns `None` when neither rule matches.
pub fn extract_budget(text: &str) -> Option<u32> {
    let prompt = normalize(text);

    if let Some(caps) = K_BUDGET_RE.captures(&prompt) {
        if let Some(n) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
            return Some(n * 1000);
        }
    }

    for caps in AMOUNT_RE.captures_iter(&prompt) {
        let Some(m) = caps.get(1) else { continue };
        // Whole-word boundary: drop candidates running into a word character
        // ("128gb", "30000g").
        if prompt[m.end()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            continue;
        }
        if let Ok(v) = m.as_str().replace(',', "").parse::<u32>() {
            return Some(v);
        }
    }

    None
}

/// Top-level budget extraction: Rules 1-2, then a first-number scan that
/// ignores implausibly small values, then the affordability default when
/// the query only signals cheapness without a literal number.
pub fn extract_budget_or_default(text: &str) -> Option<u32> {
    let prompt = normalize(text);

    if let Some(budget) = extract_budget(&prompt) {
        return Some(budget);
    }

    let stripped = prompt.replace(',', "");
    for m in NUMBER_RE.find_iter(&stripped) {
        if let Ok(v) = m.as_str().parse::<u32>() {
            if v >= MIN_PLAUSIBLE_PRICE {
                return Some(v);
            }
        }
    }

    if AFFORDABLE_WORDS.iter().any(|w| prompt.contains(w)) {
        return Some(DEFAULT_AFFORDABLE_BUDGET);
    }

    None
}

/// First brand of the vocabulary appearing as a case-insensitive substring.
pub fn extract_brand(text: &str) -> Option<&'static str> {
    let prompt = normalize(text);
    KNOWN_BRANDS
        .iter()
        .find(|brand| prompt.contains(&brand.to_lowercase()))
        .copied()
}

/// Run all extractors over one query text and merge into a `ParsedQuery`.
/// The top-level budget variant (with the affordability default) overrides
/// the classifier's literal-number-only extraction.
pub fn parse_query(text: &str) -> ParsedQuery {
    let mut parsed = classify(text);
    if let Some(budget) = extract_budget_or_default(text) {
        parsed.budget = Some(budget);
    }
    parsed.brand = extract_brand(text).map(str::to_string);
    parsed
}
