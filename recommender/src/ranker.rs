use crate::catalog::{Catalog, CatalogEntry};
use crate::keywords::weight;
use crate::parser::ParsedQuery;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Entries above this price take the affordability penalty when the query
/// asked for "affordable".
pub const AFFORDABLE_PENALTY_PRICE: u32 = 25_000;
const AFFORDABLE_PENALTY: f64 = 0.6;

/// Score scale: `match_score` is an integer in [0, 500].
const SCORE_SCALE: f64 = 500.0;

/// A catalog entry with its weighted-match explanation.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredEntry {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub matched_features: Vec<String>,
    pub match_score: u32,
}

/// A catalog entry ranked by tag richness alone. Used only when the query
/// carried no discriminative signal, so there is no matched set to report.
#[derive(Debug, Clone, Serialize)]
pub struct FallbackEntry {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub fallback_score: f64,
}

/// Result of one recommendation pass.
#[derive(Debug)]
pub enum Outcome {
    /// Weighted-match ranking, best first.
    Ranked(Vec<ScoredEntry>),
    /// Tag-richness ranking, best first (no query signal to match against).
    Fallback(Vec<FallbackEntry>),
    /// Filters excluded every catalog entry; caller should suggest
    /// loosening brand/budget.
    NoMatch,
    /// No intent, feature, keyword, or brand+budget pair could be parsed;
    /// caller should re-prompt rather than guess.
    Ambiguous,
}

/// Rank the catalog against a parsed query.
///
/// Pipeline: brand filter, budget filter, then an intent-tag filter that is
/// deliberately skipped whenever the query produced any feature/keyword
/// signal (weighted scoring discriminates better there, and a tag-only
/// filter would over-exclude entries that satisfy the request through
/// other tags). Survivors are scored and the top `top_n` returned.
pub fn recommend(
    parsed: &ParsedQuery,
    catalog: &Catalog,
    top_n: usize,
    brand_override: Option<&str>,
) -> Outcome {
    // Scored feature set: supporting features when any were detected,
    // otherwise the raw matched keywords stand in.
    let features: BTreeSet<String> = if parsed.supporting_features.is_empty() {
        parsed.matched_keywords.clone()
    } else {
        parsed
            .supporting_features
            .iter()
            .map(|f| f.as_str().to_string())
            .collect()
    };

    let brand = brand_override.or(parsed.brand.as_deref());

    if parsed.intent.is_none()
        && features.is_empty()
        && !(brand.is_some() && parsed.budget.is_some())
    {
        return Outcome::Ambiguous;
    }

    tracing::debug!(
        intent = ?parsed.intent,
        budget = ?parsed.budget,
        brand = ?brand,
        num_features = features.len(),
        "ranking query"
    );

    let mut survivors: Vec<&CatalogEntry> = catalog.entries.iter().collect();

    if let Some(brand) = brand {
        let wanted = brand.to_lowercase();
        survivors.retain(|e| e.brand.to_lowercase() == wanted);
    }

    if let Some(budget) = parsed.budget {
        survivors.retain(|e| e.price <= budget);
    }

    // Intent-tag filter applies only when no feature/keyword signal exists.
    if let Some(intent) = parsed.intent {
        if features.is_empty() {
            survivors.retain(|e| e.tags.contains(intent.as_str()));
        }
    }

    if survivors.is_empty() {
        return Outcome::NoMatch;
    }

    if features.is_empty() && parsed.intent.is_none() {
        return Outcome::Fallback(rank_by_tag_richness(&survivors, top_n));
    }

    let total_possible: f64 = features.iter().map(|f| weight(f)).sum::<f64>()
        + parsed.intent.map_or(0.0, |i| weight(i.as_str()));
    let wants_affordable = features.contains("affordable");

    let mut scored: Vec<ScoredEntry> = survivors
        .into_iter()
        .map(|entry| {
            let matched: Vec<String> = features
                .iter()
                .filter(|f| entry.tags.contains(*f))
                .cloned()
                .collect();
            let matched_weight: f64 = matched.iter().map(|f| weight(f)).sum();
            let intent_bonus = match parsed.intent {
                Some(intent) if entry.tags.contains(intent.as_str()) => weight(intent.as_str()),
                _ => 0.0,
            };
            let mut raw = if total_possible > 0.0 {
                (matched_weight + intent_bonus) / total_possible
            } else {
                0.0
            };
            if wants_affordable && entry.price > AFFORDABLE_PENALTY_PRICE {
                raw *= AFFORDABLE_PENALTY;
            }
            ScoredEntry {
                entry: entry.clone(),
                matched_features: matched,
                match_score: (raw * SCORE_SCALE) as u32,
            }
        })
        .collect();

    // Stable sort: catalog order breaks score ties deterministically.
    scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    scored.truncate(top_n);
    Outcome::Ranked(scored)
}

fn rank_by_tag_richness(survivors: &[&CatalogEntry], top_n: usize) -> Vec<FallbackEntry> {
    let mut ranked: Vec<FallbackEntry> = survivors
        .iter()
        .map(|entry| FallbackEntry {
            entry: (*entry).clone(),
            fallback_score: entry.tags.iter().map(|t| weight(t)).sum(),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.fallback_score
            .partial_cmp(&a.fallback_score)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(top_n);
    ranked
}
