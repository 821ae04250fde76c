use recommender::ranker::recommend;
use recommender::{parse_query, Catalog, CatalogEntry, Intent, Outcome, ParsedQuery};
use std::collections::BTreeSet;

fn entry(brand: &str, model: &str, price: u32, tags: &[&str]) -> CatalogEntry {
    CatalogEntry {
        brand: brand.into(),
        model: model.into(),
        price,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn keywords(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn catalog() -> Catalog {
    Catalog::from_entries(vec![
        entry("Samsung", "Galaxy M14", 13999, &["battery", "5g", "display"]),
        entry("Xiaomi", "Redmi Note 13", 17999, &["gaming", "performance", "5g"]),
        entry("Apple", "iPhone 13", 52999, &["camera", "performance", "display"]),
        entry("Realme", "Narzo 60", 11999, &["battery", "storage"]),
    ])
}

#[test]
fn intent_filter_applies_when_no_feature_signal() {
    let parsed = ParsedQuery {
        intent: Some(Intent::Gaming),
        ..Default::default()
    };
    match recommend(&parsed, &catalog(), 10, None) {
        Outcome::Ranked(results) => {
            assert_eq!(results.len(), 1);
            assert_eq!(results[0].entry.model, "Redmi Note 13");
        }
        other => panic!("expected ranked outcome, got {other:?}"),
    }
}

#[test]
fn intent_filter_is_skipped_once_feature_signals_exist() {
    // Same intent, but now the query carried a keyword: every entry stays
    // in and scoring discriminates instead. Regression-pins the
    // data-dependent substitution rule.
    let parsed = ParsedQuery {
        intent: Some(Intent::Gaming),
        matched_keywords: keywords(&["gaming"]),
        ..Default::default()
    };
    match recommend(&parsed, &catalog(), 10, None) {
        Outcome::Ranked(results) => {
            assert_eq!(results.len(), 4);
            assert_eq!(results[0].entry.model, "Redmi Note 13");
            assert_eq!(results[0].match_score, 500);
        }
        other => panic!("expected ranked outcome, got {other:?}"),
    }
}

#[test]
fn match_scores_stay_within_bounds() {
    let parsed = ParsedQuery {
        intent: Some(Intent::Camera),
        matched_keywords: keywords(&["camera", "5g", "storage"]),
        ..Default::default()
    };
    match recommend(&parsed, &catalog(), 10, None) {
        Outcome::Ranked(results) => {
            for r in &results {
                assert!(r.match_score <= 500);
            }
        }
        other => panic!("expected ranked outcome, got {other:?}"),
    }
}

#[test]
fn budget_filter_is_monotonic() {
    let survivors = |budget: u32| -> Vec<String> {
        let parsed = ParsedQuery {
            intent: Some(Intent::Gaming),
            matched_keywords: keywords(&["gaming"]),
            budget: Some(budget),
            ..Default::default()
        };
        match recommend(&parsed, &catalog(), 10, None) {
            Outcome::Ranked(results) => results.into_iter().map(|r| r.entry.model).collect(),
            Outcome::NoMatch => vec![],
            other => panic!("unexpected outcome {other:?}"),
        }
    };
    let small = survivors(14000);
    let large = survivors(60000);
    for model in &small {
        assert!(large.contains(model), "{model} missing from larger budget");
    }
    assert!(small.len() <= large.len());
}

#[test]
fn affordability_penalty_demotes_expensive_entries() {
    let parsed = ParsedQuery {
        matched_keywords: keywords(&["affordable"]),
        ..Default::default()
    };
    let catalog = Catalog::from_entries(vec![
        entry("Vivo", "Y200 Pro", 26000, &["affordable"]),
        entry("Vivo", "Y200", 24000, &["affordable"]),
    ]);
    match recommend(&parsed, &catalog, 10, None) {
        Outcome::Ranked(results) => {
            let cheap = results.iter().find(|r| r.entry.price == 24000).unwrap();
            let pricey = results.iter().find(|r| r.entry.price == 26000).unwrap();
            assert!(pricey.match_score < cheap.match_score);
            assert_eq!(cheap.match_score, 500);
            assert_eq!(pricey.match_score, 300);
        }
        other => panic!("expected ranked outcome, got {other:?}"),
    }
}

#[test]
fn exhausted_filters_yield_no_match_not_empty_list() {
    let parsed = ParsedQuery {
        intent: Some(Intent::Gaming),
        budget: Some(100),
        ..Default::default()
    };
    assert!(matches!(
        recommend(&parsed, &catalog(), 10, None),
        Outcome::NoMatch
    ));
}

#[test]
fn empty_catalog_yields_no_match() {
    let parsed = ParsedQuery {
        intent: Some(Intent::Battery),
        ..Default::default()
    };
    assert!(matches!(
        recommend(&parsed, &Catalog::default(), 10, None),
        Outcome::NoMatch
    ));
}

#[test]
fn signal_free_query_is_ambiguous() {
    let parsed = ParsedQuery::default();
    assert!(matches!(
        recommend(&parsed, &catalog(), 10, None),
        Outcome::Ambiguous
    ));
}

#[test]
fn gibberish_prompt_is_ambiguous_end_to_end() {
    let parsed = parse_query("asdf qwerty zxcv");
    assert!(matches!(
        recommend(&parsed, &catalog(), 10, None),
        Outcome::Ambiguous
    ));
}

#[test]
fn brand_plus_budget_alone_ranks_by_tag_richness() {
    let parsed = ParsedQuery {
        budget: Some(60000),
        brand: Some("Apple".into()),
        ..Default::default()
    };
    let catalog = Catalog::from_entries(vec![
        entry("Apple", "iPhone SE", 42999, &["display"]),
        entry("Apple", "iPhone 13", 52999, &["performance", "camera"]),
    ]);
    match recommend(&parsed, &catalog, 10, None) {
        Outcome::Fallback(results) => {
            assert_eq!(results[0].entry.model, "iPhone 13");
            assert!((results[0].fallback_score - 3.8).abs() < 1e-9);
            assert!((results[1].fallback_score - 1.0).abs() < 1e-9);
        }
        other => panic!("expected fallback outcome, got {other:?}"),
    }
}

#[test]
fn brand_override_beats_parsed_brand() {
    let parsed = ParsedQuery {
        intent: Some(Intent::Camera),
        matched_keywords: keywords(&["camera"]),
        brand: Some("Samsung".into()),
        ..Default::default()
    };
    match recommend(&parsed, &catalog(), 10, Some("Apple")) {
        Outcome::Ranked(results) => {
            assert!(results.iter().all(|r| r.entry.brand == "Apple"));
        }
        other => panic!("expected ranked outcome, got {other:?}"),
    }
}

#[test]
fn brand_filter_is_exact_not_partial() {
    let parsed = ParsedQuery {
        intent: Some(Intent::Battery),
        budget: Some(60000),
        brand: Some("One".into()),
        ..Default::default()
    };
    assert!(matches!(
        recommend(&parsed, &catalog(), 10, None),
        Outcome::NoMatch
    ));
}

#[test]
fn top_n_caps_the_result_list() {
    let parsed = ParsedQuery {
        intent: Some(Intent::Gaming),
        matched_keywords: keywords(&["gaming"]),
        ..Default::default()
    };
    match recommend(&parsed, &catalog(), 2, None) {
        Outcome::Ranked(results) => assert_eq!(results.len(), 2),
        other => panic!("expected ranked outcome, got {other:?}"),
    }
}

#[test]
fn recommend_is_deterministic() {
    let parsed = parse_query("gaming phone with 5g under 20k");
    let models = |outcome: Outcome| -> Vec<String> {
        match outcome {
            Outcome::Ranked(r) => r.into_iter().map(|s| s.entry.model).collect(),
            other => panic!("expected ranked outcome, got {other:?}"),
        }
    };
    let a = models(recommend(&parsed, &catalog(), 10, None));
    let b = models(recommend(&parsed, &catalog(), 10, None));
    assert_eq!(a, b);
}
