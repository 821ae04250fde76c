use recommender::parser::{
    classify, extract_brand, extract_budget, extract_budget_or_default, parse_query,
    DEFAULT_AFFORDABLE_BUDGET,
};
use recommender::{Feature, Intent};

#[test]
fn shorthand_budget_with_qualifier() {
    assert_eq!(extract_budget("gaming phone under 25k"), Some(25000));
}

#[test]
fn shorthand_budget_without_qualifier() {
    assert_eq!(extract_budget("something around 40k would do"), Some(40000));
}

#[test]
fn explicit_budget_with_currency_and_separator() {
    assert_eq!(
        extract_budget("best phone for photography under ₹30,000"),
        Some(30000)
    );
}

#[test]
fn explicit_bare_budget() {
    assert_eq!(extract_budget("I want a gaming phone under 25000"), Some(25000));
}

#[test]
fn network_generation_is_never_a_price() {
    assert_eq!(extract_budget("need a 5g phone"), None);
    assert_eq!(extract_budget_or_default("need a 5g phone with nfc"), None);
}

#[test]
fn storage_sizes_are_never_prices() {
    // "128gb" runs into a word character, so the amount rule must not fire.
    assert_eq!(extract_budget("camera phone with 128gb storage"), None);
}

#[test]
fn no_budget_means_absent_not_zero() {
    assert_eq!(extract_budget("phone with a great screen"), None);
}

#[test]
fn affordability_words_imply_default_budget() {
    assert_eq!(
        extract_budget_or_default("affordable phone for daily use"),
        Some(DEFAULT_AFFORDABLE_BUDGET)
    );
}

#[test]
fn literal_number_beats_affordability_default() {
    assert_eq!(
        extract_budget_or_default("cheap phone under 15k"),
        Some(15000)
    );
}

#[test]
fn small_numbers_are_ignored_by_the_auxiliary_scan() {
    // An 8 GB RAM mention must not read as an 8-rupee budget.
    assert_eq!(extract_budget_or_default("phone with 8 gb ram"), None);
}

#[test]
fn classifies_gaming_intent_from_phrases() {
    let parsed = classify("Looking for a smooth phone to play PUBG");
    assert_eq!(parsed.intent, Some(Intent::Gaming));
    assert!(parsed.matched_keywords.contains("pubg"));
    assert!(parsed.matched_keywords.contains("smooth"));
    // "smooth" also lives in the performance feature vocabulary.
    assert!(parsed.supporting_features.contains(&Feature::Performance));
}

#[test]
fn multi_word_phrases_match_whole() {
    let parsed = classify("need a camera that works well in night mode");
    assert_eq!(parsed.intent, Some(Intent::Camera));
    assert!(parsed.matched_keywords.contains("night mode"));
}

#[test]
fn intent_ties_break_by_declared_priority() {
    // One distinct keyword each: camera precedes battery in priority order.
    let parsed = classify("camera and battery");
    assert_eq!(parsed.intent, Some(Intent::Camera));
}

#[test]
fn intent_score_counts_distinct_keywords_not_occurrences() {
    // "camera" five times is still one distinct keyword; two distinct
    // battery keywords outscore it.
    let parsed = classify("camera camera camera camera camera with charging and battery backup");
    assert_eq!(parsed.intent, Some(Intent::Battery));
}

#[test]
fn no_keywords_means_no_intent() {
    let parsed = classify("hello there friend");
    assert_eq!(parsed.intent, None);
    assert!(parsed.matched_keywords.is_empty());
    assert!(parsed.supporting_features.is_empty());
}

#[test]
fn supporting_features_work_without_intent() {
    let parsed = classify("needs nfc and dual sim");
    assert_eq!(parsed.intent, None);
    assert!(parsed.supporting_features.contains(&Feature::Connectivity));
}

#[test]
fn brand_is_case_insensitive_substring() {
    assert_eq!(extract_brand("a SAMSUNG phone please"), Some("Samsung"));
    assert_eq!(extract_brand("no brand here"), None);
}

#[test]
fn first_vocabulary_brand_wins_on_multiple_mentions() {
    // Vocabulary order, not text order, decides. Documented limitation.
    assert_eq!(extract_brand("samsung or apple, either works"), Some("Apple"));
}

#[test]
fn parse_query_merges_all_extractors() {
    let parsed = parse_query("affordable Xiaomi phone with good battery");
    assert_eq!(parsed.brand.as_deref(), Some("Xiaomi"));
    assert_eq!(parsed.budget, Some(DEFAULT_AFFORDABLE_BUDGET));
    assert_eq!(parsed.intent, Some(Intent::Battery));
}

#[test]
fn identical_input_identical_output() {
    let a = parse_query("I want a gaming phone with 5G and good RAM under ₹30,000");
    let b = parse_query("I want a gaming phone with 5G and good RAM under ₹30,000");
    assert_eq!(a.intent, b.intent);
    assert_eq!(a.budget, b.budget);
    assert_eq!(a.brand, b.brand);
    assert_eq!(a.matched_keywords, b.matched_keywords);
    assert_eq!(a.supporting_features, b.supporting_features);
}
