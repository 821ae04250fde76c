use anyhow::Result;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use recommender::{load_catalog, parse_query, recommend, Catalog, Outcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, AllowOrigin, CorsLayer};
use url::Url;

#[derive(Deserialize)]
pub struct RecommendParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
    /// Explicit budget override (INR); replaces whatever the parser found.
    pub budget: Option<u32>,
    /// Explicit brand override; matched against the brand vocabulary.
    pub brand: Option<String>,
}
fn default_k() -> usize {
    5
}

#[derive(Serialize)]
pub struct RecommendResponse {
    pub query: String,
    pub took_s: f64,
    /// "ranked" | "fallback" | "no_match" | "ambiguous"
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub results: Vec<RecommendHit>,
}

#[derive(Serialize)]
pub struct RecommendHit {
    pub brand: String,
    pub model: String,
    pub price: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_score: Option<f64>,
    pub amazon_url: String,
    pub flipkart_url: String,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

pub fn build_app(catalog_path: &str) -> Result<Router> {
    // Load the catalog snapshot once at startup; queries are pure reads.
    let catalog = load_catalog(catalog_path)?;
    let app_state = AppState { catalog: Arc::new(catalog) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/recommend", get(recommend_handler))
        .with_state(app_state)
        .layer(cors);
    Ok(app)
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> Json<RecommendResponse> {
    let start = std::time::Instant::now();

    let mut parsed = parse_query(&params.q);
    if params.budget.is_some() {
        parsed.budget = params.budget;
    }
    let top_n = params.k.clamp(1, 50);
    let outcome = recommend(&parsed, &state.catalog, top_n, params.brand.as_deref());

    let (label, message, results) = match outcome {
        Outcome::Ranked(entries) => (
            "ranked",
            None,
            entries
                .into_iter()
                .map(|s| {
                    let (amazon_url, flipkart_url) = shop_links(&s.entry.brand, &s.entry.model);
                    RecommendHit {
                        brand: s.entry.brand,
                        model: s.entry.model,
                        price: s.entry.price,
                        matched_features: Some(s.matched_features),
                        match_score: Some(s.match_score),
                        fallback_score: None,
                        amazon_url,
                        flipkart_url,
                    }
                })
                .collect(),
        ),
        Outcome::Fallback(entries) => (
            "fallback",
            None,
            entries
                .into_iter()
                .map(|s| {
                    let (amazon_url, flipkart_url) = shop_links(&s.entry.brand, &s.entry.model);
                    RecommendHit {
                        brand: s.entry.brand,
                        model: s.entry.model,
                        price: s.entry.price,
                        matched_features: None,
                        match_score: None,
                        fallback_score: Some(s.fallback_score),
                        amazon_url,
                        flipkart_url,
                    }
                })
                .collect(),
        ),
        Outcome::NoMatch => (
            "no_match",
            Some("No phones survive those filters; try loosening the brand or budget."),
            vec![],
        ),
        Outcome::Ambiguous => (
            "ambiguous",
            Some("Couldn't identify any requirement; mention needs like camera, gaming, or battery."),
            vec![],
        ),
    };

    let elapsed = start.elapsed();
    Json(RecommendResponse {
        query: params.q,
        took_s: elapsed.as_secs_f64(),
        outcome: label,
        message,
        results,
    })
}

/// External shopping links for a result. Static string construction only;
/// nothing in the core depends on these being reachable.
fn shop_links(brand: &str, model: &str) -> (String, String) {
    let query = format!("{brand} {model} smartphone");
    let amazon = Url::parse_with_params("https://www.amazon.in/s", &[("k", query.as_str())])
        .expect("valid url");
    let flipkart = Url::parse_with_params("https://www.flipkart.com/search", &[("q", query.as_str())])
        .expect("valid url");
    (amazon.into(), flipkart.into())
}
