use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One tagged product. Created at catalog load, immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub brand: String,
    pub model: String,
    /// INR, cleaned at load time. Rows whose price cannot be parsed are
    /// dropped from the catalog entirely.
    pub price: u32,
    /// Labels produced by the offline tagging pipeline. Deduplicated,
    /// order-irrelevant.
    pub tags: BTreeSet<String>,
}

/// Read-only catalog snapshot shared by every query for the lifetime of a
/// session. No component mutates it after load.
#[derive(Debug, Default)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Raw row as written by the tagger. `price` may arrive as an integer or as
/// a string carrying currency noise ("₹12,999", "Rs. 8999").
#[derive(Debug, Deserialize)]
struct RawEntry {
    brand: String,
    model: String,
    price: serde_json::Value,
    #[serde(default)]
    tags: Vec<String>,
}

/// Strip currency symbols and separators and parse to a non-negative INR
/// integer. `None` means the row is unusable.
pub fn clean_price(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        serde_json::Value::String(s) => {
            let cleaned = s
                .replace(',', "")
                .replace('₹', "")
                .replace("INR", "")
                .replace("Rs.", "")
                .trim()
                .to_string();
            cleaned.parse().ok()
        }
        _ => None,
    }
}

fn entry_from_raw(raw: RawEntry) -> Option<CatalogEntry> {
    let price = match clean_price(&raw.price) {
        Some(p) => p,
        None => {
            tracing::warn!(brand = %raw.brand, model = %raw.model, "dropping row with unparseable price");
            return None;
        }
    };
    Some(CatalogEntry {
        brand: raw.brand,
        model: raw.model,
        price,
        tags: raw.tags.into_iter().collect(),
    })
}

/// Load a tagged catalog from a JSON array file or a JSONL file (one row
/// per line). Rows that fail price cleaning are dropped; the loss is
/// visible only in the catalog size.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open catalog {}", path.display()))?;
    let reader = BufReader::new(f);

    let mut entries = Vec::new();
    if path.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let raw: RawEntry = serde_json::from_str(&line)
                .with_context(|| format!("parse catalog row in {}", path.display()))?;
            entries.extend(entry_from_raw(raw));
        }
    } else {
        let rows: Vec<RawEntry> = serde_json::from_reader(reader)
            .with_context(|| format!("parse catalog {}", path.display()))?;
        for raw in rows {
            entries.extend(entry_from_raw(raw));
        }
    }

    tracing::info!(num_entries = entries.len(), "catalog loaded");
    Ok(Catalog::from_entries(entries))
}
