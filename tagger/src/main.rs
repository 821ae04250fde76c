use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lazy_static::lazy_static;
use recommender::catalog::clean_price;
use recommender::{CatalogEntry, Feature};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

lazy_static! {
    static ref DIGITS_RE: Regex = Regex::new(r"\d+").expect("valid regex");
    static ref DECIMAL_RE: Regex = Regex::new(r"\d+(\.\d+)?").expect("valid regex");
}

/// One raw specification row as scraped. Every spec field is free-form text
/// or a number; missing fields simply produce no tag.
#[derive(Debug, Deserialize)]
struct RawPhone {
    brand: String,
    model: String,
    price: Value,
    #[serde(default)]
    ram: Option<Value>,
    #[serde(default)]
    storage: Option<Value>,
    #[serde(default)]
    battery: Option<Value>,
    #[serde(default)]
    processor: Option<String>,
    #[serde(default, rename = "display size")]
    display_size: Option<Value>,
    #[serde(default, rename = "display resolution")]
    display_resolution: Option<String>,
    #[serde(default, rename = "refresh rate")]
    refresh_rate: Option<Value>,
    #[serde(default, rename = "5G")]
    five_g: Option<Value>,
    #[serde(default, rename = "charging speed")]
    charging_speed: Option<String>,
    #[serde(default, rename = "sim slots")]
    sim_slots: Option<Value>,
    #[serde(default, rename = "rear camera")]
    rear_camera: Option<String>,
    #[serde(default, rename = "front camera")]
    front_camera: Option<String>,
    #[serde(default, rename = "processor type")]
    processor_type: Option<String>,
    #[serde(default, rename = "4G volte")]
    volte: Option<Value>,
    #[serde(default, rename = "4G")]
    four_g: Option<Value>,
    #[serde(default, rename = "3G")]
    three_g: Option<Value>,
    #[serde(default)]
    nfc: Option<Value>,
    #[serde(default, rename = "memory card support")]
    memory_card_support: Option<Value>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Parser)]
#[command(name = "tagger")]
#[command(about = "Convert raw phone spec rows into the tagged catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tag raw spec rows from input JSON/JSONL files or a directory
    Tag {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output tagged catalog (JSONL)
        #[arg(long)]
        output: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Tag { input, output } => tag_catalog(&input, &output),
    }
}

fn tag_catalog(input: &str, output: &str) -> Result<()> {
    let input_path = Path::new(input);

    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    }

    let mut rows: Vec<RawPhone> = Vec::new();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut rows)?;
        } else {
            read_json(&file, &mut rows)?;
        }
    }

    let total = rows.len();
    let mut entries: Vec<CatalogEntry> = Vec::new();
    for row in rows {
        if let Some(entry) = entry_from_row(row) {
            entries.push(entry);
        }
    }
    tracing::info!(total, tagged = entries.len(), "tagging complete");

    if let Some(parent) = Path::new(output).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut w = BufWriter::new(File::create(output).with_context(|| format!("create {output}"))?);
    for entry in &entries {
        serde_json::to_writer(&mut w, entry)?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    tracing::info!(output, "catalog written");
    Ok(())
}

fn read_jsonl(file: &Path, rows: &mut Vec<RawPhone>) -> Result<()> {
    let f = File::open(file)?;
    let reader = BufReader::new(f);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row: RawPhone = serde_json::from_str(&line)
            .with_context(|| format!("parse row in {}", file.display()))?;
        rows.push(row);
    }
    Ok(())
}

fn read_json(file: &Path, rows: &mut Vec<RawPhone>) -> Result<()> {
    let f = File::open(file)?;
    let reader = BufReader::new(f);
    let json: Value = serde_json::from_reader(reader)?;
    match json {
        Value::Array(arr) => {
            for v in arr {
                rows.push(serde_json::from_value(v)?);
            }
        }
        Value::Object(_) => rows.push(serde_json::from_value(json)?),
        _ => {}
    }
    Ok(())
}

fn entry_from_row(row: RawPhone) -> Option<CatalogEntry> {
    let price = match clean_price(&row.price) {
        Some(p) => p,
        None => {
            tracing::warn!(brand = %row.brand, model = %row.model, "dropping row with unparseable price");
            return None;
        }
    };
    let mut tags = use_case_tags(&row, price);
    tags.extend(supporting_feature_tags(&row));
    tags.extend(specialty_tags(&row));
    tags.extend(spec_tags(&row));
    Some(CatalogEntry {
        brand: row.brand,
        model: row.model,
        price,
        tags,
    })
}

/// First run of digits in a numeric or free-form field.
fn digits(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => DIGITS_RE
            .find(s)
            .and_then(|m| m.as_str().parse::<u32>().ok()),
        _ => None,
    }
}

fn max_megapixels(field: &Option<String>) -> u32 {
    field
        .as_deref()
        .map(|s| {
            DIGITS_RE
                .find_iter(s)
                .filter_map(|m| m.as_str().parse::<u32>().ok())
                .max()
                .unwrap_or(0)
        })
        .unwrap_or(0)
}

fn truthy(value: &Option<Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_u64() == Some(1),
        Some(Value::String(s)) => {
            matches!(s.to_lowercase().as_str(), "yes" | "true" | "supported" | "1")
        }
        _ => false,
    }
}

/// Use-case tags mirror the query intent vocabulary: a phone earns "gaming",
/// "battery", "camera" or "display" when its raw specs clear the rule
/// thresholds, plus a price-bucket tag.
fn use_case_tags(row: &RawPhone, price: u32) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();

    let ram = row.ram.as_ref().and_then(digits).unwrap_or(0);
    let refresh = row.refresh_rate.as_ref().and_then(digits).unwrap_or(0);
    let processor = row.processor.as_deref().unwrap_or("").to_lowercase();
    let gaming_chip = ["snapdragon", "mediatek", "a13", "a14", "a15", "a16", "a17"]
        .iter()
        .any(|p| processor.contains(p));
    if ram >= 6 && refresh >= 90 && gaming_chip {
        tags.insert("gaming".to_string());
    }

    let battery = row.battery.as_ref().and_then(digits).unwrap_or(0);
    let fast_charging = row
        .charging_speed
        .as_deref()
        .is_some_and(|s| s.to_lowercase().contains("fast"));
    if battery >= 5000 || fast_charging {
        tags.insert("battery".to_string());
    }

    let rear = max_megapixels(&row.rear_camera);
    let front = max_megapixels(&row.front_camera);
    if rear >= 12 && front >= 12 {
        tags.insert("camera".to_string());
    }

    let resolution = row.display_resolution.as_deref().unwrap_or("").to_lowercase();
    let sharp = ["fhd", "full hd", "1080", "retina", "oled"]
        .iter()
        .any(|q| resolution.contains(q));
    let size = display_inches(row);
    if sharp || size >= 6.5 || row.model.to_lowercase().contains("pro max") {
        tags.insert("display".to_string());
    }

    // Price buckets climb in 10000-rupee steps up to 200000; anything above
    // the ladder gets no bucket tag.
    if price <= 200_000 {
        let bucket = (price.saturating_sub(1) / 10_000 + 1) * 10_000;
        tags.insert(bucket.to_string());
    }

    tags
}

fn text_of(value: &Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s.to_lowercase(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Supporting-feature tags reuse the query-side vocabularies: a phone is
/// tagged "connectivity"/"storage"/"performance" when its raw field text
/// mentions any keyword of that category, so feature-weighted scoring has
/// tags to intersect with.
fn supporting_feature_tags(row: &RawPhone) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();

    // Flag fields ("5G": "Yes") carry no keyword text of their own, so a
    // truthy flag contributes its canonical token alongside the raw text.
    let mut connectivity_parts = vec![
        text_of(&row.five_g),
        text_of(&row.volte),
        text_of(&row.four_g),
        text_of(&row.three_g),
        text_of(&row.nfc),
        text_of(&row.sim_slots),
    ];
    for (flag, token) in [
        (&row.five_g, "5g"),
        (&row.volte, "volte"),
        (&row.four_g, "4g"),
        (&row.nfc, "nfc"),
    ] {
        if truthy(flag) {
            connectivity_parts.push(token.to_string());
        }
    }
    let connectivity_text = connectivity_parts.join(" ");
    if Feature::Connectivity
        .keywords()
        .iter()
        .any(|kw| connectivity_text.contains(kw))
    {
        tags.insert("connectivity".to_string());
    }

    let storage_text = format!(
        "{} {}",
        text_of(&row.storage),
        text_of(&row.memory_card_support)
    );
    if Feature::Storage
        .keywords()
        .iter()
        .any(|kw| storage_text.contains(kw))
    {
        tags.insert("storage".to_string());
    }

    let perf_text = format!(
        "{} {} {}",
        text_of(&row.ram),
        row.processor.as_deref().unwrap_or("").to_lowercase(),
        row.processor_type.as_deref().unwrap_or("").to_lowercase()
    );
    if Feature::Performance
        .keywords()
        .iter()
        .any(|kw| perf_text.contains(kw))
    {
        tags.insert("performance".to_string());
    }

    tags
}

/// Specialized camera/design/thermal tags, each carrying its own weight in
/// the scoring table, plus a lowercase brand tag.
fn specialty_tags(row: &RawPhone) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();

    let camera_text = row.rear_camera.as_deref().unwrap_or("").to_lowercase();
    if ["night", "ois", "sony sensor", "night vision", "low light"]
        .iter()
        .any(|kw| camera_text.contains(kw))
    {
        tags.insert("night photography".to_string());
    }
    if camera_text.contains("ultra wide") {
        tags.insert("ultra wide".to_string());
    }

    let description = row.description.as_deref().unwrap_or("").to_lowercase();
    let design_text = format!("{} {}", description, row.model.to_lowercase());
    if ["sleek", "modern", "premium", "glass back", "design", "aesthetic", "stylish"]
        .iter()
        .any(|kw| design_text.contains(kw))
    {
        tags.insert("design".to_string());
    }

    let heat_text = format!(
        "{} {}",
        row.processor.as_deref().unwrap_or("").to_lowercase(),
        description
    );
    if ["cooling", "vapor chamber", "heat", "thermal", "liquid cooling", "game booster"]
        .iter()
        .any(|kw| heat_text.contains(kw))
    {
        tags.insert("cooling".to_string());
    }

    if description.contains("vlog") {
        tags.insert("vlogging".to_string());
    }
    if ["youtube", "creator", "influencer", "video editing", "content"]
        .iter()
        .any(|kw| description.contains(kw))
    {
        tags.insert("content creation".to_string());
    }

    let brand = row.brand.to_lowercase();
    if !brand.is_empty() {
        tags.insert(brand);
    }

    tags
}

fn display_inches(row: &RawPhone) -> f64 {
    let text = match row.display_size.as_ref() {
        Some(Value::Number(n)) => return n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.as_str(),
        _ => return 0.0,
    };
    DECIMAL_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Spec-bucket tags: sizes rounded up to the next common bucket so queries
/// like "8gb" or "5000mah" hit consistently.
fn spec_tags(row: &RawPhone) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();

    if let Some(ram) = row.ram.as_ref().and_then(digits) {
        for size in [2u32, 4, 6, 8, 12, 16] {
            if ram <= size {
                tags.insert(format!("{size}gb"));
                break;
            }
        }
    }

    if let Some(storage) = row.storage.as_ref().and_then(digits) {
        for size in [32u32, 64, 128, 256, 512] {
            if storage <= size {
                tags.insert(format!("{size}gb"));
                break;
            }
        }
    }

    if let Some(battery) = row.battery.as_ref().and_then(digits) {
        for size in [3000u32, 4000, 4500, 5000, 6000] {
            if battery <= size {
                tags.insert(format!("{size}mah"));
                break;
            }
        }
    }

    let inches = display_inches(row);
    if inches > 0.0 {
        tags.insert(format!("{:.1}", (inches * 10.0).round() / 10.0));
    }

    if let Some(refresh) = row.refresh_rate.as_ref().and_then(digits) {
        if refresh > 0 {
            tags.insert(format!("{refresh}hz"));
        }
    }

    if truthy(&row.five_g) {
        tags.insert("5g".to_string());
    }

    if row
        .charging_speed
        .as_deref()
        .is_some_and(|s| s.to_lowercase().contains("fast"))
    {
        tags.insert("fast charging".to_string());
    }

    if row.sim_slots.as_ref().and_then(digits).unwrap_or(1) >= 2 {
        tags.insert("dual sim".to_string());
    }

    let rear = max_megapixels(&row.rear_camera);
    if rear > 0 {
        tags.insert(format!("{rear}mp"));
    }
    let front = max_megapixels(&row.front_camera);
    if front > 0 {
        tags.insert(format!("{front}mp front"));
    }

    tags
}
