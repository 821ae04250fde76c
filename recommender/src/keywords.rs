use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dominant use-case label for a query. Declaration order is the tie-break
/// priority when two intents score equally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Gaming,
    Camera,
    Battery,
    Display,
    Budget,
    Performance,
}

impl Intent {
    pub const PRIORITY: [Intent; 6] = [
        Intent::Gaming,
        Intent::Camera,
        Intent::Battery,
        Intent::Display,
        Intent::Budget,
        Intent::Performance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Gaming => "gaming",
            Intent::Camera => "camera",
            Intent::Battery => "battery",
            Intent::Display => "display",
            Intent::Budget => "budget",
            Intent::Performance => "performance",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Intent::Gaming => &[
                "game", "gaming", "fps", "processor", "lag free", "smooth", "pubg",
                "call of duty", "gamer", "multiplayer", "high frame", "fast refresh",
                "streaming", "graphics", "frame rate", "heat", "cooling",
                "performance mode", "battle royale", "touch response", "no lag",
                "thermal control", "gaming mode", "game center", "vapor chamber",
                "game turbo", "game booster", "adaptive sync",
            ],
            Intent::Camera => &[
                "camera", "photography", "photo", "selfie", "portrait", "macro",
                "night mode", "picture", "snap", "lens", "optical zoom", "hdr photo",
                "ultra wide", "zoom", "video", "record", "cinematic", "vlogging",
                "rear cam", "night vision", "dslr", "camera quality", "depth sensor",
                "quad cam",
            ],
            Intent::Battery => &[
                "battery", "charging", "mah", "charge", "fast charging", "power",
                "long battery", "strong battery", "battery backup", "type c",
                "overnight", "battery saver", "quick charge", "power saving",
                "endurance", "charge speed", "long lasting", "usb c", "turbo charge",
            ],
            Intent::Display => &[
                "display", "screen", "amoled", "refresh", "resolution", "hdr", "oled",
                "lcd", "brightness", "watch", "video", "visual", "sharp", "big screen",
                "crisp", "viewing", "touchscreen", "fullscreen", "vivid", "contrast",
                "color accurate", "bezels", "curved display", "infinity display",
            ],
            Intent::Budget => &[
                "cheap", "budget", "affordable", "value", "low cost", "mid range",
                "inexpensive", "entry-level", "under 10000", "under 20k", "deal",
                "economical", "student", "pocket friendly", "cost effective",
                "best price", "bang for buck", "value for money", "below 15k",
            ],
            Intent::Performance => &[
                "top specs", "high specs", "high-end", "flagship", "powerful",
                "best specs", "snappy", "lag-free", "beast", "spec monster",
                "top tier", "fast", "elite performance", "high speed",
                "fluid experience", "speedy", "responsive", "performance beast",
                "no stutter",
            ],
        }
    }
}

/// Secondary need category, detected independently of intent. The vocabulary
/// deliberately overlaps with some intent keywords ("performance" lives in
/// both tables).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Connectivity,
    Storage,
    Performance,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::Connectivity, Feature::Storage, Feature::Performance];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Connectivity => "connectivity",
            Feature::Storage => "storage",
            Feature::Performance => "performance",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Feature::Connectivity => &[
                "5g", "4g", "wifi", "nfc", "dual sim", "bluetooth", "network",
                "internet", "volte", "usb c", "ir blaster", "hotspot",
                "airplane mode", "sim slot", "connectivity", "roaming", "mobile data",
                "ethernet", "dongle", "tethering",
            ],
            Feature::Storage => &[
                "expandable", "sd card", "storage", "rom", "memory",
                "internal storage", "128gb", "256gb", "512gb", "storage expansion",
                "cloud backup", "micro sd", "file transfer", "memory card",
                "storage space", "media storage", "backup",
            ],
            Feature::Performance => &[
                "ram", "fast", "performance", "processor", "smooth", "speed",
                "snapdragon", "mediatek", "powerful", "multitask", "no lag",
                "octa core", "chipset", "benchmark", "hardware", "thermal",
                "cooling system", "speed test", "core", "refresh rate",
            ],
        }
    }
}

/// Brand vocabulary, matched first-in-order. If a query mentions several
/// brands, the first vocabulary entry wins; this is a documented limitation.
pub const KNOWN_BRANDS: [&str; 10] = [
    "Apple", "Samsung", "Xiaomi", "OnePlus", "Realme", "Vivo", "Oppo", "Asus",
    "Motorola", "Google",
];

lazy_static! {
    /// Per-label scoring weights. Labels missing from this table weigh 1.0.
    pub static ref FEATURE_WEIGHTS: HashMap<&'static str, f64> = {
        let entries: &[(&str, f64)] = &[
            ("performance", 2.0),
            ("camera", 1.8),
            ("battery", 1.5),
            ("connectivity", 1.2),
            ("storage", 1.2),
            ("display", 1.0),
            ("gaming", 2.0),
            ("budget", 1.0),
            ("design", 1.0),
            ("night photography", 1.5),
            ("ultra wide", 1.2),
            ("cooling", 1.3),
            ("vlogging", 1.2),
            ("content creation", 1.3),
        ];
        entries.iter().copied().collect()
    };

    /// Whole-word/whole-phrase matcher for every dictionary keyword,
    /// compiled once at startup.
    pub static ref KEYWORD_PATTERNS: HashMap<&'static str, Regex> = {
        let mut map = HashMap::new();
        for intent in Intent::PRIORITY {
            for kw in intent.keywords() {
                map.entry(*kw).or_insert_with(|| phrase_regex(kw));
            }
        }
        for feature in Feature::ALL {
            for kw in feature.keywords() {
                map.entry(*kw).or_insert_with(|| phrase_regex(kw));
            }
        }
        map
    };
}

fn phrase_regex(kw: &str) -> Regex {
    Regex::new(&format!(r"\b{}\b", regex::escape(kw))).expect("valid regex")
}

/// Scoring weight for a label; defaults to 1.0 for unknown labels.
pub fn weight(label: &str) -> f64 {
    FEATURE_WEIGHTS.get(label).copied().unwrap_or(1.0)
}
