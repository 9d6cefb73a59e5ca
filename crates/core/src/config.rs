use std::env;

use serde::{Deserialize, Serialize};

use crate::level::{RiskLevel, SCORE_BUCKETS};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Split a comma-separated env value, keeping empty items (an empty NA token is meaningful).
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

// ── Static tables ─────────────────────────────────────────────

/// Cell tokens read as null. Matched exactly, so `NONE` or `Null` stay text.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// First/last name column pairs, in priority order.
pub const NAME_COLUMN_PAIRS: &[(&str, &str)] = &[
    ("Nombre", "Apellido"),
    ("first_name", "last_name"),
    ("FirstName", "LastName"),
];

/// Single full-name columns, matched case-insensitively.
pub const FULL_NAME_COLUMNS: &[&str] = &["full_name", "nombre_apellido", "name"];

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub scoring: ScoringConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            dataset: DatasetConfig::from_env(),
            scoring: ScoringConfig::from_env(),
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  dataset:  encodings={:?}, na_values={}",
            self.dataset.encodings,
            self.dataset.na_values.len()
        );
        tracing::info!(
            "  scoring:  high_cardinality_ratio={}, high_cardinality_min_rows={}, buckets={}",
            self.scoring.high_cardinality_ratio,
            self.scoring.high_cardinality_min_rows,
            self.scoring.buckets.len()
        );
    }
}

// ── Dataset ───────────────────────────────────────────────────

/// Text encodings tried, in order, when decoding a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "UTF-8"),
            TextEncoding::Latin1 => write!(f, "ISO-8859-1"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub encodings: Vec<TextEncoding>,
    pub na_values: Vec<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            encodings: vec![TextEncoding::Utf8, TextEncoding::Latin1],
            na_values: NA_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl DatasetConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(raw) = env_opt("RISKSCORE_NA_VALUES") {
            config.na_values = parse_list(&raw);
        }
        config
    }

    pub fn is_na(&self, token: &str) -> bool {
        self.na_values.iter().any(|na| na == token)
    }
}

// ── Scoring ───────────────────────────────────────────────────

/// Column names the identity key is built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameColumns {
    pub pairs: Vec<(String, String)>,
    pub single: Vec<String>,
}

impl Default for NameColumns {
    fn default() -> Self {
        Self {
            pairs: NAME_COLUMN_PAIRS
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
            single: FULL_NAME_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Distinct/total ratio a column must exceed for `high_cardinality`.
    pub high_cardinality_ratio: f64,
    /// Row count a dataset must exceed for `high_cardinality`.
    pub high_cardinality_min_rows: usize,
    pub buckets: Vec<(i64, RiskLevel)>,
    pub name_columns: NameColumns,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            high_cardinality_ratio: 0.95,
            high_cardinality_min_rows: 100,
            buckets: SCORE_BUCKETS.to_vec(),
            name_columns: NameColumns::default(),
        }
    }
}

impl ScoringConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            high_cardinality_ratio: env_parse(
                "RISKSCORE_HIGH_CARDINALITY_RATIO",
                defaults.high_cardinality_ratio,
            ),
            high_cardinality_min_rows: env_parse(
                "RISKSCORE_HIGH_CARDINALITY_MIN_ROWS",
                defaults.high_cardinality_min_rows,
            ),
            ..defaults
        }
    }
}
