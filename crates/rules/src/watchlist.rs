//! Watchlist loader: CSV of known names → normalized name → {score, reason}.

use std::collections::HashMap;
use std::path::Path;

use riskscore_core::config::DatasetConfig;
use riskscore_core::{normalize_name, FieldValue, RiskError};
use riskscore_dataset::read_frame;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const NAME_COLUMN: &str = "full_name";
const SCORE_COLUMN: &str = "watchlist_score";
const REASON_COLUMN: &str = "reason";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub score: i64,
    pub reason: String,
}

/// Known names keyed by normalized full name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watchlist {
    entries: HashMap<String, WatchlistEntry>,
}

impl Watchlist {
    /// Build from `(name, entry)` pairs. Names are normalized; later pairs
    /// overwrite earlier ones with the same key.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, WatchlistEntry)>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(name, entry)| (normalize_name(name.as_ref()), entry))
            .collect();
        Self { entries }
    }

    /// Look up an already normalized name.
    pub fn get(&self, normalized: &str) -> Option<&WatchlistEntry> {
        self.entries.get(normalized)
    }

    /// Stored score for a normalized name, 0 when absent.
    pub fn score(&self, normalized: &str) -> i64 {
        self.get(normalized).map(|e| e.score).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lenient integer view of a stored score. Anything unusable is 0.
fn parse_score(value: &FieldValue) -> i64 {
    match value {
        FieldValue::Integer(i) => *i,
        FieldValue::Float(f) if f.is_finite() => f.trunc() as i64,
        FieldValue::Text(s) => s.trim().parse().unwrap_or(0),
        FieldValue::Boolean(b) => i64::from(*b),
        _ => 0,
    }
}

/// Load a watchlist CSV with columns `full_name`, `watchlist_score` and an
/// optional `reason`.
///
/// A missing file, or one lacking either required column, yields an empty
/// watchlist. Rows with no name are skipped.
pub fn load_watchlist(path: &Path, config: &DatasetConfig) -> Result<Watchlist, RiskError> {
    if !path.is_file() {
        debug!(path = %path.display(), "watchlist file not found, using empty watchlist");
        return Ok(Watchlist::default());
    }

    let frame = read_frame(path, config)?;
    let (Some(names), Some(scores)) = (frame.column(NAME_COLUMN), frame.column(SCORE_COLUMN))
    else {
        debug!(path = %path.display(), "watchlist lacks required columns, using empty watchlist");
        return Ok(Watchlist::default());
    };
    let reasons = frame.column(REASON_COLUMN);

    let entries = names
        .iter()
        .zip(scores)
        .enumerate()
        .filter_map(|(idx, (name, score))| {
            let name = name.to_text()?;
            let reason = reasons
                .and_then(|r| r.get(idx))
                .and_then(FieldValue::to_text)
                .unwrap_or_default();
            Some((
                name,
                WatchlistEntry {
                    score: parse_score(score),
                    reason,
                },
            ))
        });

    let watchlist = Watchlist::from_entries(entries);
    info!(path = %path.display(), names = watchlist.len(), "loaded watchlist");
    Ok(watchlist)
}
