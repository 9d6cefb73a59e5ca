//! Point queries: one identity's risk profile from a [`ScoringReport`].

use std::collections::HashMap;

use riskscore_core::{normalize_name, RiskLevel};
use serde::Serialize;

use crate::scoring::{Activation, ScoringReport};
use crate::watchlist::Watchlist;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("no name columns in the unified dataset")]
    NoNameColumns,
}

/// The watchlist track of a profile, independent of the dataset score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchlistStatus {
    pub matched: bool,
    pub score: i64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskProfile {
    /// The name as queried.
    pub full_name: String,
    pub risk_score: i64,
    pub risk_level: RiskLevel,
    /// Every activation of the run, not only the ones touching this identity.
    pub rules: Vec<Activation>,
    /// Rows of this identity with a positive score.
    pub records_count: usize,
    /// Rows of this identity per source file, most rows first.
    pub records_breakdown: Vec<(String, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watchlist: Option<WatchlistStatus>,
    /// Number of names loaded in the watchlist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watchlist_count: Option<usize>,
}

fn watchlist_status(watchlist: &Watchlist, normalized: &str) -> WatchlistStatus {
    match watchlist.get(normalized) {
        Some(entry) => WatchlistStatus {
            matched: entry.score > 0,
            score: entry.score,
            reason: entry.reason.clone(),
        },
        None => WatchlistStatus {
            matched: false,
            score: 0,
            reason: String::new(),
        },
    }
}

/// Look up one identity.
///
/// A name absent from the dataset gets a zero-score `Low` profile; the
/// watchlist block is filled in either way when a watchlist is loaded.
pub fn query_name(
    report: &ScoringReport,
    name: &str,
    watchlist: &Watchlist,
) -> Result<RiskProfile, QueryError> {
    let Some(full_names) = report.full_names.as_deref() else {
        return Err(QueryError::NoNameColumns);
    };
    let normalized = normalize_name(name);

    let mut profile = match report.identity(&normalized) {
        None => RiskProfile {
            full_name: name.to_string(),
            risk_score: 0,
            risk_level: RiskLevel::Low,
            rules: Vec::new(),
            records_count: 0,
            records_breakdown: Vec::new(),
            watchlist: None,
            watchlist_count: None,
        },
        Some(identity) => {
            let rows: Vec<usize> = full_names
                .iter()
                .enumerate()
                .filter(|(_, n)| **n == normalized)
                .map(|(i, _)| i)
                .collect();

            let records_count = rows.iter().filter(|i| report.scores[**i] > 0).count();

            let mut per_file: HashMap<&str, usize> = HashMap::new();
            for i in &rows {
                *per_file.entry(report.source_files[*i].as_str()).or_insert(0) += 1;
            }
            let mut records_breakdown: Vec<(String, usize)> = per_file
                .into_iter()
                .map(|(file, count)| (file.to_string(), count))
                .collect();
            records_breakdown.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

            RiskProfile {
                full_name: name.to_string(),
                risk_score: identity.score,
                risk_level: identity.level,
                rules: report.activations.clone(),
                records_count,
                records_breakdown,
                watchlist: None,
                watchlist_count: None,
            }
        }
    };

    if !watchlist.is_empty() {
        profile.watchlist = Some(watchlist_status(watchlist, &normalized));
        profile.watchlist_count = Some(watchlist.len());
    }

    Ok(profile)
}
