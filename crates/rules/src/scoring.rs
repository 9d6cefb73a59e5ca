//! Scoring aggregator: rule masks → row scores, risk levels and identity sums.

use std::collections::BTreeMap;

use riskscore_core::config::{NameColumns, ScoringConfig};
use riskscore_core::{bucket_score, normalize_name, FieldValue, RiskLevel};
use riskscore_dataset::Dataset;
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::compiler::RuleSet;
use crate::evaluator::{EvalContext, ExpressionEvaluator, MaskEvaluator};
use crate::watchlist::Watchlist;

/// Expression recorded for the watchlist activation.
pub const WATCHLIST_EXPRESSION: &str = "watchlist_match";

// ── Name columns ────────────────────────────────────────────────────

/// Where the identity key of each row comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NameSource {
    /// First and last name columns joined by a space.
    Pair { first: String, last: String },
    /// One column that already holds the full name.
    Single { column: String },
}

impl std::fmt::Display for NameSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameSource::Pair { first, last } => write!(f, "{first} + {last}"),
            NameSource::Single { column } => write!(f, "{column}"),
        }
    }
}

/// Pick the identity columns: the first candidate pair fully present, else the
/// first dataset column whose lowercase name is a single full-name candidate.
pub fn detect_name_columns(dataset: &Dataset, candidates: &NameColumns) -> Option<NameSource> {
    let pair = candidates
        .pairs
        .iter()
        .find(|(first, last)| dataset.has_column(first) && dataset.has_column(last));
    if let Some((first, last)) = pair {
        return Some(NameSource::Pair {
            first: first.clone(),
            last: last.clone(),
        });
    }

    dataset
        .column_names()
        .find(|name| {
            let lower = name.to_lowercase();
            candidates.single.iter().any(|c| *c == lower)
        })
        .map(|column| NameSource::Single {
            column: column.to_string(),
        })
}

fn text_or_empty(value: &FieldValue) -> String {
    value.to_text().unwrap_or_default()
}

/// Normalized full name for every row; all empty without a name source.
fn build_full_names(dataset: &Dataset, source: Option<&NameSource>) -> Vec<String> {
    let empty = || vec![String::new(); dataset.len()];
    match source {
        Some(NameSource::Pair { first, last }) => {
            match (dataset.column(first), dataset.column(last)) {
                (Some(a), Some(b)) => a
                    .iter()
                    .zip(b)
                    .map(|(a, b)| {
                        normalize_name(&format!("{} {}", text_or_empty(a), text_or_empty(b)))
                    })
                    .collect(),
                _ => empty(),
            }
        }
        Some(NameSource::Single { column }) => match dataset.column(column) {
            Some(values) => values.iter().map(|v| normalize_name(&text_or_empty(v))).collect(),
            None => empty(),
        },
        None => empty(),
    }
}

// ── Report types ────────────────────────────────────────────────────

/// Weight shown for an activation. The watchlist contributes a per-row score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationWeight {
    Fixed(i64),
    Variable,
}

impl Serialize for ActivationWeight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ActivationWeight::Fixed(w) => serializer.serialize_i64(*w),
            ActivationWeight::Variable => serializer.serialize_str("variable"),
        }
    }
}

impl std::fmt::Display for ActivationWeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivationWeight::Fixed(w) => write!(f, "{w}"),
            ActivationWeight::Variable => write!(f, "variable"),
        }
    }
}

/// A rule (or the watchlist) that matched at least one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activation {
    pub expression: String,
    pub weight: ActivationWeight,
    pub matched_rows: usize,
}

/// A rule whose evaluation failed. It contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnoredRule {
    pub expression: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityAggregate {
    pub full_name: String,
    /// Sum of the identity's row scores.
    pub score: i64,
    pub level: RiskLevel,
}

/// Borrowed view of one scored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowScore<'a> {
    pub index: usize,
    pub score: i64,
    pub level: RiskLevel,
    pub full_name: Option<&'a str>,
    pub source_file: &'a str,
}

/// Result of scoring one (dataset, rules, watchlist) triple. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringReport {
    pub scores: Vec<i64>,
    pub levels: Vec<RiskLevel>,
    /// Normalized full name per row, present only when a name source was detected.
    pub full_names: Option<Vec<String>>,
    pub source_files: Vec<String>,
    /// Keyed by normalized full name. Empty without a name source.
    pub identities: BTreeMap<String, IdentityAggregate>,
    pub activations: Vec<Activation>,
    pub ignored: Vec<IgnoredRule>,
    pub name_source: Option<NameSource>,
}

impl ScoringReport {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<RowScore<'_>> {
        Some(RowScore {
            index,
            score: *self.scores.get(index)?,
            level: *self.levels.get(index)?,
            full_name: self
                .full_names
                .as_ref()
                .and_then(|names| names.get(index))
                .map(String::as_str),
            source_file: self.source_files.get(index)?.as_str(),
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = RowScore<'_>> + '_ {
        (0..self.len()).filter_map(|i| self.row(i))
    }

    pub fn identity(&self, normalized: &str) -> Option<&IdentityAggregate> {
        self.identities.get(normalized)
    }
}

// ── Scorer ──────────────────────────────────────────────────────────

/// Runs every rule over the dataset and folds the masks into a report.
///
/// Generic over the [`MaskEvaluator`] so the grammar can be swapped out.
#[derive(Debug, Clone)]
pub struct RiskScorer<'a, E: MaskEvaluator = ExpressionEvaluator> {
    config: &'a ScoringConfig,
    evaluator: E,
}

impl<'a> RiskScorer<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self {
            config,
            evaluator: ExpressionEvaluator,
        }
    }
}

impl<'a, E: MaskEvaluator> RiskScorer<'a, E> {
    pub fn with_evaluator(config: &'a ScoringConfig, evaluator: E) -> Self {
        Self { config, evaluator }
    }

    /// Score every row. Pure: the same inputs always give the same report.
    ///
    /// A rule that fails to evaluate is recorded as ignored and the rest
    /// continue. Rules matching no row leave no activation.
    pub fn score(&self, dataset: &Dataset, rules: &RuleSet, watchlist: &Watchlist) -> ScoringReport {
        let rows = dataset.len();
        let name_source = detect_name_columns(dataset, &self.config.name_columns);
        match &name_source {
            Some(source) => debug!(%source, "detected name columns"),
            None => debug!("no name columns, identity aggregation skipped"),
        }
        let full_names = build_full_names(dataset, name_source.as_ref());

        let ctx = EvalContext {
            dataset,
            full_names: &full_names,
            config: self.config,
        };

        let mut scores = vec![0i64; rows];
        let mut activations = Vec::new();
        let mut ignored = Vec::new();

        for rule in rules {
            let mask = match self.evaluator.evaluate(&rule.expression, &ctx) {
                Ok(mask) => mask,
                Err(e) => {
                    warn!(expression = %rule.expression, error = %e, "rule ignored");
                    ignored.push(IgnoredRule {
                        expression: rule.expression.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let matched_rows = mask.iter().filter(|hit| **hit).count();
            debug!(expression = %rule.expression, matched_rows, "evaluated rule");
            if matched_rows == 0 {
                continue;
            }

            // totals saturate instead of wrapping on extreme weights
            scores
                .iter_mut()
                .zip(&mask)
                .filter(|(_, hit)| **hit)
                .for_each(|(total, _)| *total = total.saturating_add(rule.weight));
            activations.push(Activation {
                expression: rule.expression.clone(),
                weight: ActivationWeight::Fixed(rule.weight),
                matched_rows,
            });
        }

        if !watchlist.is_empty() && name_source.is_some() {
            let listed: Vec<i64> = full_names.iter().map(|n| watchlist.score(n)).collect();
            let matched_rows = listed.iter().filter(|s| **s > 0).count();
            if matched_rows > 0 {
                scores
                    .iter_mut()
                    .zip(&listed)
                    .for_each(|(total, extra)| *total = total.saturating_add(*extra));
                activations.push(Activation {
                    expression: WATCHLIST_EXPRESSION.to_string(),
                    weight: ActivationWeight::Variable,
                    matched_rows,
                });
            }
        }

        let levels: Vec<RiskLevel> = scores
            .iter()
            .map(|s| bucket_score(*s, &self.config.buckets))
            .collect();

        let (identities, full_names) = match name_source {
            Some(_) => (self.aggregate(&full_names, &scores), Some(full_names)),
            None => (BTreeMap::new(), None),
        };

        info!(
            rows,
            rules = rules.len(),
            activations = activations.len(),
            ignored = ignored.len(),
            identities = identities.len(),
            "scoring complete"
        );

        ScoringReport {
            scores,
            levels,
            full_names,
            source_files: dataset.source_files().to_vec(),
            identities,
            activations,
            ignored,
            name_source,
        }
    }

    fn aggregate(&self, full_names: &[String], scores: &[i64]) -> BTreeMap<String, IdentityAggregate> {
        let mut sums: BTreeMap<&str, i64> = BTreeMap::new();
        for (name, score) in full_names.iter().zip(scores) {
            let sum = sums.entry(name.as_str()).or_insert(0);
            *sum = sum.saturating_add(*score);
        }

        sums.into_iter()
            .map(|(name, score)| {
                let aggregate = IdentityAggregate {
                    full_name: name.to_string(),
                    score,
                    level: bucket_score(score, &self.config.buckets),
                };
                (name.to_string(), aggregate)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use riskscore_core::FieldValue;

    use super::*;

    fn text(values: &[&str]) -> Vec<FieldValue> {
        values.iter().map(|v| FieldValue::Text(v.to_string())).collect()
    }

    #[test]
    fn pair_columns_win_over_single_column() {
        let ds = Dataset::from_columns(
            vec![
                ("full_name", text(&["x"])),
                ("first_name", text(&["Jan"])),
                ("last_name", text(&["Pereira"])),
            ],
            "a.csv",
        );
        assert_eq!(
            detect_name_columns(&ds, &NameColumns::default()),
            Some(NameSource::Pair {
                first: "first_name".into(),
                last: "last_name".into()
            })
        );
    }

    #[test]
    fn pair_priority_follows_candidate_order() {
        let ds = Dataset::from_columns(
            vec![
                ("first_name", text(&["a"])),
                ("last_name", text(&["b"])),
                ("Nombre", text(&["c"])),
                ("Apellido", text(&["d"])),
            ],
            "a.csv",
        );
        assert_eq!(
            detect_name_columns(&ds, &NameColumns::default()),
            Some(NameSource::Pair {
                first: "Nombre".into(),
                last: "Apellido".into()
            })
        );
    }

    #[test]
    fn single_column_is_case_insensitive() {
        let ds = Dataset::from_columns(
            vec![("Age", text(&["1"])), ("Full_Name", text(&["Jan"]))],
            "a.csv",
        );
        assert_eq!(
            detect_name_columns(&ds, &NameColumns::default()),
            Some(NameSource::Single {
                column: "Full_Name".into()
            })
        );
    }

    #[test]
    fn half_a_pair_is_not_enough() {
        let ds = Dataset::from_columns(vec![("first_name", text(&["Jan"]))], "a.csv");
        assert_eq!(detect_name_columns(&ds, &NameColumns::default()), None);
    }

    #[test]
    fn null_name_parts_become_empty() {
        let ds = Dataset::from_columns(
            vec![
                ("Nombre", vec![FieldValue::Text("jan".into()), FieldValue::Null]),
                ("Apellido", vec![FieldValue::Null, FieldValue::Null]),
            ],
            "a.csv",
        );
        let source = detect_name_columns(&ds, &NameColumns::default());
        assert_eq!(build_full_names(&ds, source.as_ref()), vec!["JAN", ""]);
    }

    #[test]
    fn activation_weight_serializes_as_number_or_marker() {
        assert_eq!(serde_json::to_string(&ActivationWeight::Fixed(-5)).unwrap(), "-5");
        assert_eq!(
            serde_json::to_string(&ActivationWeight::Variable).unwrap(),
            "\"variable\""
        );
    }
}
