use serde::{Deserialize, Serialize};

/// Risk bucket derived from an integer score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Critical => write!(f, "Critical"),
        }
    }
}

/// Score thresholds, strictly descending. Scores below the last one are `Low`.
pub const SCORE_BUCKETS: &[(i64, RiskLevel)] = &[
    (60, RiskLevel::Critical),
    (40, RiskLevel::High),
    (20, RiskLevel::Medium),
];

/// Return the level of the first threshold the score reaches.
pub fn bucket_score(score: i64, buckets: &[(i64, RiskLevel)]) -> RiskLevel {
    buckets
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map(|(_, level)| *level)
        .unwrap_or(RiskLevel::Low)
}
