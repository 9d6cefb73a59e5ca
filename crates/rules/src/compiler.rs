//! Rule compiler: markdown pipe table → ordered [`RuleSet`].

use std::fs;
use std::path::Path;

use riskscore_core::RiskError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One weighted predicate. Immutable once compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub expression: String,
    pub weight: i64,
    pub description: String,
}

/// Rules in source order. Order only affects reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Drop every rule whose expression exactly equals one of `expressions`.
    pub fn exclude(self, expressions: &[String]) -> Self {
        if expressions.is_empty() {
            return self;
        }
        let before = self.rules.len();
        let rules: Vec<Rule> = self
            .rules
            .into_iter()
            .filter(|r| !expressions.contains(&r.expression))
            .collect();
        info!(excluded = before - rules.len(), "applied rule exclusions");
        Self { rules }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Split a table line into trimmed cells, dropping the empty outer cells
/// produced by the leading and trailing pipes.
fn split_cells(line: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = line.split('|').map(str::trim).collect();
    if cells.first() == Some(&"") {
        cells.remove(0);
    }
    if cells.last() == Some(&"") {
        cells.pop();
    }
    cells
}

/// Parse every pipe-table row after the first (the header) into a rule.
///
/// Rows with fewer than two cells or a weight that is not an integer are
/// dropped without a warning.
pub fn parse_rules(text: &str) -> RuleSet {
    let rules = text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('|'))
        .skip(1)
        .filter_map(|line| {
            let cells = split_cells(line);
            if cells.len() < 2 {
                return None;
            }
            let weight = cells[1].parse::<i64>().ok()?;
            Some(Rule {
                expression: cells[0].to_string(),
                weight,
                description: cells.get(2).map(|d| d.to_string()).unwrap_or_default(),
            })
        })
        .collect();

    RuleSet::new(rules)
}

/// Read and compile a rules file. A missing file is fatal.
pub fn load_rules(path: &Path) -> Result<RuleSet, RiskError> {
    if !path.is_file() {
        return Err(RiskError::RulesNotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    let rules = parse_rules(&text);
    debug!(path = %path.display(), rules = rules.len(), "compiled rules file");
    Ok(rules)
}
