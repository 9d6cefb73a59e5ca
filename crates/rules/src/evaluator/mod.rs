//! Expression evaluator: one rule expression → one boolean mask over all rows.
//!
//! The grammar is a fixed, ordered table of patterns. The first entry that
//! applies to the expression decides how it is evaluated. Only the whole
//! expression is trimmed, and `||` parts; an `AND` part with stray spaces
//! matches no pattern and is all-false.
//!
//!
//! 1. `duplicate(<col>)`
//! 2. `high_cardinality(<col>)`
//! 3. `full_name in [..]`
//! 4. `<col> is not null`
//! 5. contains `" AND "` → split, evaluate parts, AND the masks
//! 6. contains `"||"` → split, trim parts, evaluate, OR the masks
//! 7. `<col> in [..]`
//! 8. `<col> <op> <value>` with `op` in `==, >=, <=, >, <`
//!
//! Anything else yields an all-false mask. Because the splits sit between
//! the atomic patterns, `A || B AND C` evaluates as `(A || B) AND C`.

mod predicates;

#[cfg(test)]
mod tests;

use std::sync::LazyLock;

use regex::{Captures, Regex};
use riskscore_core::config::ScoringConfig;
use riskscore_dataset::Dataset;
use tracing::trace;

/// Per-row boolean vector produced by one expression.
pub type Mask = Vec<bool>;

/// Errors raised while evaluating a single rule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("unknown comparison operator '{0}'")]
    UnknownOperator(String),

    #[error("mask has {found} rows, dataset has {expected}")]
    MaskLength { expected: usize, found: usize },
}

/// Everything an expression can look at.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub dataset: &'a Dataset,
    /// Normalized full name for every row (empty when no name column exists).
    pub full_names: &'a [String],
    pub config: &'a ScoringConfig,
}

impl EvalContext<'_> {
    pub fn rows(&self) -> usize {
        self.dataset.len()
    }

    pub(crate) fn all(&self, value: bool) -> Mask {
        vec![value; self.rows()]
    }
}

/// Turns an expression into a mask. The scoring aggregator is generic over
/// this so callers can plug in alternative grammars.
pub trait MaskEvaluator {
    fn evaluate(&self, expression: &str, ctx: &EvalContext<'_>) -> Result<Mask, EvalError>;
}

/// The built-in rule grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionEvaluator;

impl MaskEvaluator for ExpressionEvaluator {
    fn evaluate(&self, expression: &str, ctx: &EvalContext<'_>) -> Result<Mask, EvalError> {
        let mask = evaluate_expression(expression.trim(), ctx)?;
        if mask.len() != ctx.rows() {
            return Err(EvalError::MaskLength {
                expected: ctx.rows(),
                found: mask.len(),
            });
        }
        Ok(mask)
    }
}

// ── Grammar table ───────────────────────────────────────────────────

type AtomicHandler = fn(&Captures<'_>, &EvalContext<'_>) -> Result<Mask, EvalError>;

enum Pattern {
    /// Whole-expression regex; its captures feed the handler.
    Atomic {
        name: &'static str,
        regex: Regex,
        handler: AtomicHandler,
    },
    /// Expression contains `separator`: evaluate each part and fold the masks.
    Split {
        name: &'static str,
        separator: &'static str,
        trim_parts: bool,
        fold: fn(bool, bool) -> bool,
    },
}

impl Pattern {
    fn atomic(name: &'static str, pattern: &str, handler: AtomicHandler) -> Self {
        let regex = Regex::new(pattern).unwrap_or_else(|e| panic!("invalid {name} pattern: {e}"));
        Pattern::Atomic { name, regex, handler }
    }
}

static GRAMMAR: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    vec![
        Pattern::atomic("duplicate", r"^duplicate\(([^)]+)\)$", predicates::duplicate),
        Pattern::atomic(
            "high_cardinality",
            r"^high_cardinality\(([^)]+)\)$",
            predicates::high_cardinality,
        ),
        Pattern::atomic("full_name_in", r"^full_name in \[(.*)\]$", predicates::full_name_in),
        Pattern::atomic("is_not_null", r"^([A-Za-z0-9_]+) is not null$", predicates::is_not_null),
        Pattern::Split {
            name: "and",
            separator: " AND ",
            trim_parts: false,
            fold: |a, b| a && b,
        },
        Pattern::Split {
            name: "or",
            separator: "||",
            trim_parts: true,
            fold: |a, b| a || b,
        },
        Pattern::atomic("column_in", r"^([A-Za-z0-9_]+) in \[(.*)\]$", predicates::column_in),
        Pattern::atomic(
            "comparison",
            r"^([A-Za-z0-9_]+)\s*(==|>=|<=|>|<)\s*(.+)$",
            predicates::comparison,
        ),
    ]
});

/// Evaluate an expression against the grammar table, as given.
pub fn evaluate_expression(expression: &str, ctx: &EvalContext<'_>) -> Result<Mask, EvalError> {
    for pattern in GRAMMAR.iter() {
        match pattern {
            Pattern::Atomic { name, regex, handler } => {
                if let Some(caps) = regex.captures(expression) {
                    trace!(pattern = name, expression, "matched atomic pattern");
                    return handler(&caps, ctx);
                }
            }
            Pattern::Split {
                name,
                separator,
                trim_parts,
                fold,
            } => {
                if expression.contains(separator) {
                    trace!(pattern = name, expression, "splitting expression");
                    return evaluate_split(expression, separator, *trim_parts, *fold, ctx);
                }
            }
        }
    }

    trace!(expression, "no pattern matched");
    Ok(ctx.all(false))
}

fn evaluate_split(
    expression: &str,
    separator: &str,
    trim_parts: bool,
    fold: fn(bool, bool) -> bool,
    ctx: &EvalContext<'_>,
) -> Result<Mask, EvalError> {
    let mut parts = expression
        .split(separator)
        .map(|part| if trim_parts { part.trim() } else { part });

    let first = parts.next().unwrap_or_default();
    let mut acc = evaluate_expression(first, ctx)?;
    for part in parts {
        let mask = evaluate_expression(part, ctx)?;
        acc.iter_mut().zip(mask).for_each(|(a, b)| *a = fold(*a, b));
    }
    Ok(acc)
}

/// Split a `[a, "b c", 'd']` list body into literals with surrounding quotes removed.
pub(crate) fn parse_literal_list(body: &str) -> Vec<String> {
    body.split(',')
        .map(|item| strip_quotes(item).to_string())
        .collect()
}

/// Trim whitespace, then any run of double quotes, then any run of single quotes.
pub(crate) fn strip_quotes(raw: &str) -> &str {
    raw.trim().trim_matches('"').trim_matches('\'')
}
