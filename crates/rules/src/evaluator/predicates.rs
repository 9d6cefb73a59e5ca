//! Atomic predicate handlers. Each one sweeps whole columns at once.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use regex::Captures;
use riskscore_core::{normalize_name, FieldValue, ValueKey};

use super::{parse_literal_list, strip_quotes, EvalContext, EvalError, Mask};

fn capture<'t>(caps: &Captures<'t>, idx: usize) -> &'t str {
    caps.get(idx).map(|m| m.as_str()).unwrap_or_default()
}

/// `duplicate(col)`: every occurrence of a value seen more than once.
pub(super) fn duplicate(caps: &Captures<'_>, ctx: &EvalContext<'_>) -> Result<Mask, EvalError> {
    let Some(column) = ctx.dataset.column(capture(caps, 1).trim()) else {
        return Ok(ctx.all(false));
    };

    let keys: Vec<ValueKey> = column.iter().map(FieldValue::key).collect();
    let mut counts: HashMap<&ValueKey, usize> = HashMap::with_capacity(keys.len());
    for key in &keys {
        *counts.entry(key).or_insert(0) += 1;
    }

    Ok(keys.iter().map(|k| counts[k] > 1).collect())
}

/// `high_cardinality(col)`: one verdict for the whole column, broadcast to every row.
pub(super) fn high_cardinality(
    caps: &Captures<'_>,
    ctx: &EvalContext<'_>,
) -> Result<Mask, EvalError> {
    let Some(column) = ctx.dataset.column(capture(caps, 1).trim()) else {
        return Ok(ctx.all(false));
    };
    let total = column.len();
    if total == 0 {
        return Ok(ctx.all(false));
    }

    let distinct: HashSet<ValueKey> = column
        .iter()
        .filter(|v| !v.is_missing())
        .map(FieldValue::key)
        .collect();
    let ratio = distinct.len() as f64 / total as f64;
    let verdict =
        ratio > ctx.config.high_cardinality_ratio && total > ctx.config.high_cardinality_min_rows;

    Ok(ctx.all(verdict))
}

/// `full_name in [..]`: case- and whitespace-insensitive identity match.
pub(super) fn full_name_in(caps: &Captures<'_>, ctx: &EvalContext<'_>) -> Result<Mask, EvalError> {
    let names: HashSet<String> = parse_literal_list(capture(caps, 1))
        .iter()
        .map(|n| normalize_name(n))
        .collect();

    Ok(ctx.full_names.iter().map(|n| names.contains(n)).collect())
}

/// `col is not null`.
pub(super) fn is_not_null(caps: &Captures<'_>, ctx: &EvalContext<'_>) -> Result<Mask, EvalError> {
    match ctx.dataset.column(capture(caps, 1)) {
        Some(column) => Ok(column.iter().map(|v| !v.is_missing()).collect()),
        None => Ok(ctx.all(false)),
    }
}

/// `col in [..]`: exact, case-sensitive match on the textual form.
pub(super) fn column_in(caps: &Captures<'_>, ctx: &EvalContext<'_>) -> Result<Mask, EvalError> {
    let Some(column) = ctx.dataset.column(capture(caps, 1)) else {
        return Ok(ctx.all(false));
    };
    let values: HashSet<String> = parse_literal_list(capture(caps, 2)).into_iter().collect();

    Ok(column
        .iter()
        .map(|v| v.to_text().is_some_and(|t| values.contains(&t)))
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompareOp {
    Eq,
    Ge,
    Le,
    Gt,
    Lt,
}

impl FromStr for CompareOp {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(CompareOp::Eq),
            ">=" => Ok(CompareOp::Ge),
            "<=" => Ok(CompareOp::Le),
            ">" => Ok(CompareOp::Gt),
            "<" => Ok(CompareOp::Lt),
            other => Err(EvalError::UnknownOperator(other.to_string())),
        }
    }
}

impl CompareOp {
    fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Lt => lhs < rhs,
        }
    }
}

/// `col <op> value`.
///
/// A numeric literal compares the column coerced to numbers; cells that do
/// not coerce are false. A non-numeric literal only supports `==`, as exact
/// string equality on the textual form; other operators give all-false.
pub(super) fn comparison(caps: &Captures<'_>, ctx: &EvalContext<'_>) -> Result<Mask, EvalError> {
    let Some(column) = ctx.dataset.column(capture(caps, 1)) else {
        return Ok(ctx.all(false));
    };
    let op: CompareOp = capture(caps, 2).parse()?;
    let literal = strip_quotes(capture(caps, 3));

    match literal.parse::<f64>() {
        Ok(rhs) => Ok(column
            .iter()
            .map(|v| v.as_f64().is_some_and(|lhs| op.apply(lhs, rhs)))
            .collect()),
        Err(_) if op == CompareOp::Eq => Ok(column
            .iter()
            .map(|v| v.to_text().is_some_and(|t| t == literal))
            .collect()),
        Err(_) => Ok(ctx.all(false)),
    }
}
