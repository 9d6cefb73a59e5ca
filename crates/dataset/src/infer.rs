//! Per-column type inference for raw CSV cells.

use riskscore_core::config::DatasetConfig;
use riskscore_core::FieldValue;

/// Inferred type of one column within a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
    /// Every cell is null.
    Empty,
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Pick the narrowest type every non-null cell parses as.
pub fn infer_type<'a>(cells: impl Iterator<Item = &'a str> + Clone) -> ColumnType {
    let mut non_null = cells.peekable();
    if non_null.peek().is_none() {
        return ColumnType::Empty;
    }
    let all = |pred: fn(&str) -> bool| non_null.clone().all(pred);

    if all(|s| s.trim().parse::<i64>().is_ok()) {
        ColumnType::Integer
    } else if all(|s| s.trim().parse::<f64>().is_ok()) {
        ColumnType::Float
    } else if all(|s| parse_bool(s).is_some()) {
        ColumnType::Boolean
    } else {
        ColumnType::Text
    }
}

fn present<'a>(cell: Option<&'a str>, config: &DatasetConfig) -> Option<&'a str> {
    cell.filter(|s| !config.is_na(s))
}

/// Convert a raw column into typed values. NA tokens and padding become `Null`.
pub fn build_column(raw: &[Option<&str>], config: &DatasetConfig) -> Vec<FieldValue> {
    let column_type = infer_type(raw.iter().filter_map(|cell| present(*cell, config)));

    raw.iter()
        .map(|cell| match present(*cell, config) {
            None => FieldValue::Null,
            Some(s) => match column_type {
                ColumnType::Integer => s
                    .trim()
                    .parse::<i64>()
                    .map(FieldValue::Integer)
                    .unwrap_or(FieldValue::Null),
                ColumnType::Float => s
                    .trim()
                    .parse::<f64>()
                    .map(FieldValue::Float)
                    .unwrap_or(FieldValue::Null),
                ColumnType::Boolean => parse_bool(s).map(FieldValue::Boolean).unwrap_or(FieldValue::Null),
                ColumnType::Text | ColumnType::Empty => FieldValue::Text(s.to_string()),
            },
        })
        .collect()
}
