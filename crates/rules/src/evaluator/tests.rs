//! Tests for the expression grammar.

use riskscore_core::config::ScoringConfig;
use riskscore_core::{normalize_name, FieldValue};
use riskscore_dataset::Dataset;

use super::*;

fn ints(values: &[i64]) -> Vec<FieldValue> {
    values.iter().map(|v| FieldValue::Integer(*v)).collect()
}

fn texts(values: &[&str]) -> Vec<FieldValue> {
    values.iter().map(|v| FieldValue::Text(v.to_string())).collect()
}

/// Evaluate against a dataset with no name column.
fn eval(dataset: &Dataset, expression: &str) -> Mask {
    let names = vec![String::new(); dataset.len()];
    eval_named(dataset, &names, expression)
}

fn eval_named(dataset: &Dataset, names: &[String], expression: &str) -> Mask {
    let config = ScoringConfig::default();
    let ctx = EvalContext {
        dataset,
        full_names: names,
        config: &config,
    };
    ExpressionEvaluator.evaluate(expression, &ctx).unwrap()
}

fn people() -> Dataset {
    Dataset::from_columns(
        vec![
            ("Age", ints(&[70, 40, 80, 65])),
            ("Country", texts(&["ES", "ES", "PT", "es"])),
            (
                "PolicyNumber",
                vec![
                    FieldValue::Text("P-1".into()),
                    FieldValue::Null,
                    FieldValue::Text("P-1".into()),
                    FieldValue::Text("P-9".into()),
                ],
            ),
        ],
        "people.csv",
    )
}

// ── Atomic predicates ───────────────────────────────────────────────

#[test]
fn duplicate_flags_every_occurrence() {
    let ds = Dataset::from_columns(vec![("c", ints(&[1, 1, 2, 3, 3, 3]))], "d.csv");
    assert_eq!(eval(&ds, "duplicate(c)"), vec![true, true, false, true, true, true]);
}

#[test]
fn duplicate_compares_large_integers_exactly() {
    let ds = Dataset::from_columns(
        vec![("Card", ints(&[9_007_199_254_740_992, 9_007_199_254_740_993]))],
        "cards.csv",
    );
    assert_eq!(eval(&ds, "duplicate(Card)"), vec![false, false]);

    let ds = Dataset::from_columns(
        vec![(
            "Card",
            vec![
                FieldValue::Integer(4),
                FieldValue::Float(4.0),
                FieldValue::Float(4.5),
            ],
        )],
        "cards.csv",
    );
    assert_eq!(eval(&ds, "duplicate(Card)"), vec![true, true, false]);
}

#[test]
fn high_cardinality_counts_large_integers_exactly() {
    let base = 9_007_199_254_740_992;
    let values: Vec<i64> = (0..101).map(|i| base + i).collect();
    let ds = Dataset::from_columns(vec![("Card", ints(&values))], "cards.csv");
    assert_eq!(eval(&ds, "high_cardinality(Card)"), vec![true; 101]);
}

#[test]
fn source_file_is_addressable() {
    let a = Dataset::from_columns(vec![("x", ints(&[1, 2]))], "a.csv");
    assert_eq!(eval(&a, "__source_file == a.csv"), vec![true, true]);
    assert_eq!(eval(&a, "__source_file in [a.csv, b.csv]"), vec![true, true]);
    assert_eq!(eval(&a, "__source_file is not null"), vec![true, true]);
    assert_eq!(eval(&a, "duplicate(__source_file)"), vec![true, true]);
    assert_eq!(eval(&a, "__source_file == b.csv"), vec![false, false]);
}

#[test]
fn duplicate_trims_column_name_and_handles_missing_column() {
    let ds = people();
    assert_eq!(eval(&ds, "duplicate( PolicyNumber )"), vec![true, false, true, false]);
    assert_eq!(eval(&ds, "duplicate(Nope)"), vec![false; 4]);
}

#[test]
fn high_cardinality_needs_ratio_and_row_count() {
    // 101 rows, 99 distinct
    let mut values: Vec<i64> = (0..99).collect();
    values.extend([0, 1]);
    let ds = Dataset::from_columns(vec![("id", ints(&values))], "h.csv");
    assert_eq!(eval(&ds, "high_cardinality(id)"), vec![true; 101]);

    // 100 rows, 99 distinct: ratio passes, row gate fails
    let mut values: Vec<i64> = (0..99).collect();
    values.push(0);
    let ds = Dataset::from_columns(vec![("id", ints(&values))], "h.csv");
    assert_eq!(eval(&ds, "high_cardinality(id)"), vec![false; 100]);

    assert_eq!(eval(&ds, "high_cardinality(missing)"), vec![false; 100]);
}

#[test]
fn high_cardinality_on_empty_dataset() {
    let ds = Dataset::from_columns(vec![("id", Vec::new())], "e.csv");
    assert!(eval(&ds, "high_cardinality(id)").is_empty());
}

#[test]
fn full_name_in_normalizes_both_sides() {
    let ds = Dataset::from_columns(vec![("x", ints(&[1, 2, 3]))], "n.csv");
    let names: Vec<String> = ["  jan   pereira ", "JAN PEREIRA", "Ana Silva"]
        .iter()
        .map(|n| normalize_name(n))
        .collect();

    assert_eq!(
        eval_named(&ds, &names, r#"full_name in ["Jan Pereira"]"#),
        vec![true, true, false]
    );
    assert_eq!(
        eval_named(&ds, &names, r#"full_name in ['ana  silva', "nobody"]"#),
        vec![false, false, true]
    );
}

#[test]
fn is_not_null() {
    let ds = people();
    assert_eq!(eval(&ds, "PolicyNumber is not null"), vec![true, false, true, true]);
    assert_eq!(eval(&ds, "Missing is not null"), vec![false; 4]);
}

#[test]
fn column_in_is_case_sensitive() {
    let ds = people();
    assert_eq!(eval(&ds, r#"Country in ["ES", 'FR']"#), vec![true, true, false, false]);
    assert_eq!(eval(&ds, "Age in [70, 80]"), vec![true, false, true, false]);
    assert_eq!(eval(&ds, "Nope in [1]"), vec![false; 4]);
}

#[test]
fn numeric_comparisons() {
    let ds = people();
    assert_eq!(eval(&ds, "Age > 60"), vec![true, false, true, true]);
    assert_eq!(eval(&ds, "Age>=70"), vec![true, false, true, false]);
    assert_eq!(eval(&ds, "Age < 65"), vec![false, true, false, false]);
    assert_eq!(eval(&ds, "Age <= 40"), vec![false, true, false, false]);
    assert_eq!(eval(&ds, "Age == 80.0"), vec![false, false, true, false]);
}

#[test]
fn numeric_literal_coerces_text_column() {
    let ds = Dataset::from_columns(
        vec![("Amount", texts(&["100", "abc", " 250.5", ""]))],
        "t.csv",
    );
    assert_eq!(eval(&ds, "Amount > 99"), vec![true, false, true, false]);
}

#[test]
fn string_literal_supports_only_equality() {
    let ds = people();
    assert_eq!(eval(&ds, r#"Country == "ES""#), vec![true, true, false, false]);
    assert_eq!(eval(&ds, "Country == 'PT'"), vec![false, false, true, false]);
    assert_eq!(eval(&ds, "Country > ES"), vec![false; 4]);
}

#[test]
fn comparison_on_missing_column_is_false() {
    assert_eq!(eval(&people(), "Salary > 10"), vec![false; 4]);
}

// ── Logical splits ──────────────────────────────────────────────────

#[test]
fn and_conjunction() {
    let ds = people();
    assert_eq!(
        eval(&ds, r#"Age > 60 AND Country == "ES""#),
        vec![true, false, false, false]
    );
}

#[test]
fn and_parts_are_not_trimmed() {
    let ds = people();
    assert_eq!(eval(&ds, "Age > 60 AND  Country == ES"), vec![false; 4]);
    assert_eq!(eval(&ds, "  Age > 60 AND Country == ES  "), vec![true, false, false, false]);
}

#[test]
fn or_disjunction_trims_parts() {
    let ds = people();
    assert_eq!(eval(&ds, "Age < 50||Country == PT"), vec![false, true, true, false]);
}

#[test]
fn and_split_happens_before_or_split() {
    let ds = people();
    // (Age < 50 || Age > 75) AND Country == ES
    assert_eq!(
        eval(&ds, "Age < 50 || Age > 75 AND Country == ES"),
        vec![false, true, false, false]
    );
}

#[test]
fn atomic_patterns_win_over_splits() {
    let ds = people();
    let names = vec![normalize_name("A AND B"), String::new(), String::new(), String::new()];
    assert_eq!(
        eval_named(&ds, &names, r#"full_name in ["a AND b"]"#),
        vec![true, false, false, false]
    );
}

#[test]
fn lowercase_and_is_not_a_split() {
    let ds = people();
    // Falls through to the comparison pattern with literal `60 and Age < 90`,
    // which is not numeric, so `>` gives all-false.
    assert_eq!(eval(&ds, "Age > 60 and Age < 90"), vec![false; 4]);
}

// ── Fallbacks ───────────────────────────────────────────────────────

#[test]
fn unknown_expression_is_all_false() {
    let ds = people();
    assert_eq!(eval(&ds, "something weird"), vec![false; 4]);
    assert_eq!(eval(&ds, ""), vec![false; 4]);
    assert_eq!(eval(&ds, "NOT duplicate(Age)"), vec![false; 4]);
}

#[test]
fn literal_list_parsing() {
    assert_eq!(
        parse_literal_list(r#" a, "b c" ,'d', "#),
        vec!["a", "b c", "d", ""]
    );
}

#[test]
fn unknown_operator_is_an_error() {
    assert_eq!(
        "=~".parse::<predicates::CompareOp>(),
        Err(EvalError::UnknownOperator("=~".to_string()))
    );
}
