use serde::{Deserialize, Serialize};

/// Typed cell value. Source data arrives as strings; columns keep the type they were inferred as.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl FieldValue {
    /// Extract as string, returning None for anything but Text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Null, or a float that is not a number.
    pub fn is_missing(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Numeric coercion. Text is parsed leniently; anything unparsable is `None`
    /// and compares false against every numeric literal.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            FieldValue::Null => None,
        }
    }

    /// Textual form used by string comparisons and delimited export.
    ///
    /// Whole floats keep a trailing `.0` and booleans render as `True`/`False`,
    /// matching how the source CSVs are usually produced. Null has no textual form.
    pub fn to_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(format_float(*f)),
            FieldValue::Boolean(true) => Some("True".to_string()),
            FieldValue::Boolean(false) => Some("False".to_string()),
            FieldValue::Null => None,
        }
    }

    /// Hashable identity of the value, used for duplicate and distinct counts.
    ///
    /// Integers compare exactly. A whole float inside the `i64` range shares
    /// the key of the equal integer.
    pub fn key(&self) -> ValueKey {
        match self {
            FieldValue::Text(s) => ValueKey::Text(s.clone()),
            FieldValue::Integer(i) => ValueKey::Int(*i),
            FieldValue::Float(f) if f.is_nan() => ValueKey::Null,
            FieldValue::Float(f) if f.fract() == 0.0 && (I64_MIN_F..I64_MAX_F).contains(f) => {
                ValueKey::Int(*f as i64)
            }
            FieldValue::Float(f) => ValueKey::Float(f.to_bits()),
            FieldValue::Boolean(b) => ValueKey::Boolean(*b),
            FieldValue::Null => ValueKey::Null,
        }
    }
}

/// See [`FieldValue::key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Text(String),
    Int(i64),
    /// Bit pattern of a non-integral or out-of-range float.
    Float(u64),
    Boolean(bool),
    Null,
}

// -2^63 is exact; 2^63 is the first float past i64::MAX.
const I64_MIN_F: f64 = -9_223_372_036_854_775_808.0;
const I64_MAX_F: f64 = 9_223_372_036_854_775_808.0;

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else if f.is_nan() {
        "nan".to_string()
    } else {
        f.to_string()
    }
}
