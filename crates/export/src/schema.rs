//! Arrow type selection for dataset columns.

use arrow::datatypes::DataType;
use riskscore_core::FieldValue;

/// Pick the Arrow type a column is written as.
///
/// Nulls are ignored. Integers stay `Int64`; integers mixed with floats widen
/// to `Float64`; all-boolean columns stay `Boolean`. Anything else, including
/// an all-null column, is written as `Utf8` text.
pub(crate) fn column_type(values: &[FieldValue]) -> DataType {
    let mut ints = false;
    let mut floats = false;
    let mut bools = false;
    let mut text = false;

    for value in values {
        match value {
            FieldValue::Integer(_) => ints = true,
            FieldValue::Float(_) => floats = true,
            FieldValue::Boolean(_) => bools = true,
            FieldValue::Text(_) => text = true,
            FieldValue::Null => {}
        }
    }

    match (ints, floats, bools, text) {
        (true, false, false, false) => DataType::Int64,
        (_, true, false, false) => DataType::Float64,
        (false, false, true, false) => DataType::Boolean,
        _ => DataType::Utf8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_mapping() {
        use FieldValue::*;

        assert_eq!(column_type(&[Integer(1), Null, Integer(3)]), DataType::Int64);
        assert_eq!(column_type(&[Integer(1), Float(2.5)]), DataType::Float64);
        assert_eq!(column_type(&[Float(2.5), Null]), DataType::Float64);
        assert_eq!(column_type(&[Boolean(true), Null]), DataType::Boolean);
        assert_eq!(column_type(&[Boolean(true), Integer(1)]), DataType::Utf8);
        assert_eq!(column_type(&[Text("a".into()), Integer(1)]), DataType::Utf8);
        assert_eq!(column_type(&[Null, Null]), DataType::Utf8);
        assert_eq!(column_type(&[]), DataType::Utf8);
    }
}
