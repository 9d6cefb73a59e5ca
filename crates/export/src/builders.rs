//! Build typed Arrow arrays from [`FieldValue`] columns.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, StringBuilder};
use arrow::datatypes::DataType;
use riskscore_core::FieldValue;

/// Build one Arrow array of `data_type` from a dataset column.
///
/// Values that do not fit the target type become NULL; `column_type` only
/// picks a numeric or boolean type when every non-null value fits.
pub(crate) fn build_array(values: &[FieldValue], data_type: &DataType) -> ArrayRef {
    let rows = values.len();
    match data_type {
        DataType::Int64 => {
            let mut builder = Int64Builder::with_capacity(rows);
            for value in values {
                match value {
                    FieldValue::Integer(i) => builder.append_value(*i),
                    _ => builder.append_null(),
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Float64 => {
            let mut builder = Float64Builder::with_capacity(rows);
            for value in values {
                match value {
                    FieldValue::Integer(_) | FieldValue::Float(_) => {
                        builder.append_option(value.as_f64())
                    }
                    _ => builder.append_null(),
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Boolean => {
            let mut builder = BooleanBuilder::with_capacity(rows);
            for value in values {
                match value {
                    FieldValue::Boolean(b) => builder.append_value(*b),
                    _ => builder.append_null(),
                }
            }
            Arc::new(builder.finish())
        }
        // Default: UTF-8 string
        _ => {
            let mut builder = StringBuilder::with_capacity(rows, rows * 16);
            for value in values {
                builder.append_option(value.to_text());
            }
            Arc::new(builder.finish())
        }
    }
}

/// Non-null text column.
pub(crate) fn string_array<'a>(values: impl Iterator<Item = &'a str>) -> ArrayRef {
    let mut builder = StringBuilder::new();
    for value in values {
        builder.append_value(value);
    }
    Arc::new(builder.finish())
}

/// Non-null integer column.
pub(crate) fn int_array(values: &[i64]) -> ArrayRef {
    let mut builder = Int64Builder::with_capacity(values.len());
    builder.append_slice(values);
    Arc::new(builder.finish())
}
