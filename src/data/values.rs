//! Column value helpers shared by statistics and charts.

use polars::prelude::*;

/// Integer and floating dtypes count as numeric.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Render a cell for display. Strings are shown without quotes.
pub fn format_any_value(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => "null".to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Cast a column to f64. Nulls and NaNs both become `None`.
pub fn column_to_f64(column: &Column) -> PolarsResult<Vec<Option<f64>>> {
    let casted = column.cast(&DataType::Float64)?;
    let values = casted
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// String form of every cell, `None` for nulls.
pub fn column_to_labels(column: &Column) -> PolarsResult<Vec<Option<String>>> {
    let casted = column.cast(&DataType::String)?;
    let values = casted
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_dtypes() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float32));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
        assert!(is_float_dtype(&DataType::Float64));
        assert!(!is_float_dtype(&DataType::Int32));
    }

    #[test]
    fn f64_conversion_drops_nan() {
        let column = Column::new("v".into(), [Some(1.5), None, Some(f64::NAN)]);
        assert_eq!(column_to_f64(&column).unwrap(), vec![Some(1.5), None, None]);

        let ints = Column::new("i".into(), [1i64, 2, 3]);
        assert_eq!(
            column_to_f64(&ints).unwrap(),
            vec![Some(1.0), Some(2.0), Some(3.0)]
        );
    }

    #[test]
    fn labels_keep_nulls() {
        let column = Column::new("s".into(), [Some("a"), None, Some("c")]);
        assert_eq!(
            column_to_labels(&column).unwrap(),
            vec![Some("a".to_string()), None, Some("c".to_string())]
        );
    }

    #[test]
    fn strings_display_without_quotes() {
        assert_eq!(format_any_value(&AnyValue::String("abc")), "abc");
        assert_eq!(format_any_value(&AnyValue::Int64(42)), "42");
        assert_eq!(format_any_value(&AnyValue::Null), "null");
    }
}
