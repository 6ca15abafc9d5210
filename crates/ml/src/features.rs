//! Building a [`Dataset`] from a polars frame.

use ndarray::{Array1, Array2};
use polars::prelude::*;
use teburu_models::{Dataset, Result, TeburuError};

/// Every column except `target` becomes a feature, in frame order.
///
/// Columns are cast to `f64`; nulls, or values that cannot be cast, are an
/// error rather than being imputed.
pub fn dataset_from_frame(df: &DataFrame, target: &str) -> Result<Dataset> {
    let feature_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .filter(|name| name.as_str() != target)
        .map(|name| name.to_string())
        .collect();

    let target_column = df
        .column(target)
        .map_err(|_| TeburuError::InvalidData(format!("target column `{target}` not found")))?;
    let targets = Array1::from_vec(column_values(target_column)?);

    let columns: Vec<Vec<f64>> = feature_names
        .iter()
        .map(|name| column_values(df.column(name).map_err(frame_error)?))
        .collect::<Result<_>>()?;

    let features = Array2::from_shape_fn((df.height(), columns.len()), |(row, col)| columns[col][row]);
    Dataset::new(features, targets)?.with_feature_names(feature_names)
}

fn column_values(column: &Column) -> Result<Vec<f64>> {
    let name = column.name().to_string();
    let values = column.strict_cast(&DataType::Float64).map_err(|e| {
        TeburuError::InvalidData(format!("column `{name}` is not numeric: {e}"))
    })?;
    if values.null_count() > 0 {
        return Err(TeburuError::InvalidData(format!(
            "column `{name}` has {} null values",
            values.null_count()
        )));
    }
    Ok(values.f64().map_err(frame_error)?.into_no_null_iter().collect())
}

/// polars failures surface as [`TeburuError::Frame`].
pub(crate) fn frame_error(err: PolarsError) -> TeburuError {
    TeburuError::Frame(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("age".into(), &[50.0, 61.0, 35.0, 47.0]).into(),
            Series::new("visits".into(), &[1i32, 4, 2, 3]).into(),
            Series::new("target".into(), &[0.0, 1.0, 0.0, 1.0]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_dataset_from_frame() {
        let dataset = dataset_from_frame(&frame(), "target").unwrap();
        assert_eq!(dataset.n_samples(), 4);
        assert_eq!(dataset.feature_names(), ["age", "visits"]);
        assert_eq!(dataset.features()[[1, 1]], 4.0);
        assert_eq!(dataset.targets()[3], 1.0);
    }

    #[test]
    fn test_missing_target() {
        assert!(matches!(
            dataset_from_frame(&frame(), "label"),
            Err(TeburuError::InvalidData(_))
        ));
    }

    #[test]
    fn test_nulls_rejected() {
        let df = DataFrame::new(vec![
            Series::new("x".into(), &[Some(1.0), None, Some(3.0)]).into(),
            Series::new("y".into(), &[1.0, 2.0, 3.0]).into(),
        ])
        .unwrap();
        assert!(matches!(dataset_from_frame(&df, "y"), Err(TeburuError::InvalidData(_))));
    }

    #[test]
    fn test_polars_errors_become_frame_errors() {
        let err = frame().column("missing").map(|_| ()).map_err(frame_error).unwrap_err();
        match err {
            TeburuError::Frame(message) => assert!(message.contains("missing"), "{message}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_text_column_rejected() {
        let df = DataFrame::new(vec![
            Series::new("x".into(), &["a", "b"]).into(),
            Series::new("y".into(), &[1.0, 2.0]).into(),
        ])
        .unwrap();
        assert!(dataset_from_frame(&df, "y").is_err());
    }
}
