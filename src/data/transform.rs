use thiserror::Error;

use super::model::{Column, ColumnValues, Dataset};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Validation failures of the clipping engine. None of these are recoverable
/// inside the engine; the caller decides how to surface them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransformError {
    #[error("column '{0}' does not exist or is not numeric")]
    InvalidColumn(String),
    #[error("no columns selected for clipping")]
    EmptyColumnSet,
    #[error("sensitivity factor k must be non-negative, got {0}")]
    InvalidParameter(f64),
}

// ---------------------------------------------------------------------------
// Bounds and report types
// ---------------------------------------------------------------------------

/// Accepted value range for one column, derived from its quartiles and `k`.
/// Ephemeral: recomputed on every invocation, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnBounds {
    pub lower: f64,
    pub upper: f64,
}

/// Impact of clipping one column: how many cells fell outside the bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRecord {
    pub column: String,
    pub affected: usize,
}

/// One record per processed column, in the order the columns were requested.
pub type ClipReport = Vec<ClipRecord>;

// ---------------------------------------------------------------------------
// Quantiles
// ---------------------------------------------------------------------------

/// Percentile of a sorted, non-empty slice with linear interpolation between
/// ranks (`rank = p/100 * (n-1)`), the convention pandas and numpy default to.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    debug_assert!((0.0..=100.0).contains(&p));

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let floor = rank.floor() as usize;
    let fraction = rank - floor as f64;

    if floor + 1 >= sorted.len() {
        sorted[sorted.len() - 1]
    } else {
        sorted[floor] + (sorted[floor + 1] - sorted[floor]) * fraction
    }
}

/// Compute the accepted range `[Q1 - k*IQR, Q3 + k*IQR]` for one column.
/// Missing cells are ignored; returns `None` when the column has no values
/// at all (nothing to derive bounds from, so nothing will be clipped).
pub fn column_bounds(values: &[Option<f64>], k: f64) -> Option<ColumnBounds> {
    let mut present: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    if present.is_empty() {
        return None;
    }
    present.sort_by(f64::total_cmp);

    let q1 = percentile(&present, 25.0);
    let q3 = percentile(&present, 75.0);
    let iqr = q3 - q1;

    Some(ColumnBounds {
        lower: q1 - k * iqr,
        upper: q3 + k * iqr,
    })
}

// ---------------------------------------------------------------------------
// Clipping
// ---------------------------------------------------------------------------

/// Clip outliers in the requested columns of `dataset`.
///
/// For every requested column the quartiles Q1/Q3 of the non-missing cells
/// give the accepted range `[Q1 - k*IQR, Q3 + k*IQR]`; cells outside it are
/// replaced by the nearest bound, everything else (missing cells included)
/// is left untouched. Columns are processed independently.
///
/// Returns a new dataset plus a [`ClipReport`] with the per-column count of
/// cells that were out of range, in request order. The input is never
/// mutated, and validation is all-or-nothing: if any requested column is
/// absent or non-numeric, no column is transformed.
pub fn clip_dataset(
    dataset: &Dataset,
    columns: &[String],
    k: f64,
) -> Result<(Dataset, ClipReport), TransformError> {
    if columns.is_empty() {
        return Err(TransformError::EmptyColumnSet);
    }
    if k < 0.0 {
        return Err(TransformError::InvalidParameter(k));
    }

    // Validate every column before touching any of them.
    let mut targets: Vec<(&str, &[Option<f64>])> = Vec::with_capacity(columns.len());
    for name in columns {
        let values = dataset
            .column(name)
            .and_then(Column::as_numeric)
            .ok_or_else(|| TransformError::InvalidColumn(name.clone()))?;
        targets.push((name.as_str(), values));
    }

    let mut out = dataset.clone();
    let mut report = ClipReport::with_capacity(targets.len());

    for (name, values) in targets {
        let mut affected = 0usize;

        let clipped: Vec<Option<f64>> = match column_bounds(values, k) {
            Some(bounds) => values
                .iter()
                .map(|cell| match cell {
                    Some(x) if *x < bounds.lower => {
                        affected += 1;
                        Some(bounds.lower)
                    }
                    Some(x) if *x > bounds.upper => {
                        affected += 1;
                        Some(bounds.upper)
                    }
                    other => *other,
                })
                .collect(),
            // Column is all-missing: nothing to clip.
            None => values.to_vec(),
        };

        if let Some(col) = out.column_mut(name) {
            col.values = ColumnValues::Numeric(clipped);
        }
        report.push(ClipRecord {
            column: name.to_string(),
            affected,
        });
    }

    Ok((out, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric_dataset(name: &str, values: &[f64]) -> Dataset {
        Dataset::from_columns(vec![Column::numeric(
            name,
            values.iter().map(|&v| Some(v)).collect(),
        )])
    }

    fn values_of<'a>(ds: &'a Dataset, name: &str) -> &'a [Option<f64>] {
        ds.column(name).unwrap().as_numeric().unwrap()
    }

    #[test]
    fn textbook_example() {
        // [1..9, 100] with k=1.5: Q1 sits at rank 2.25 → 3.25, Q3 at rank
        // 6.75 → 7.75 (pandas default interpolation), IQR=4.5, bounds
        // [-3.5, 14.5]. Only the 100 is out of range.
        let ds = numeric_dataset(
            "v",
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0],
        );
        let bounds = column_bounds(values_of(&ds, "v"), 1.5).unwrap();
        assert_eq!(bounds.lower, -3.5);
        assert_eq!(bounds.upper, 14.5);

        let (clipped, report) = clip_dataset(&ds, &["v".to_string()], 1.5).unwrap();
        assert_eq!(values_of(&clipped, "v")[9], Some(14.5));
        assert_eq!(&values_of(&clipped, "v")[..9], &values_of(&ds, "v")[..9]);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].column, "v");
        assert_eq!(report[0].affected, 1);
    }

    #[test]
    fn constant_column_is_untouched() {
        let ds = numeric_dataset("c", &[5.0, 5.0, 5.0, 5.0]);
        for k in [0.0, 1.5, 5.0] {
            let (clipped, report) = clip_dataset(&ds, &["c".to_string()], k).unwrap();
            assert_eq!(clipped, ds);
            assert_eq!(report[0].affected, 0);
        }
    }

    #[test]
    fn k_zero_clips_to_quartiles() {
        let values: Vec<Option<f64>> = (1..=5).map(|i| Some(i as f64)).collect();
        let bounds = column_bounds(&values, 0.0).unwrap();
        assert_eq!(bounds.lower, 2.0); // Q1 of [1..5]
        assert_eq!(bounds.upper, 4.0); // Q3 of [1..5]
    }

    #[test]
    fn missing_cells_ignored_and_preserved() {
        let ds = Dataset::from_columns(vec![Column::numeric(
            "v",
            vec![
                Some(1.0),
                None,
                Some(2.0),
                Some(3.0),
                None,
                Some(4.0),
                Some(5.0),
                Some(6.0),
                Some(7.0),
                Some(8.0),
                Some(9.0),
                Some(100.0),
            ],
        )]);
        let (clipped, report) = clip_dataset(&ds, &["v".to_string()], 1.5).unwrap();
        let out = values_of(&clipped, "v");
        assert_eq!(out[1], None);
        assert_eq!(out[4], None);
        // Quartiles come from the ten present values only.
        assert_eq!(out[11], Some(14.5));
        assert_eq!(report[0].affected, 1);
    }

    #[test]
    fn all_missing_column_reports_zero() {
        let ds = Dataset::from_columns(vec![Column::numeric("v", vec![None, None, None])]);
        let (clipped, report) = clip_dataset(&ds, &["v".to_string()], 1.5).unwrap();
        assert_eq!(clipped, ds);
        assert_eq!(report[0].affected, 0);
    }

    #[test]
    fn clipping_is_idempotent() {
        let ds = numeric_dataset("v", &[-50.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 80.0]);
        let cols = vec!["v".to_string()];
        let (once, _) = clip_dataset(&ds, &cols, 1.0).unwrap();
        let (twice, report) = clip_dataset(&once, &cols, 1.0).unwrap();
        assert_eq!(once, twice);
        assert_eq!(report[0].affected, 0);
    }

    #[test]
    fn larger_k_affects_no_more_values() {
        let ds = numeric_dataset("v", &[-30.0, 1.0, 2.0, 3.0, 4.0, 5.0, 20.0, 90.0]);
        let cols = vec!["v".to_string()];
        let mut last_affected = usize::MAX;
        for k in [0.0, 0.5, 1.5, 3.0, 5.0] {
            let (_, report) = clip_dataset(&ds, &cols, k).unwrap();
            assert!(report[0].affected <= last_affected, "k={k}");
            last_affected = report[0].affected;
        }
    }

    #[test]
    fn shape_and_other_columns_preserved() {
        let ds = Dataset::from_columns(vec![
            Column::numeric("a", vec![Some(1.0), Some(2.0), Some(300.0)]),
            Column::text("tag", vec![Some("x".into()), None, Some("y".into())]),
            Column::numeric("b", vec![Some(10.0), Some(11.0), Some(12.0)]),
        ]);
        let (clipped, _) = clip_dataset(&ds, &["a".to_string()], 1.5).unwrap();
        assert_eq!(clipped.n_rows(), ds.n_rows());
        assert_eq!(clipped.column_names(), ds.column_names());
        assert_eq!(clipped.column("tag"), ds.column("tag"));
        assert_eq!(clipped.column("b"), ds.column("b"));
    }

    #[test]
    fn report_follows_request_order() {
        let ds = Dataset::from_columns(vec![
            Column::numeric("a", vec![Some(1.0), Some(2.0)]),
            Column::numeric("b", vec![Some(3.0), Some(4.0)]),
        ]);
        let cols = vec!["b".to_string(), "a".to_string()];
        let (_, report) = clip_dataset(&ds, &cols, 1.5).unwrap();
        let order: Vec<&str> = report.iter().map(|r| r.column.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn input_is_never_mutated() {
        let ds = numeric_dataset("v", &[1.0, 2.0, 3.0, 4.0, 1000.0]);
        let before = ds.clone();
        let _ = clip_dataset(&ds, &["v".to_string()], 1.5).unwrap();
        assert_eq!(ds, before);
    }

    #[test]
    fn unknown_column_is_rejected() {
        let ds = numeric_dataset("v", &[1.0, 2.0, 3.0]);
        let err = clip_dataset(&ds, &["w".to_string()], 1.5).unwrap_err();
        assert_eq!(err, TransformError::InvalidColumn("w".to_string()));
    }

    #[test]
    fn text_column_is_rejected() {
        let ds = Dataset::from_columns(vec![Column::text("tag", vec![Some("x".into())])]);
        let err = clip_dataset(&ds, &["tag".to_string()], 1.5).unwrap_err();
        assert_eq!(err, TransformError::InvalidColumn("tag".to_string()));
    }

    #[test]
    fn partial_failure_transforms_nothing() {
        let ds = Dataset::from_columns(vec![
            Column::numeric("a", vec![Some(1.0), Some(2.0), Some(500.0)]),
            Column::text("tag", vec![Some("x".into()); 3]),
        ]);
        let before = ds.clone();
        let cols = vec!["a".to_string(), "tag".to_string()];
        assert!(clip_dataset(&ds, &cols, 1.5).is_err());
        assert_eq!(ds, before);
    }

    #[test]
    fn empty_column_set_is_rejected() {
        let ds = numeric_dataset("v", &[1.0, 2.0]);
        let err = clip_dataset(&ds, &[], 1.5).unwrap_err();
        assert_eq!(err, TransformError::EmptyColumnSet);
    }

    #[test]
    fn negative_k_is_rejected() {
        let ds = numeric_dataset("v", &[1.0, 2.0]);
        let err = clip_dataset(&ds, &["v".to_string()], -0.5).unwrap_err();
        assert_eq!(err, TransformError::InvalidParameter(-0.5));
    }

    #[test]
    fn percentile_interpolates_between_ranks() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 50.0), 2.5);
        assert_eq!(percentile(&sorted, 100.0), 4.0);
        assert_eq!(percentile(&sorted, 25.0), 1.75);
    }
}
