use std::fmt;

// ---------------------------------------------------------------------------
// ColumnValues – the cells of one column
// ---------------------------------------------------------------------------

/// The cells of a single column. Every column of a dataset has the same
/// length; `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Column – one named column
// ---------------------------------------------------------------------------

/// A named column of a [`Dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Column {
            name: name.into(),
            values: ColumnValues::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Column {
            name: name.into(),
            values: ColumnValues::Text(values),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.values, ColumnValues::Numeric(_))
    }

    /// The cells as numeric values, or `None` for a text column.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.values {
            ColumnValues::Numeric(v) => Some(v),
            ColumnValues::Text(_) => None,
        }
    }

    /// Render one cell for display; missing cells come out empty.
    pub fn cell_to_string(&self, row: usize) -> String {
        match &self.values {
            ColumnValues::Numeric(v) => match v.get(row) {
                Some(Some(x)) => CellDisplay(*x).to_string(),
                _ => String::new(),
            },
            ColumnValues::Text(v) => match v.get(row) {
                Some(Some(s)) => s.clone(),
                _ => String::new(),
            },
        }
    }
}

/// Formats a numeric cell without float noise (`12` rather than `12.0`).
struct CellDisplay(f64);

impl fmt::Display for CellDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// A loaded table: ordered named columns, all the same length. Column names
/// are unique (the loader rejects duplicates) and row order is preserved by
/// every operation on a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub columns: Vec<Column>,
}

impl Dataset {
    pub fn from_columns(columns: Vec<Column>) -> Self {
        debug_assert!(
            columns.windows(2).all(|w| w[0].len() == w[1].len()),
            "all columns must have the same length"
        );
        Dataset { columns }
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// All column names, in dataset order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Names of the numeric columns, in dataset order.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_columns(vec![
            Column::numeric("height", vec![Some(1.0), None, Some(3.0)]),
            Column::text("label", vec![Some("a".into()), Some("b".into()), None]),
            Column::numeric("weight", vec![Some(60.0), Some(70.0), Some(80.0)]),
        ])
    }

    #[test]
    fn shape() {
        let ds = sample();
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.n_columns(), 3);
        assert!(!ds.is_empty());
    }

    #[test]
    fn lookup_by_name() {
        let ds = sample();
        assert!(ds.column("height").is_some());
        assert!(ds.column("nonsense").is_none());
        assert!(ds.column("label").unwrap().as_numeric().is_none());
    }

    #[test]
    fn numeric_columns_in_dataset_order() {
        let ds = sample();
        assert_eq!(ds.numeric_column_names(), vec!["height", "weight"]);
    }

    #[test]
    fn cell_rendering() {
        let ds = sample();
        let height = ds.column("height").unwrap();
        assert_eq!(height.cell_to_string(0), "1");
        assert_eq!(height.cell_to_string(1), "");
        let label = ds.column("label").unwrap();
        assert_eq!(label.cell_to_string(0), "a");
        assert_eq!(label.cell_to_string(2), "");
    }
}
