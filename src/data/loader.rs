use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value as JsonValue;

use super::model::{Column, Dataset};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a tabular dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row with column names, one record per row
/// * `.json` – records-oriented array: `[{ "col": value, ... }, ...]`
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Write a dataset back out as CSV.  Missing cells become empty fields.
pub fn export_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;

    writer
        .write_record(dataset.columns.iter().map(|c| c.name.as_str()))
        .context("writing CSV header")?;

    for row in 0..dataset.n_rows() {
        let record: Vec<String> = dataset
            .columns
            .iter()
            .map(|c| c.cell_to_string(row))
            .collect();
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {row}"))?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse a CSV file with a header row into a [`Dataset`].
///
/// Column types are inferred over all rows: a column is numeric when every
/// non-empty cell parses as a float, otherwise it is text.  Empty cells are
/// missing values either way.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    check_unique_names(&headers)?;

    // Collect cells column-wise as raw strings, then infer each column's type.
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, found {}",
                headers.len(),
                record.len()
            );
        }
        for (col_idx, value) in record.iter().enumerate() {
            cells[col_idx].push(value.trim().to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| infer_column(name, &raw))
        .collect();

    Ok(Dataset::from_columns(columns))
}

/// Build a typed column from raw string cells.
fn infer_column(name: String, raw: &[String]) -> Column {
    let numeric = raw
        .iter()
        .filter(|s| !s.is_empty())
        .all(|s| s.parse::<f64>().is_ok());
    let has_values = raw.iter().any(|s| !s.is_empty());

    if numeric && has_values {
        Column::numeric(name, raw.iter().map(|s| parse_cell(s)).collect())
    } else {
        Column::text(
            name,
            raw.iter()
                .map(|s| (!s.is_empty()).then(|| s.clone()))
                .collect(),
        )
    }
}

/// Parse one numeric cell.  Empty cells and non-finite values (a literal
/// `NaN`/`inf` in the file) are normalised to missing so the clipping engine
/// only ever sees finite numbers.
fn parse_cell(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "height": 1.72, "city": "Porto", "age": 31 },
///   { "height": null, "city": "Lisboa", "age": 28 }
/// ]
/// ```
///
/// Columns appear in first-seen order.  A key whose present values are all
/// numbers becomes a numeric column; anything mixed falls back to text.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
    }

    let null = JsonValue::Null;
    let columns = names
        .into_iter()
        .map(|name| {
            // Every record was checked to be an object above.
            let values: Vec<&JsonValue> = records
                .iter()
                .filter_map(|rec| rec.as_object())
                .map(|obj| obj.get(&name).unwrap_or(&null))
                .collect();
            json_column(name, &values)
        })
        .collect();

    Ok(Dataset::from_columns(columns))
}

fn json_column(name: String, values: &[&JsonValue]) -> Column {
    let numeric = values
        .iter()
        .filter(|v| !v.is_null())
        .all(|v| v.is_number());
    let has_values = values.iter().any(|v| !v.is_null());

    if numeric && has_values {
        Column::numeric(
            name,
            values
                .iter()
                .map(|v| v.as_f64().filter(|x| x.is_finite()))
                .collect(),
        )
    } else {
        Column::text(
            name,
            values
                .iter()
                .map(|v| match v {
                    JsonValue::Null => None,
                    JsonValue::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_unique_names(names: &[String]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            bail!("Duplicate column name '{name}'");
        }
    }
    Ok(())
}
