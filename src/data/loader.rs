use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array,
    Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, Record};
use super::schema::SchemaMapping;
use crate::error::LoadError;

/// Rows read from a source before the schema is applied.
struct RawTable {
    columns: Vec<String>,
    records: Vec<Record>,
}

// ---------------------------------------------------------------------------
// Source abstraction
// ---------------------------------------------------------------------------

/// Anything that can produce the session's dataset.
pub trait DatasetSource {
    /// Human-readable name used in messages.
    fn describe(&self) -> String;

    /// Read every row and resolve it against `schema`.
    fn load(&self, schema: &SchemaMapping) -> Result<Dataset, LoadError>;
}

/// A local export of the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self, schema: &SchemaMapping) -> Result<Dataset, LoadError> {
        load_file(&self.path, schema)
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file, dispatching by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one submission per line
/// * `.json`    – `[{ "uid": "...", "e1": 0, "d1": 4.2, ... }, ...]`
/// * `.parquet` – flat columns of strings, numbers, booleans or dates
pub fn load_file(path: &Path, schema: &SchemaMapping) -> Result<Dataset, LoadError> {
    schema.validate()?;
    let name = path.display().to_string();

    let raw = read_table(path, schema).map_err(|e| LoadError::unavailable(&name, &e))?;
    let dataset = resolve(raw, schema, &name)?;

    log::info!(
        "Loaded {} records from {name} using schema '{}'",
        dataset.len(),
        schema.name
    );
    Ok(dataset)
}

fn read_table(path: &Path, schema: &SchemaMapping) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path, &[&schema.subject_id, &schema.examiner_id]),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Check the header against the schema and wrap the rows as a [`Dataset`].
fn resolve(raw: RawTable, schema: &SchemaMapping, name: &str) -> Result<Dataset, LoadError> {
    if raw.records.is_empty() {
        return Err(LoadError::SourceEmpty(name.to_string()));
    }

    for column in [&schema.subject_id, &schema.examiner_id] {
        if !raw.columns.contains(column) {
            return Err(LoadError::MissingColumn {
                column: column.clone(),
                schema: schema.name.clone(),
            });
        }
    }

    let missing_trials: Vec<String> = schema
        .trial_columns()
        .into_iter()
        .filter(|c| !raw.columns.contains(c))
        .collect();
    if !missing_trials.is_empty() {
        log::warn!(
            "{name}: schema '{}' expects trial columns not in the header: {missing_trials:?}",
            schema.name
        );
    }

    Ok(Dataset::new(raw.records, raw.columns, schema.clone()))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, one object per sheet row):
///
/// ```json
/// [
///   { "date": "2024-03-01", "uid": "007", "eid": "E1", "e1": 2, "d1": 10.5 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut cells = BTreeMap::new();
        for (key, val) in obj {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            cells.insert(key.clone(), json_to_cell(val));
        }
        records.push(Record::new(cells));
    }

    Ok(RawTable { columns, records })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) if s.is_empty() => CellValue::Null,
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one submission per line.
/// Short rows are accepted; their missing cells are simply absent.
///
/// Cells in `text_columns` keep their trimmed source text and skip type
/// inference, so an identifier such as `-007` or `1.0` is never re-spelled.
fn load_csv(path: &Path, text_columns: &[&String]) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let cells: BTreeMap<String, CellValue> = columns
            .iter()
            .zip(row.iter())
            .map(|(col, value)| {
                let cell = if text_columns.contains(&col) {
                    text_cell(value)
                } else {
                    guess_cell_type(value)
                };
                (col.clone(), cell)
            })
            .collect();
        records.push(Record::new(cells));
    }

    Ok(RawTable { columns, records })
}

fn text_cell(s: &str) -> CellValue {
    match s.trim() {
        "" => CellValue::Null,
        t => CellValue::String(t.to_string()),
    }
}

/// Infer a cell type from CSV text.
///
/// Digit strings with a leading zero (`"007"`) stay text so identifiers keep
/// their exact spelling.
pub fn guess_cell_type(s: &str) -> CellValue {
    let t = s.trim();
    if t.is_empty() {
        return CellValue::Null;
    }
    if has_significant_leading_zero(t) {
        return CellValue::String(s.to_string());
    }
    if let Ok(i) = t.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = t.parse::<f64>() {
        if f.is_finite() {
            return CellValue::Float(f);
        }
    }
    if t == "true" || t == "false" {
        return CellValue::Bool(t == "true");
    }
    if looks_like_date(t) {
        return CellValue::Date(t.to_string());
    }
    CellValue::String(s.to_string())
}

fn has_significant_leading_zero(t: &str) -> bool {
    let bytes = t.as_bytes();
    bytes.len() > 1 && bytes[0] == b'0' && bytes[1].is_ascii_digit()
}

/// `YYYY-MM-DD`, optionally followed by a time part.
fn looks_like_date(t: &str) -> bool {
    let b = t.as_bytes();
    b.len() >= 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[8..10].iter().all(u8::is_ascii_digit)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet export with one flat column per sheet column.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let mut cells = BTreeMap::new();
            for (col_idx, col_name) in columns.iter().enumerate() {
                let value = extract_cell_value(batch.column(col_idx), row)
                    .with_context(|| format!("Row {row}, column '{col_name}'"))?;
                cells.insert(col_name.clone(), value);
            }
            records.push(Record::new(cells));
        }
    }

    Ok(RawTable { columns, records })
}

/// Downcast an Arrow column to its concrete array type.
fn downcast<'a, T: 'static>(col: &'a Arc<dyn Array>) -> Result<&'a T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array layout for {:?}", col.data_type()))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell_value(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => CellValue::String(downcast::<StringArray>(col)?.value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(downcast::<Int32Array>(col)?.value(row) as i64),
        DataType::Int64 => CellValue::Integer(downcast::<Int64Array>(col)?.value(row)),
        DataType::Float32 => CellValue::Float(downcast::<Float32Array>(col)?.value(row) as f64),
        DataType::Float64 => CellValue::Float(downcast::<Float64Array>(col)?.value(row)),
        DataType::Boolean => CellValue::Bool(downcast::<BooleanArray>(col)?.value(row)),
        DataType::Date32 => match downcast::<Date32Array>(col)?.value_as_date(row) {
            Some(date) => CellValue::Date(date.to_string()),
            None => CellValue::Null,
        },
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}
