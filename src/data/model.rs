use std::collections::BTreeMap;
use std::fmt;

use super::schema::SchemaMapping;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the exported sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring what a spreadsheet export yields.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text.
    Date(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// The trimmed string form used when comparing identifiers.
    ///
    /// Numbers render in their shortest form, so an `Integer(7)` yields `"7"`
    /// and never matches a typed-in `"007"`.
    pub fn key_text(&self) -> String {
        self.to_string().trim().to_string()
    }

    /// Interpret the value as a real number. Text cells are parsed, since
    /// sheets routinely store numbers as strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Interpret the value as a non-negative whole count.
    pub fn as_count(&self) -> Option<u32> {
        match self {
            CellValue::Integer(i) => u32::try_from(*i).ok(),
            CellValue::Float(v) if v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64 => {
                Some(*v as u32)
            }
            CellValue::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the sheet, i.e. one test submission
// ---------------------------------------------------------------------------

/// A single submission: physical column name → value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub cells: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn new(cells: BTreeMap<String, CellValue>) -> Self {
        Self { cells }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Display text for a column; absent cells render as an empty string.
    pub fn text(&self, column: &str) -> String {
        self.get(column).map(|v| v.to_string()).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Dataset – every submission loaded for this session
// ---------------------------------------------------------------------------

/// The full loaded sheet. Record order is load order, which is treated as
/// submission order.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All records (rows).
    pub records: Vec<Record>,
    /// Header columns in source order.
    pub columns: Vec<String>,
    /// Mapping used to interpret the columns.
    pub schema: SchemaMapping,
}

impl Dataset {
    pub fn new(records: Vec<Record>, columns: Vec<String>, schema: SchemaMapping) -> Self {
        Dataset {
            records,
            columns,
            schema,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
