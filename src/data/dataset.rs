//! In-memory tabular dataset.
//!
//! # Responsibilities
//! - Parse uploads (CSV, JSON records) into typed cells
//! - Normalize column names (trimmed, upper-case)
//! - Column lookup and typing for the statistics code
//!
//! # Design Decisions
//! - Cells are Null, Number or Text; no dates, no booleans
//! - A column is numeric when every non-null cell is a Number
//! - Rows keep upload order

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const SUBJ_ID: &str = "SUBJ_ID";
pub const SUBJ_STATUS: &str = "SUBJ_STATUS";
pub const LOCATION_NAME: &str = "LOCATION_NAME";
pub const VISIT_NM: &str = "VISIT_NM";
pub const ENROLL_COPDNOTCOPD: &str = "ENROLL_COPDNOTCOPD";

/// Errors produced while reading an upload.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Invalid file format for {0:?}. Please upload CSV (.csv) or JSON (.json) file.")]
    UnsupportedFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON upload must be an array of objects")]
    NotTabular,
}

/// A single dataset value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Type a raw CSV field: empty → Null, numeric → Number, else Text.
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Cell::Null;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(field.to_string()),
        }
    }

    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
            Value::String(s) => Cell::Text(s.clone()),
            Value::Bool(b) => Cell::Text(b.to_string()),
            other => Cell::Text(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view of the cell; numeric-looking text counts.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Cell::Null => None,
        }
    }

    /// Display form; Null renders as the empty string.
    pub fn display(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Number(n) => format_number(*n),
            Cell::Text(s) => s.clone(),
        }
    }

    /// JSON form used in record listings; Null becomes `""`.
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Null => Value::String(String::new()),
            Cell::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Cell::Text(s) => Value::String(s.clone()),
        }
    }
}

/// Integers print without a fractional part.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Trimmed, upper-cased column name.
pub fn normalize_column(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Column-named rows of cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Build a dataset, normalizing column names and padding short rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let columns: Vec<String> = columns.iter().map(|c| normalize_column(c)).collect();
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Parse an upload, picking the reader by file extension.
    pub fn from_upload(filename: &str, bytes: &[u8]) -> Result<Self, DataError> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".csv") {
            Self::from_csv(bytes)
        } else if lower.ends_with(".json") {
            Self::from_json(bytes)
        } else {
            Err(DataError::UnsupportedFormat(filename.to_string()))
        }
    }

    pub fn from_csv(bytes: &[u8]) -> Result<Self, DataError> {
        let mut reader = csv::ReaderBuilder::new().from_reader(bytes);
        let columns = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(Cell::from_field).collect());
        }
        Ok(Self::new(columns, rows))
    }

    /// Array of objects; columns are the union of keys in first-seen order.
    pub fn from_json(bytes: &[u8]) -> Result<Self, DataError> {
        let value: Value = serde_json::from_slice(bytes)?;
        let Value::Array(items) = value else {
            return Err(DataError::NotTabular);
        };

        let mut columns: Vec<String> = Vec::new();
        let mut objects = Vec::with_capacity(items.len());
        for item in items {
            let Value::Object(map) = item else {
                return Err(DataError::NotTabular);
            };
            for key in map.keys() {
                let name = normalize_column(key);
                if !columns.contains(&name) {
                    columns.push(name);
                }
            }
            objects.push(map);
        }

        let rows = objects
            .iter()
            .map(|map| {
                let mut row = vec![Cell::Null; columns.len()];
                for (key, value) in map {
                    if let Some(idx) = columns.iter().position(|c| *c == normalize_column(key)) {
                        row[idx] = Cell::from_json(value);
                    }
                }
                row
            })
            .collect();

        Ok(Self::new(columns, rows))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column with this (normalized) name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = normalize_column(name);
        self.columns.iter().position(|c| *c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of one column, in row order.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[idx])
    }

    /// Cell at `(row, column name)`; None when the column is absent.
    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    pub fn is_numeric(&self, idx: usize) -> bool {
        self.column(idx)
            .all(|c| matches!(c, Cell::Null | Cell::Number(_)))
    }
}
