use serde::Serialize;
use std::error::Error;
use std::fmt;

/// A single scalar cell value.
///
/// Untagged serialization keeps JSON previews plain: numbers serialize as
/// numbers, text as strings, `Empty` as `null`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Empty,
}

impl Value {
    /// Interpret a raw CSV field, inferring the narrowest scalar type.
    pub fn from_field(field: &str) -> Value {
        if field.is_empty() {
            return Value::Empty;
        }
        if let Ok(i) = field.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = field.parse::<f64>() {
            return Value::Float(f);
        }
        if let Ok(b) = field.parse::<bool>() {
            return Value::Bool(b);
        }
        Value::Text(field.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{}", s),
            Value::Empty => Ok(()),
        }
    }
}

/// An in-memory table: ordered column names plus rows of scalar values.
///
/// This is the only data structure flowing through the pipeline. The decoder
/// produces one from uploaded bytes, the transformer enriches it, the session
/// store holds the enriched result until the next upload replaces it.
///
/// Rows are kept positionally; `rows[r][c]` belongs to `columns[c]`. Column
/// names are not required to be unique as parsed, only the enrichment step
/// guarantees uniqueness for the columns it owns.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Table { columns, rows }
    }

    /// Number of data rows (the header is not a row).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Index of the first column with the given name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Remove every column with the given name, dropping the matching cell
    /// from each row.
    pub fn remove_column(&mut self, name: &str) {
        while let Some(idx) = self.column_index(name) {
            self.columns.remove(idx);
            for row in &mut self.rows {
                if idx < row.len() {
                    row.remove(idx);
                }
            }
        }
    }

    /// Serialize the table to CSV text: header row followed by every data
    /// row, comma-delimited, fields quoted by the writer as needed.
    pub fn to_csv(&self) -> Result<String, Box<dyn Error>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }

        let bytes = writer.into_inner()?;
        Ok(String::from_utf8(bytes)?)
    }
}
