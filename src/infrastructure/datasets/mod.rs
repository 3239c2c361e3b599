//! CSV-backed dataset loading.
//!
//! Operational exports land as loosely-structured CSV files whose column
//! names drift between exports. [`Table`] keeps the raw rows together with a
//! case-insensitive header index built once per load, so callers resolve a
//! logical field from an ordered list of candidate names instead of assuming
//! a fixed layout.
//!
//! A missing file, an unreadable record or an unparseable cell is a normal
//! outcome here, not an error: it degrades to an empty table, a skipped row
//! or an absent value.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use serde_json::{Map, Number, Value};
use tracing::warn;

/// An in-memory CSV table. Rows are read fresh on every request; the data
/// volume is small and updates are infrequent.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    lookup: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut lookup = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            // First occurrence wins for duplicate headers.
            lookup.entry(header.to_lowercase()).or_insert(idx);
        }
        Self {
            headers,
            lookup,
            rows,
        }
    }

    /// Read a CSV file into a table. An absent or unreadable file yields an
    /// empty table; unreadable records are skipped.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                warn!("failed to open {}: {e}", path.display());
                return Self::default();
            }
        };

        let mut reader = csv::Reader::from_reader(file);
        let headers: Vec<String> = match reader.headers() {
            Ok(headers) => headers.iter().map(str::to_string).collect(),
            Err(e) => {
                warn!("failed to read CSV headers from {}: {e}", path.display());
                return Self::default();
            }
        };

        let mut rows = Vec::new();
        for result in reader.records() {
            match result {
                Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
                Err(e) => warn!("skipping unreadable record in {}: {e}", path.display()),
            }
        }

        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Resolve the first header matching any candidate, case-insensitively.
    /// `None` is a normal outcome driving downstream null-propagation.
    pub fn resolve_column(&self, candidates: &[&str]) -> Option<usize> {
        candidates
            .iter()
            .find_map(|name| self.lookup.get(&name.to_lowercase()).copied())
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Render a row as a JSON object, keeping numeric-looking cells numeric
    /// and empty cells null.
    pub fn row_to_json(&self, row: usize) -> Map<String, Value> {
        let mut object = Map::new();
        let Some(cells) = self.rows.get(row) else {
            return object;
        };
        for (idx, header) in self.headers.iter().enumerate() {
            let value = match cells.get(idx).map(|c| c.trim()) {
                None | Some("") => Value::Null,
                Some(cell) => match parse_cell(cell).and_then(Number::from_f64) {
                    Some(number) => Value::Number(number),
                    None => Value::String(cell.to_string()),
                },
            };
            object.insert(header.clone(), value);
        }
        object
    }
}

/// Parse a cell as a finite float; anything else is treated as absent.
pub fn parse_cell(value: &str) -> Option<f64> {
    let parsed = value.trim().parse::<f64>().ok()?;
    parsed.is_finite().then_some(parsed)
}

/// Non-empty trimmed cell text from a resolved column.
pub fn text_cell(row: &[String], column: Option<usize>) -> Option<String> {
    column
        .and_then(|idx| row.get(idx))
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
}
