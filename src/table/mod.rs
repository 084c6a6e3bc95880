// src/table/mod.rs
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use glob::glob;
use std::fs;
use tracing::{debug, warn};

use crate::config::Config;

/// Sheet names under which the holdings table appears. Filings use either
/// name for the same logical table; both are tried in order.
const INFOTABLE_SHEETS: &[&str] = &["InfoTable", "Information Table"];

const EMPTY_CELL: Value = Value::Empty;

/// A single cell of a holdings table.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Empty,
}

impl Value {
    /// Numeric view of the cell. Anything that is not a number, including
    /// text that fails to parse, counts as zero.
    pub fn as_number_or_zero(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse().unwrap_or(0.0),
            Value::Empty => 0.0,
        }
    }

    /// Canonical text used for distinct counting. `None` for empty cells,
    /// which distinct counts must skip.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Empty => None,
        }
    }
}

/// One logical holdings table: a header row plus data rows, in file order.
/// Rows carry no uniqueness constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingsTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl HoldingsTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All cells of the named column, in row order. Rows shorter than the
    /// header row yield `Empty` for their missing cells. `None` when the
    /// column does not exist at all.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Value>> {
        let idx = self.headers.iter().position(|h| h == name)?;
        Some(
            self.rows
                .iter()
                .map(move |row| row.get(idx).unwrap_or(&EMPTY_CELL)),
        )
    }
}

/// Load the holdings table for one (issuer, period file). Missing or
/// unreadable sources yield an empty table rather than an error; this
/// loader is read-only and never fails.
pub fn load_infotable(cfg: &Config, issuer: &str, period_filename: &str) -> HoldingsTable {
    let path = cfg.issuer_table_dir(issuer).join(period_filename);
    if !path.exists() {
        debug!(path = %path.display(), "period file absent");
        return HoldingsTable::default();
    }
    let mut workbook: Xlsx<_> = match open_workbook(&path) {
        Ok(wb) => wb,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable workbook");
            return HoldingsTable::default();
        }
    };
    for sheet in INFOTABLE_SHEETS {
        if let Ok(range) = workbook.worksheet_range(sheet) {
            return table_from_range(&range);
        }
    }
    warn!(path = %path.display(), "no recognized holdings sheet");
    HoldingsTable::default()
}

fn table_from_range(range: &Range<Data>) -> HoldingsTable {
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|c| c.to_string().trim().to_string())
            .collect(),
        None => return HoldingsTable::default(),
    };
    let rows = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();
    HoldingsTable { headers, rows }
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Empty,
        Data::String(s) if s.trim().is_empty() => Value::Empty,
        Data::String(s) => Value::Text(s.clone()),
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::Number(if *b { 1.0 } else { 0.0 }),
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
    }
}

/// Sorted `*.xlsx` file names for one issuer. A missing issuer directory
/// yields an empty list.
pub fn list_period_files(cfg: &Config, issuer: &str) -> Vec<String> {
    let pattern = format!("{}/*.xlsx", cfg.issuer_table_dir(issuer).display());
    let mut names: Vec<String> = match glob(&pattern) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect(),
        Err(e) => {
            warn!(issuer, error = %e, "invalid period file pattern");
            Vec::new()
        }
    };
    names.sort();
    names
}

/// Sorted names of all issuer directories under the table root.
pub fn list_issuers(cfg: &Config) -> Vec<String> {
    let mut out = Vec::new();
    let entries = match fs::read_dir(&cfg.table_root) {
        Ok(entries) => entries,
        Err(_) => return out,
    };
    for entry in entries.flatten() {
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            out.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    out.sort();
    out
}
