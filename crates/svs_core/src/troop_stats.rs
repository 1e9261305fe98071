//! Troop stats workbook flattening.
//!
//! Every sheet becomes an array of row objects keyed by the sheet's first
//! row. Fully empty rows and columns are dropped, and columns holding only
//! numbers are emitted as integers.

use std::collections::HashMap;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::error::{CoreError, CoreErrorCode};

/// Number of leading columns summarized in debug mode.
pub const SUMMARY_COLUMNS: usize = 4;

pub type SheetRecords = Vec<JsonMap<String, JsonValue>>;

/// Value frequencies of one column, least frequent first.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub counts: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetSummary {
    pub sheet: String,
    pub columns: Vec<ColumnSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TroopStats {
    sheets: IndexMap<String, SheetRecords>,
}

impl TroopStats {
    pub fn sheet(&self, name: &str) -> Option<&SheetRecords> {
        self.sheets.get(name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub summarize: bool,
}

#[derive(Debug, Clone)]
pub struct ParsedWorkbook {
    pub stats: TroopStats,
    /// Filled only when [`ParseOptions::summarize`] is set.
    pub summaries: Vec<SheetSummary>,
}

/// Reads every sheet of an ODS, XLSX or XLS workbook.
pub fn parse_workbook(path: &Path, options: ParseOptions) -> Result<ParsedWorkbook, CoreError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Spreadsheet,
            format!("failed to open {}: {e}", path.display()),
        )
    })?;

    let mut stats = TroopStats::default();
    let mut summaries = Vec::new();

    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        let grid: Vec<Vec<Data>> = range.rows().map(<[Data]>::to_vec).collect();

        let Some(sheet) = Sheet::from_grid(&grid) else {
            continue;
        };
        if options.summarize {
            summaries.push(SheetSummary {
                sheet: name.clone(),
                columns: sheet.summarize(SUMMARY_COLUMNS),
            });
        }
        stats.sheets.insert(name, sheet.into_records());
    }

    Ok(ParsedWorkbook { stats, summaries })
}

#[derive(Debug, Clone, PartialEq)]
struct Sheet {
    columns: Vec<String>,
    rows: Vec<Vec<JsonValue>>,
}

impl Sheet {
    /// Builds a sheet from raw cells; `None` when nothing survives cleanup.
    fn from_grid(grid: &[Vec<Data>]) -> Option<Self> {
        let (header, body) = grid.split_first()?;
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        let cell = |row: &[Data], col: usize| row.get(col).cloned().unwrap_or(Data::Empty);

        let kept_cols: Vec<usize> = (0..width)
            .filter(|&col| body.iter().any(|row| !is_empty(&cell(row, col))))
            .collect();
        let kept_rows: Vec<&Vec<Data>> = body
            .iter()
            .filter(|row| kept_cols.iter().any(|&col| !is_empty(&cell(row, col))))
            .collect();
        if kept_cols.is_empty() || kept_rows.is_empty() {
            return None;
        }

        let columns = column_names(header, &kept_cols);
        let numeric: Vec<bool> = kept_cols
            .iter()
            .map(|&col| {
                kept_rows.iter().all(|row| {
                    let value = cell(row, col);
                    is_empty(&value) || matches!(value, Data::Int(_) | Data::Float(_))
                })
            })
            .collect();

        let rows = kept_rows
            .iter()
            .map(|row| {
                kept_cols
                    .iter()
                    .zip(&numeric)
                    .map(|(&col, &as_int)| cell_to_json(&cell(row, col), as_int))
                    .collect()
            })
            .collect();

        Some(Self { columns, rows })
    }

    fn summarize(&self, limit: usize) -> Vec<ColumnSummary> {
        self.columns
            .iter()
            .take(limit)
            .enumerate()
            .map(|(idx, column)| {
                let mut counts: IndexMap<String, usize> = IndexMap::new();
                for value in self.rows.iter().map(|row| &row[idx]) {
                    if value.is_null() {
                        continue;
                    }
                    *counts.entry(display_value(value)).or_default() += 1;
                }
                let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
                counts.sort_by_key(|&(_, n)| n);
                ColumnSummary {
                    column: column.clone(),
                    counts,
                }
            })
            .collect()
    }

    fn into_records(self) -> SheetRecords {
        let columns = self.columns;
        self.rows
            .into_iter()
            .map(|row| columns.iter().cloned().zip(row).collect())
            .collect()
    }
}

// Blank headers become `Unnamed: <index>`, repeats get a `.<n>` suffix.
fn column_names(header: &[Data], kept_cols: &[usize]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    kept_cols
        .iter()
        .map(|&col| {
            let base = match header.get(col) {
                Some(cell) if !is_empty(cell) => cell.to_string(),
                _ => format!("Unnamed: {col}"),
            };
            let n = seen.entry(base.clone()).or_insert(0);
            let name = if *n == 0 {
                base
            } else {
                format!("{base}.{n}")
            };
            *n += 1;
            name
        })
        .collect()
}

fn is_empty(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

fn cell_to_json(cell: &Data, as_int: bool) -> JsonValue {
    if is_empty(cell) {
        return JsonValue::Null;
    }
    match cell {
        Data::Int(i) => JsonValue::from(*i),
        Data::Float(f) if as_int => JsonValue::from(f.trunc() as i64),
        Data::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Data::Bool(b) => JsonValue::Bool(*b),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            JsonValue::String(s.clone())
        }
        other => JsonValue::String(other.to_string()),
    }
}

fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
