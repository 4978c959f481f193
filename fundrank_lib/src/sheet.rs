//! Reads a report sheet back as JSON rows and serves page slices of it.

use std::ops::Range;
use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use serde_json::{Map, Number, Value};

use crate::code::FundCode;
use crate::error::FundRankError;
use crate::model::ReportColumn;

/// A sheet loaded into memory: normalized headers plus one value per cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl SheetTable {
    /// Total number of data rows, header excluded.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows of one page as header-keyed objects, in column order.
    pub fn page(&self, page: usize, limit: usize) -> Vec<Map<String, Value>> {
        self.rows[page_bounds(self.len(), page, limit)]
            .iter()
            .map(|row| self.record(row))
            .collect()
    }

    fn record(&self, row: &[Value]) -> Map<String, Value> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, header)| (header.clone(), row.get(idx).cloned().unwrap_or(Value::Null)))
            .collect()
    }
}

/// Index range of 1-based `page` when pages hold `limit` rows.
///
/// Pages past the end are empty, and the last page may be short, so the page
/// holds `max(0, min(limit, total - (page - 1) * limit))` rows.
pub fn page_bounds(total: usize, page: usize, limit: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(limit).min(total);
    let end = start.saturating_add(limit).min(total);
    start..end
}

/// Loads `sheet` from the workbook at `path`.
///
/// Spaces are removed from header names and blank cells become `null`. The
/// date column is rendered as text and the fund-code column is normalized to
/// six-digit text, with a blank code read as an empty string.
pub fn read_sheet(path: &Path, sheet: &str) -> Result<SheetTable, FundRankError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook.worksheet_range(sheet)?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(SheetTable::default());
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().replace(' ', ""))
        .collect();

    let code_header = ReportColumn::Code.header();
    let date_header = ReportColumn::NavDate.header();
    let table_rows = rows
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(idx, header)| {
                    let cell = row.get(idx).unwrap_or(&Data::Empty);
                    if header == code_header {
                        code_value(cell)
                    } else if header == date_header {
                        date_value(cell)
                    } else {
                        cell_value(cell)
                    }
                })
                .collect()
        })
        .collect::<Vec<Vec<Value>>>();

    tracing::debug!("Read {} rows from sheet {}", table_rows.len(), sheet);
    Ok(SheetTable {
        headers,
        rows: table_rows,
    })
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(n) => Value::from(*n),
        Data::Float(f) => float_value(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => Value::String(s.clone()),
        Data::DateTime(_) => date_value(cell),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
    }
}

/// Whole floats become integers, so a stored `1` reads back as `1`.
fn float_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Value::from(f as i64)
    } else {
        Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Dates as `YYYY-MM-DD`, with ` HH:MM:SS` when the cell has a time part.
fn date_value(cell: &Data) -> Value {
    match cell {
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) if datetime.time() == chrono::NaiveTime::MIN => {
                Value::String(datetime.format("%Y-%m-%d").to_string())
            }
            Some(datetime) => Value::String(datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Value::Null,
        },
        Data::Empty | Data::Error(_) => Value::Null,
        other => Value::String(other.to_string()),
    }
}

fn code_value(cell: &Data) -> Value {
    let code = match cell {
        Data::Int(n) => Some(FundCode::from_integer(*n)),
        Data::Float(f) => FundCode::from_float(*f),
        Data::String(s) => Some(FundCode::from_text(s)),
        Data::Empty => None,
        other => Some(FundCode::from_text(&other.to_string())),
    };
    Value::String(code.map(|c| c.to_string()).unwrap_or_default())
}
