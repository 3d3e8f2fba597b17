use std::fs::File;
use std::path::Path;

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveTime, Timelike};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{LoadError, ParseError};
use super::model::{Attribute, Dataset, SaleRecord};
use crate::config::SourceConfig;

pub const TOTAL_COLUMN: &str = "Total";
pub const RATING_COLUMN: &str = "Rating";
pub const GROSS_INCOME_COLUMN: &str = "gross income";
pub const TIME_COLUMN: &str = "Time";

/// Strict time-of-day pattern for the `Time` column.
pub const TIME_FORMAT: &str = "%H:%M:%S";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the sales table described by `source`.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – sheet, header offset and column
///   range taken from `source`
/// * `.csv`     – first line is the header
/// * `.json`    – `[{ "City": "...", "Total": 12.5, ... }, ...]`
/// * `.parquet` – one column per field
///
/// At most `source.row_cap` data rows are read, whatever the format.
pub fn load_file(source: &SourceConfig) -> Result<Dataset, LoadError> {
    let path = source.path.as_path();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => read_workbook(source)?,
        "csv" => read_csv(path, source.row_cap)?,
        "json" => read_json(path, source.row_cap)?,
        "parquet" | "pq" => read_parquet(path, source.row_cap)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let records = records_from_table(&table)?;
    log::info!(
        "Loaded {} sales records from {}",
        records.len(),
        path.display()
    );
    Ok(Dataset::from_records(records))
}

/// Parse a strict `HH:MM:SS` value and return its hour.
pub fn parse_hour(value: &str, row: usize) -> Result<u8, ParseError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map(|t| t.hour() as u8)
        .map_err(|_| ParseError {
            row,
            value: value.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Format-independent table → records
// ---------------------------------------------------------------------------

/// Header plus stringified cells, whatever the source format.
#[derive(Debug, Default)]
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Positions of the required columns within a [`RawTable`].
struct ColumnIndex {
    attributes: Vec<(Attribute, usize)>,
    total: usize,
    rating: usize,
    gross_income: usize,
    time: usize,
}

impl ColumnIndex {
    fn locate(headers: &[String]) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| same_header(h, name))
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };

        let attributes = Attribute::ALL
            .iter()
            .map(|&attr| find(attr.column_name()).map(|idx| (attr, idx)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ColumnIndex {
            attributes,
            total: find(TOTAL_COLUMN)?,
            rating: find(RATING_COLUMN)?,
            gross_income: find(GROSS_INCOME_COLUMN)?,
            time: find(TIME_COLUMN)?,
        })
    }

    fn record(&self, row: &[String], row_no: usize) -> Result<SaleRecord, LoadError> {
        let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
        let number = |idx: usize, column: &str| {
            let raw = cell(idx);
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| LoadError::InvalidNumber {
                    row: row_no,
                    column: column.to_string(),
                    value: raw.to_string(),
                })
        };
        let text = |attr: Attribute| {
            self.attributes
                .iter()
                .find(|(a, _)| *a == attr)
                .map(|&(_, idx)| cell(idx).to_string())
                .unwrap_or_default()
        };

        let time = cell(self.time).to_string();
        let hour = parse_hour(&time, row_no)?;

        Ok(SaleRecord {
            city: text(Attribute::City),
            customer_type: text(Attribute::CustomerType),
            gender: text(Attribute::Gender),
            branch: text(Attribute::Branch),
            payment: text(Attribute::Payment),
            product_line: text(Attribute::ProductLine),
            total: number(self.total, TOTAL_COLUMN)?,
            rating: number(self.rating, RATING_COLUMN)?,
            gross_income: number(self.gross_income, GROSS_INCOME_COLUMN)?,
            time,
            hour,
        })
    }
}

/// Header match ignoring surrounding whitespace and space/underscore
/// differences (`Product line` == `Product_line`).
fn same_header(header: &str, expected: &str) -> bool {
    let normalize = |s: &str| s.trim().replace(' ', "_");
    normalize(header) == normalize(expected)
}

fn records_from_table(table: &RawTable) -> Result<Vec<SaleRecord>, LoadError> {
    let columns = ColumnIndex::locate(&table.headers)?;
    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| columns.record(row, i + 1))
        .collect()
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// Read `source.sheet`, taking the header from row `skip_rows` (0-based,
/// absolute) and only the columns inside `source.columns`. The row cap
/// counts sheet rows below the header, blank ones included; fully blank
/// rows are then dropped.
fn read_workbook(source: &SourceConfig) -> Result<RawTable, LoadError> {
    let (first_col, last_col) = parse_column_range(&source.columns)?;
    let mut workbook = open_workbook_auto(&source.path)?;
    let range = workbook.worksheet_range(&source.sheet)?;

    let header_row = u32::try_from(source.skip_rows)
        .map_err(|_| LoadError::InvalidLayout(format!("skip_rows {} too large", source.skip_rows)))?;
    let end_row = match range.end() {
        Some((row, _)) if row >= header_row => row,
        _ => {
            return Err(LoadError::InvalidLayout(format!(
                "sheet '{}' has no header at row {}",
                source.sheet,
                header_row + 1
            )))
        }
    };

    let read_row = |row: u32| -> Vec<String> {
        (first_col..=last_col)
            .map(|col| range.get_value((row, col)).map(cell_to_string).unwrap_or_default())
            .collect()
    };

    let cap = u32::try_from(source.row_cap).unwrap_or(u32::MAX);
    let last_row = end_row.min(header_row.saturating_add(cap));

    let headers = read_row(header_row);
    let mut rows = Vec::new();
    for row in (header_row + 1)..=last_row {
        let cells = read_row(row);
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        rows.push(cells);
    }

    log::debug!(
        "Sheet '{}': {} columns, {} data rows",
        source.sheet,
        headers.len(),
        rows.len()
    );
    Ok(RawTable { headers, rows })
}

/// `"B:R"` → `(1, 17)`: zero-based, inclusive.
fn parse_column_range(spec: &str) -> Result<(u32, u32), LoadError> {
    let invalid = || LoadError::InvalidColumnRange(spec.to_string());

    let (start, end) = spec.split_once(':').ok_or_else(invalid)?;
    let start = column_index(start.trim()).ok_or_else(invalid)?;
    let end = column_index(end.trim()).ok_or_else(invalid)?;
    if start > end {
        return Err(invalid());
    }
    Ok((start, end))
}

/// Spreadsheet column letters to a zero-based index (`A` → 0, `AA` → 26).
fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    letters
        .chars()
        .try_fold(0u32, |acc, c| {
            let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
            acc.checked_mul(26)?.checked_add(digit)
        })
        .map(|n| n - 1)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => serial_to_string(dt.as_f64()),
        Data::Error(e) => format!("{e:?}"),
    }
}

/// Spreadsheet serials below 1.0 are a bare time of day; render those as
/// `HH:MM:SS` so they go through the same strict parse as text cells.
fn serial_to_string(serial: f64) -> String {
    if (0.0..1.0).contains(&serial) {
        let secs = (serial * 86_400.0).round() as u32 % 86_400;
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
    } else {
        serial.to_string()
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path, row_cap: usize) -> Result<RawTable, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in reader.records().take(row_cap) {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). Columns are the
/// union of keys in first-appearance order.
fn read_json(path: &Path, row_cap: usize) -> Result<RawTable, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)?;
    let items = root
        .as_array()
        .ok_or_else(|| LoadError::InvalidLayout("expected top-level JSON array".into()))?;

    let objects = items
        .iter()
        .take(row_cap)
        .enumerate()
        .map(|(i, item)| {
            item.as_object()
                .ok_or_else(|| LoadError::InvalidLayout(format!("row {} is not a JSON object", i + 1)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut headers: Vec<String> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = objects
        .iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_string).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_string(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); every cell is rendered through Arrow's
/// display formatter.
fn read_parquet(path: &Path, row_cap: usize) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    'batches: for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            if rows.len() >= row_cap {
                break 'batches;
            }
            let cells = batch
                .columns()
                .iter()
                .map(|col| {
                    if col.is_null(row) {
                        Ok(String::new())
                    } else {
                        array_value_to_string(col, row)
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }
    }

    Ok(RawTable { headers, rows })
}
