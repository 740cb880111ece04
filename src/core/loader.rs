//! Turns uploaded spreadsheet bytes into [`Record`]s.
//!
//! The first row of the first worksheet is the header. Every column in
//! [`REQUIRED_COLUMNS`] must be present; extra columns are ignored and blank
//! rows are skipped. Cells holding real dates are rendered as `YYYY-MM-DD`,
//! everything else passes through as text.

use crate::core::Record;
use crate::domain::model::{
    RecordFields, COLUMN_COMPANY, COLUMN_EMAIL, COLUMN_JOINING_DATE, COLUMN_NAME, COLUMN_POSITION,
    JOINING_DATE_FORMAT, REQUIRED_COLUMNS,
};
use crate::utils::error::{DocGenError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Workbook,
}

impl TableFormat {
    /// Picks the reader from the file name; anything that is not `.csv` is
    /// handed to the workbook reader, which sniffs the actual container.
    pub fn detect(source_name: &str) -> Self {
        let is_csv = Path::new(source_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            TableFormat::Csv
        } else {
            TableFormat::Workbook
        }
    }
}

pub fn load_records(source_name: &str, bytes: Vec<u8>) -> Result<Vec<Record>> {
    let rows = match TableFormat::detect(source_name) {
        TableFormat::Csv => read_csv_rows(&bytes)?,
        TableFormat::Workbook => read_workbook_rows(source_name, bytes)?,
    };

    let records = records_from_rows(rows)?;
    tracing::debug!("Loaded {} records from {}", records.len(), source_name);
    Ok(records)
}

fn read_csv_rows(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row?;
        rows.push(row.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn read_workbook_rows(source_name: &str, bytes: Vec<u8>) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DocGenError::EmptyWorkbook {
            source_name: source_name.to_string(),
        })??;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::DateTime(value) => value
            .as_datetime()
            .map(|dt| dt.format(JOINING_DATE_FORMAT).to_string())
            .unwrap_or_else(|| cell.to_string()),
        Data::DateTimeIso(value) => normalize_iso_date(value),
        other => other.to_string(),
    }
}

fn normalize_iso_date(value: &str) -> String {
    if let Ok(dt) = value.parse::<NaiveDateTime>() {
        return dt.format(JOINING_DATE_FORMAT).to_string();
    }
    if let Ok(date) = value.parse::<NaiveDate>() {
        return date.format(JOINING_DATE_FORMAT).to_string();
    }
    value.to_string()
}

/// Positions of the required columns inside a header row.
struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn from_header(header: &[String]) -> Result<Self> {
        let mut positions = HashMap::new();
        let mut missing = Vec::new();

        for column in REQUIRED_COLUMNS {
            let found = header
                .iter()
                .position(|cell| cell.trim_start_matches('\u{feff}').trim() == column);
            match found {
                Some(index) => {
                    positions.insert(column, index);
                }
                None => missing.push(column.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(DocGenError::MissingColumns { missing });
        }

        Ok(Self { positions })
    }

    fn field(&self, row: &[String], column: &str) -> Option<String> {
        let index = *self.positions.get(column)?;
        row.get(index).cloned()
    }

    fn record(&self, row: &[String]) -> Record {
        Record::from_fields(RecordFields {
            name: self.field(row, COLUMN_NAME),
            email: self.field(row, COLUMN_EMAIL),
            company: self.field(row, COLUMN_COMPANY),
            position: self.field(row, COLUMN_POSITION),
            joining_date: self.field(row, COLUMN_JOINING_DATE),
        })
    }
}

fn records_from_rows(rows: Vec<Vec<String>>) -> Result<Vec<Record>> {
    let mut rows = rows.into_iter();
    let header = rows.next().unwrap_or_default();
    let columns = ColumnIndex::from_header(&header)?;

    Ok(rows
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| columns.record(&row))
        .collect())
}
