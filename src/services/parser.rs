// src/services/parser.rs

use std::{io::Cursor, path::Path};

use calamine::{Reader, open_workbook_auto_from_rs};

use crate::{config::REQUIRED_COLUMNS, error::GradingError, models::record::ResponseRecord};

/// Tabular formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    /// `.xlsx` or legacy `.xls` workbook; only the first sheet is read.
    Spreadsheet,
}

impl FileFormat {
    /// Picks the format from the uploaded file's extension.
    pub fn from_filename(filename: &str) -> Result<Self, GradingError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(FileFormat::Csv),
            Some("xlsx") | Some("xls") => Ok(FileFormat::Spreadsheet),
            _ => Err(GradingError::Format(filename.to_string())),
        }
    }
}

/// Parses an uploaded file into response records, one per data row, in file order.
pub fn parse_records(bytes: &[u8], format: FileFormat) -> Result<Vec<ResponseRecord>, GradingError> {
    let rows = match format {
        FileFormat::Csv => read_csv_rows(bytes)?,
        FileFormat::Spreadsheet => read_spreadsheet_rows(bytes)?,
    };

    let mut rows = rows.into_iter();
    let header = rows.next().unwrap_or_default();
    let [student_idx, question_idx, answer_idx] = locate_columns(&header)?;

    let records = rows
        .map(|row| {
            let cell = |idx: usize| row.get(idx).cloned().unwrap_or_default();
            ResponseRecord::new(cell(student_idx), cell(question_idx), cell(answer_idx))
        })
        .collect();

    Ok(records)
}

/// Finds the required columns in the header row.
/// Fails with every missing column named, not just the first.
fn locate_columns(header: &[String]) -> Result<[usize; 3], GradingError> {
    let mut found = [0usize; 3];
    let mut missing = Vec::new();

    for (slot, column) in REQUIRED_COLUMNS.iter().enumerate() {
        match header.iter().position(|h| h == column) {
            Some(idx) => found[slot] = idx,
            None => missing.push(column.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(found)
    } else {
        Err(GradingError::Schema(missing))
    }
}

fn read_csv_rows(bytes: &[u8]) -> Result<Vec<Vec<String>>, GradingError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| GradingError::Malformed(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}

fn read_spreadsheet_rows(bytes: &[u8]) -> Result<Vec<Vec<String>>, GradingError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| GradingError::Malformed(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| GradingError::Malformed("workbook has no worksheets".to_string()))?
        .map_err(|e| GradingError::Malformed(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect())
}
