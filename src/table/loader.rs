use super::types::{Cell, Table};
use crate::catalog::RECOGNIZED_COLUMNS;
use crate::error::FormatError;
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::fmt;
use std::path::Path;

/// Column names given to the first three reference columns.
const REFERENCE_COLUMNS: [&str; 3] = ["id", "health", "decline"];

/// Submission file formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SubmissionFormat {
    /// Comma-separated text with a header line
    Csv,
    /// Excel workbook; the first worksheet is read
    Xlsx,
}

impl SubmissionFormat {
    /// Pick the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, FormatError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Ok(SubmissionFormat::Csv),
            "xlsx" => Ok(SubmissionFormat::Xlsx),
            _ => Err(FormatError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

impl fmt::Display for SubmissionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionFormat::Csv => f.write_str("csv"),
            SubmissionFormat::Xlsx => f.write_str("xlsx"),
        }
    }
}

/// Load the reference patient data.
///
/// The header line is skipped and the first three columns are taken
/// positionally as id, health, decline. Extra columns are ignored.
pub fn load_reference(path: &Path) -> Result<Table, FormatError> {
    let mut reader = csv_reader(path)?;
    let mut rows = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let line = i + 2;
        let record = record.map_err(|e| unreadable(path, e))?;
        if record.len() < REFERENCE_COLUMNS.len() {
            return Err(FormatError::ShortRow {
                path: path.to_path_buf(),
                line,
                found: record.len(),
                expected: REFERENCE_COLUMNS.len(),
            });
        }
        let row = REFERENCE_COLUMNS
            .iter()
            .zip(record.iter())
            .map(|(column, raw)| text_cell(path, line, column, raw))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    let columns = REFERENCE_COLUMNS.iter().map(|c| c.to_string()).collect();
    Ok(Table::new(columns, rows))
}

/// Load a submission table.
///
/// `format` overrides extension sniffing when given. The column set is
/// whatever the file declares; checking it is the validator's job.
pub fn load_submission(
    path: &Path,
    format: Option<SubmissionFormat>,
) -> Result<Table, FormatError> {
    let format = match format {
        Some(f) => f,
        None => SubmissionFormat::from_path(path)?,
    };
    match format {
        SubmissionFormat::Csv => load_csv_submission(path),
        SubmissionFormat::Xlsx => load_xlsx_submission(path),
    }
}

fn load_csv_submission(path: &Path) -> Result<Table, FormatError> {
    let mut reader = csv_reader(path)?;
    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| unreadable(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Err(FormatError::MissingHeader {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let line = i + 2;
        let record = record.map_err(|e| unreadable(path, e))?;
        if record.len() != columns.len() {
            return Err(FormatError::ShortRow {
                path: path.to_path_buf(),
                line,
                found: record.len(),
                expected: columns.len(),
            });
        }
        let row = columns
            .iter()
            .zip(record.iter())
            .map(|(column, raw)| text_cell(path, line, column, raw))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

fn load_xlsx_submission(path: &Path) -> Result<Table, FormatError> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| unreadable(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| FormatError::MissingHeader {
            path: path.to_path_buf(),
        })?
        .map_err(|e| unreadable(path, e))?;

    let mut sheet_rows = range.rows();
    let columns: Vec<String> = sheet_rows
        .next()
        .ok_or_else(|| FormatError::MissingHeader {
            path: path.to_path_buf(),
        })?
        .iter()
        .map(data_text)
        .collect();

    let mut rows = Vec::new();
    for (i, sheet_row) in sheet_rows.enumerate() {
        if sheet_row.iter().all(|d| matches!(d, Data::Empty)) {
            continue;
        }
        let line = i + 2;
        let row = columns
            .iter()
            .zip(sheet_row.iter())
            .map(|(column, data)| data_cell(path, line, column, data))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

fn csv_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, FormatError> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| unreadable(path, e))
}

fn unreadable(path: &Path, err: impl fmt::Display) -> FormatError {
    FormatError::Unreadable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

/// Whether values in this column must be numbers: every recognized column
/// except `id` and the submitted `total`.
fn requires_number(column: &str) -> bool {
    column != "id" && column != "total" && RECOGNIZED_COLUMNS.contains(&column)
}

/// Convert a text field. Recognized numeric columns must parse; anything
/// else keeps its text when it is not a number, leaving unknown columns for
/// the validator to reject by name.
fn text_cell(path: &Path, line: usize, column: &str, raw: &str) -> Result<Cell, FormatError> {
    if column == "id" {
        return Ok(Cell::Text(raw.to_string()));
    }
    match raw.parse::<f64>() {
        Ok(n) => Ok(Cell::Number(n)),
        Err(_) if !requires_number(column) => Ok(Cell::Text(raw.to_string())),
        Err(_) => Err(FormatError::NotNumeric {
            path: path.to_path_buf(),
            line,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Convert a spreadsheet cell, following the same rules as [`text_cell`].
fn data_cell(path: &Path, line: usize, column: &str, data: &Data) -> Result<Cell, FormatError> {
    if column == "id" {
        return Ok(Cell::Text(data_text(data)));
    }
    match data {
        Data::Float(f) => Ok(Cell::Number(*f)),
        Data::Int(i) => Ok(Cell::Number(*i as f64)),
        Data::Bool(b) => Ok(Cell::Number(if *b { 1.0 } else { 0.0 })),
        other => text_cell(path, line, column, &data_text(other)),
    }
}

fn data_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => Cell::Number(*f).key(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
