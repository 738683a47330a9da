use std::collections::HashSet;

/// One value from a loaded file.
///
/// Only the `id` column may hold text; every other column is numeric once a
/// loader has accepted the file.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(_) => None,
        }
    }

    /// Text used to compare patient identity across files.
    ///
    /// Integral numbers drop their fraction so `7`, `7.0` and a spreadsheet
    /// float 7 all produce `"7"`.
    pub fn key(&self) -> String {
        match self {
            Cell::Number(n) => number_key(*n),
            Cell::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => number_key(n),
                Err(_) => s.trim().to_string(),
            },
        }
    }
}

fn number_key(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Row-oriented table with the column names its file declared.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
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

    /// Position of the first column with this name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Numeric value at (row, column). Text reads as NaN so it never equals
    /// zero or an efficacy value.
    pub fn number(&self, row: usize, column: usize) -> f64 {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(Cell::as_number)
            .unwrap_or(f64::NAN)
    }

    /// Key text at (row, column), empty if out of range
    pub fn key(&self, row: usize, column: usize) -> String {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(Cell::key)
            .unwrap_or_default()
    }
}

/// Identity of one patient: normalized (id, health, decline).
pub type PatientKey = (String, String, String);

/// Reference patients, indexed for membership tests.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    table: Table,
    keys: HashSet<PatientKey>,
}

impl ReferenceTable {
    /// Wrap a table whose first three columns are id, health, decline.
    pub fn new(table: Table) -> Self {
        let keys = (0..table.len())
            .map(|row| (table.key(row, 0), table.key(row, 1), table.key(row, 2)))
            .collect();
        Self { table, keys }
    }

    pub fn contains(&self, key: &PatientKey) -> bool {
        self.keys.contains(key)
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
