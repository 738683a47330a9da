//! Error types for loading and validating submissions

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A file could not be turned into a table.
///
/// Raised before any rule validation runs; there is no recovery.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Unsupported submission format '{extension}' for {path} (expected .csv or .xlsx)")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Failed to read {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("{path} has no header row")]
    MissingHeader { path: PathBuf },

    #[error("{path}: line {line} has {found} columns, expected at least {expected}")]
    ShortRow {
        path: PathBuf,
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("{path}: line {line}, column '{column}': '{value}' is not a number")]
    NotNumeric {
        path: PathBuf,
        line: usize,
        column: String,
        value: String,
    },
}

/// Identifies which validation rule a submission broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    ColumnNames,
    DataMatch,
    Quantity,
    Efficacy,
    BedGating,
    Combo,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::ColumnNames => "column names",
            Rule::DataMatch => "data match",
            Rule::Quantity => "quantity",
            Rule::Efficacy => "efficacy",
            Rule::BedGating => "bed gating",
            Rule::Combo => "ventilator/oxygen combo",
        };
        f.write_str(name)
    }
}

/// A submission that is well-formed but breaks one of the grading rules.
///
/// Row numbers are 1-based data rows (the header is not counted).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Unrecognized column '{column}'")]
    UnknownColumn { column: String },

    #[error("Column '{column}' appears more than once")]
    DuplicateColumn { column: String },

    #[error("Required column '{column}' is missing")]
    MissingColumn { column: String },

    #[error("Row {row}: patient (id={id}, health={health}, decline={decline}) does not match the reference data")]
    UnmatchedPatient {
        row: usize,
        id: String,
        health: String,
        decline: String,
    },

    #[error("{treatment} used {used} times, daily quantity is {limit}")]
    QuantityExceeded {
        treatment: String,
        used: usize,
        limit: u32,
    },

    #[error("Row {row}: {treatment} value {value} is neither 0 nor its efficacy {efficacy}")]
    InvalidEfficacy {
        treatment: String,
        row: usize,
        value: f64,
        efficacy: f64,
    },

    #[error("Row {row}: '{column}' is non-zero for a patient without a bed")]
    TreatmentWithoutBed { row: usize, column: String },

    #[error("Row {row}: ventilator and oxygen cannot be given to the same patient")]
    VentilatorWithOxygen { row: usize },
}

impl ValidationError {
    /// The rule this failure belongs to
    pub fn rule(&self) -> Rule {
        match self {
            ValidationError::UnknownColumn { .. }
            | ValidationError::DuplicateColumn { .. }
            | ValidationError::MissingColumn { .. } => Rule::ColumnNames,
            ValidationError::UnmatchedPatient { .. } => Rule::DataMatch,
            ValidationError::QuantityExceeded { .. } => Rule::Quantity,
            ValidationError::InvalidEfficacy { .. } => Rule::Efficacy,
            ValidationError::TreatmentWithoutBed { .. } => Rule::BedGating,
            ValidationError::VentilatorWithOxygen { .. } => Rule::Combo,
        }
    }

    /// Treatment name the failure refers to, when there is one
    pub fn treatment(&self) -> Option<&str> {
        match self {
            ValidationError::QuantityExceeded { treatment, .. }
            | ValidationError::InvalidEfficacy { treatment, .. } => Some(treatment),
            _ => None,
        }
    }
}
