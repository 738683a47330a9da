use std::collections::HashSet;

use crate::catalog::{bed_gated_columns, Catalog, REQUIRED_COLUMNS};
use crate::error::ValidationError;
use crate::table::{ReferenceTable, Table};

/// Check a submission against the grading rules.
///
/// Checks run in a fixed order and stop at the first failure:
/// column names, reference match, per-treatment quantity and efficacy,
/// bed gating, then the ventilator/oxygen combo.
pub fn validate(
    submission: &Table,
    reference: &ReferenceTable,
    catalog: &Catalog,
) -> Result<(), ValidationError> {
    check_columns(submission)?;
    check_data_match(submission, reference)?;
    for treatment in catalog.iter() {
        let Some(col) = submission.column_index(treatment.name) else {
            continue;
        };
        check_quantity(submission, col, treatment.name, treatment.daily_quantity, treatment.efficacy)?;
        check_efficacy(submission, col, treatment.name, treatment.efficacy)?;
    }
    check_bed_gating(submission)?;
    check_combo(submission)?;
    Ok(())
}

fn check_columns(submission: &Table) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for column in submission.columns() {
        if !Catalog::is_recognized_column(column) {
            return Err(ValidationError::UnknownColumn {
                column: column.clone(),
            });
        }
        if !seen.insert(column.as_str()) {
            return Err(ValidationError::DuplicateColumn {
                column: column.clone(),
            });
        }
    }
    for required in REQUIRED_COLUMNS {
        if !seen.contains(required) {
            return Err(ValidationError::MissingColumn {
                column: required.to_string(),
            });
        }
    }
    Ok(())
}

fn check_data_match(submission: &Table, reference: &ReferenceTable) -> Result<(), ValidationError> {
    let [id, health, decline] = ["id", "health", "decline"].map(|c| submission.column_index(c));
    let (Some(id), Some(health), Some(decline)) = (id, health, decline) else {
        return Err(ValidationError::MissingColumn {
            column: "id".to_string(),
        });
    };

    for row in 0..submission.len() {
        let key = (
            submission.key(row, id),
            submission.key(row, health),
            submission.key(row, decline),
        );
        if !reference.contains(&key) {
            return Err(ValidationError::UnmatchedPatient {
                row: row + 1,
                id: key.0,
                health: key.1,
                decline: key.2,
            });
        }
    }
    Ok(())
}

fn check_quantity(
    submission: &Table,
    col: usize,
    name: &str,
    limit: u32,
    efficacy: f64,
) -> Result<(), ValidationError> {
    let used = (0..submission.len())
        .filter(|&row| submission.number(row, col) == efficacy)
        .count();
    if used > limit as usize {
        return Err(ValidationError::QuantityExceeded {
            treatment: name.to_string(),
            used,
            limit,
        });
    }
    Ok(())
}

fn check_efficacy(
    submission: &Table,
    col: usize,
    name: &str,
    efficacy: f64,
) -> Result<(), ValidationError> {
    for row in 0..submission.len() {
        let value = submission.number(row, col);
        // NaN fails both comparisons
        if value != efficacy && value != 0.0 {
            return Err(ValidationError::InvalidEfficacy {
                treatment: name.to_string(),
                row: row + 1,
                value,
                efficacy,
            });
        }
    }
    Ok(())
}

fn check_bed_gating(submission: &Table) -> Result<(), ValidationError> {
    let Some(bed) = submission.column_index("bed") else {
        return Ok(());
    };
    let gated: Vec<(usize, &str)> = bed_gated_columns()
        .iter()
        .filter_map(|name| submission.column_index(name).map(|i| (i, *name)))
        .collect();

    for row in 0..submission.len() {
        if submission.number(row, bed) != 0.0 {
            continue;
        }
        for &(col, name) in &gated {
            if submission.number(row, col) != 0.0 {
                return Err(ValidationError::TreatmentWithoutBed {
                    row: row + 1,
                    column: name.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn check_combo(submission: &Table) -> Result<(), ValidationError> {
    let (Some(ventilator), Some(oxygen)) = (
        submission.column_index("ventilator"),
        submission.column_index("oxygen"),
    ) else {
        return Ok(());
    };

    for row in 0..submission.len() {
        if submission.number(row, ventilator) != 0.0 && submission.number(row, oxygen) != 0.0 {
            return Err(ValidationError::VentilatorWithOxygen { row: row + 1 });
        }
    }
    Ok(())
}
